use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Target resolution variant of a video.
///
/// The set is closed: every video owns exactly one format row per code, created
/// together with the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum FormatCode {
    P144 = 144,
    P240 = 240,
    P360 = 360,
    P480 = 480,
    P720 = 720,
    P1080 = 1080,
}

impl FormatCode {
    /// Every code, in ascending resolution order.
    pub const ALL: [FormatCode; 6] = [
        FormatCode::P144,
        FormatCode::P240,
        FormatCode::P360,
        FormatCode::P480,
        FormatCode::P720,
        FormatCode::P1080,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormatCode::P144 => "144",
            FormatCode::P240 => "240",
            FormatCode::P360 => "360",
            FormatCode::P480 => "480",
            FormatCode::P720 => "720",
            FormatCode::P1080 => "1080",
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        FormatCode::ALL
            .into_iter()
            .find(|code| i64::from(code.as_i32()) == value)
    }
}

impl Display for FormatCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("The selected format is invalid. Allowed: 144, 240, 360, 480, 720, 1080 (got '{0}')")]
pub struct InvalidFormatCode(pub String);

impl FromStr for FormatCode {
    type Err = InvalidFormatCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(FormatCode::from_i64)
            .ok_or_else(|| InvalidFormatCode(s.to_string()))
    }
}

impl Serialize for FormatCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

struct FormatCodeVisitor;

impl<'de> Visitor<'de> for FormatCodeVisitor {
    type Value = FormatCode;

    fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("one of 144, 240, 360, 480, 720, 1080 as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<FormatCode, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<FormatCode, E> {
        FormatCode::from_i64(v).ok_or_else(|| E::custom(InvalidFormatCode(v.to_string())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<FormatCode, E> {
        i64::try_from(v)
            .ok()
            .and_then(FormatCode::from_i64)
            .ok_or_else(|| E::custom(InvalidFormatCode(v.to_string())))
    }
}

impl<'de> Deserialize<'de> for FormatCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FormatCodeVisitor)
    }
}

/// A stored format variant row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoFormat {
    pub id: i64,
    pub code: FormatCode,
    pub uri: Option<String>,
    pub video_id: i64,
}

/// Delivered URIs keyed by format code; `None` until the encoder reports back.
pub type FormatMap = BTreeMap<FormatCode, Option<String>>;

pub fn format_map(formats: &[VideoFormat]) -> FormatMap {
    formats
        .iter()
        .map(|f| (f.code, f.uri.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_fixed_codes_only() {
        assert_eq!("720".parse::<FormatCode>().unwrap(), FormatCode::P720);
        assert_eq!(" 144 ".parse::<FormatCode>().unwrap(), FormatCode::P144);
        assert!("999".parse::<FormatCode>().is_err());
        assert!("hd".parse::<FormatCode>().is_err());
        assert!("".parse::<FormatCode>().is_err());
    }

    #[test]
    fn test_deserialize_from_string_or_number() {
        let from_str: FormatCode = serde_json::from_str("\"1080\"").unwrap();
        let from_num: FormatCode = serde_json::from_str("480").unwrap();
        assert_eq!(from_str, FormatCode::P1080);
        assert_eq!(from_num, FormatCode::P480);
        assert!(serde_json::from_str::<FormatCode>("481").is_err());
        assert!(serde_json::from_str::<FormatCode>("-144").is_err());
    }

    #[test]
    fn test_format_map_serializes_keyed_by_code_in_resolution_order() {
        let formats: Vec<VideoFormat> = FormatCode::ALL
            .iter()
            .rev()
            .enumerate()
            .map(|(i, code)| VideoFormat {
                id: i as i64,
                code: *code,
                uri: (*code == FormatCode::P360).then(|| "https://cdn/360.mp4".to_string()),
                video_id: 7,
            })
            .collect();

        let json = serde_json::to_string(&format_map(&formats)).unwrap();
        assert_eq!(
            json,
            r#"{"144":null,"240":null,"360":"https://cdn/360.mp4","480":null,"720":null,"1080":null}"#
        );
    }
}
