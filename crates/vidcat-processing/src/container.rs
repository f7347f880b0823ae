use std::fmt::{self, Display, Formatter};

/// Container formats the catalog stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Mp4,
    QuickTime,
    Ogg,
}

impl Container {
    /// Extension given to stored files of this container
    pub fn extension(self) -> &'static str {
        match self {
            Container::Mp4 => "mp4",
            Container::QuickTime => "mov",
            Container::Ogg => "ogg",
        }
    }

    /// Map ffprobe's `format_name` (and the ISO `major_brand` tag, which is the only
    /// thing telling MP4 and QuickTime apart) to a container.
    pub fn from_probe(format_name: &str, major_brand: Option<&str>) -> Option<Self> {
        let names: Vec<&str> = format_name.split(',').map(str::trim).collect();

        if names.contains(&"ogg") {
            return Some(Container::Ogg);
        }

        if names.contains(&"mov") || names.contains(&"mp4") {
            let quicktime = major_brand
                .map(|b| b.trim().eq_ignore_ascii_case("qt"))
                .unwrap_or(false);
            return Some(if quicktime {
                Container::QuickTime
            } else {
                Container::Mp4
            });
        }

        None
    }
}

impl Display for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_probe() {
        let iso = "mov,mp4,m4a,3gp,3g2,mj2";
        assert_eq!(Container::from_probe(iso, Some("isom")), Some(Container::Mp4));
        assert_eq!(Container::from_probe(iso, None), Some(Container::Mp4));
        assert_eq!(
            Container::from_probe(iso, Some("qt  ")),
            Some(Container::QuickTime)
        );
        assert_eq!(Container::from_probe("ogg", None), Some(Container::Ogg));
        assert_eq!(Container::from_probe("matroska,webm", None), None);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(Container::Mp4.extension(), "mp4");
        assert_eq!(Container::QuickTime.extension(), "mov");
        assert_eq!(Container::Ogg.to_string(), "ogg");
    }
}
