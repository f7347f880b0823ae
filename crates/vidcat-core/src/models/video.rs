use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::format::{format_map, FormatMap, VideoFormat};
use super::user::UserSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: i64,
    pub name: String,
    /// Whole seconds, truncated from the probed playtime.
    pub duration: i32,
    /// Absolute on-disk path of the stored upload.
    pub source: String,
    pub user_id: i64,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to register a freshly stored upload.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub name: String,
    pub duration: i32,
    pub source: String,
    pub user_id: i64,
}

/// Full replacement of the mutable video fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoChanges {
    pub name: String,
    pub source: String,
    pub user_id: i64,
}

/// A video joined with its owner and its six format rows.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetails {
    pub video: Video,
    pub owner: UserSummary,
    pub formats: Vec<VideoFormat>,
}

/// Video as returned to API clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: i64,
    pub name: String,
    pub duration: i32,
    pub source: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: UserSummary,
    /// Delivered URI per format code, `null` until encoded
    #[schema(value_type = Object)]
    pub format: FormatMap,
}

impl From<VideoDetails> for VideoResponse {
    fn from(details: VideoDetails) -> Self {
        let format = format_map(&details.formats);
        let video = details.video;

        VideoResponse {
            id: video.id,
            name: video.name,
            duration: video.duration,
            source: video.source,
            enabled: video.enabled,
            created_at: video.created_at,
            updated_at: video.updated_at,
            user: details.owner,
            format,
        }
    }
}

/// Substring filters accepted by the catalog listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilter {
    pub duration: Option<String>,
    pub name: Option<String>,
    /// Matches the owner's username or id text
    pub user: Option<String>,
    /// Exact owner restriction used by the per-user listing
    pub user_id: Option<i64>,
}

impl VideoFilter {
    pub fn for_user(user_id: i64) -> Self {
        VideoFilter {
            user_id: Some(user_id),
            ..Default::default()
        }
    }
}
