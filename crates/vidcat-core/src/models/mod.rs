pub mod format;
pub mod pagination;
pub mod user;
pub mod video;

pub use format::{format_map, FormatCode, FormatMap, InvalidFormatCode, VideoFormat};
pub use pagination::{Page, PageRequest, Pager, DEFAULT_PAGE, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use user::{User, UserSummary};
pub use video::{NewVideo, Video, VideoChanges, VideoDetails, VideoFilter, VideoResponse};
