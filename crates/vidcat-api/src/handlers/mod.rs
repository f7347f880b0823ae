pub mod health;
pub mod video_delete;
pub mod video_encode;
pub mod video_get;
pub mod video_update;
pub mod video_upload;
