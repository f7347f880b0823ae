pub mod video_lifecycle;

pub use video_lifecycle::{VideoEdit, VideoLifecycleService};
