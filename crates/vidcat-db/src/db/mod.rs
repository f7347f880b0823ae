//! Postgres repositories
//!
//! `videos` and `video_formats` are written here; `users` is read-only and
//! provisioned by the identity provider.

pub mod filters;
pub mod user;
pub mod video;

pub use user::PgUserDirectory;
pub use video::PgVideoRepository;
