//! Repository traits
//!
//! These traits are the seam between the HTTP layer and the database, so handlers
//! can be exercised against an in-memory catalog.

use async_trait::async_trait;
use vidcat_core::models::{
    FormatCode, NewVideo, Page, PageRequest, UserSummary, VideoChanges, VideoDetails, VideoFilter,
};
use vidcat_core::AppError;

/// Video and format-variant records
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a video together with its six empty format rows, atomically
    async fn create(&self, video: NewVideo) -> Result<VideoDetails, AppError>;

    /// Fetch one video with its owner and formats
    async fn get(&self, id: i64) -> Result<Option<VideoDetails>, AppError>;

    /// One page of videos matching `filter`, ordered by id
    async fn list(
        &self,
        filter: &VideoFilter,
        page: PageRequest,
    ) -> Result<Page<VideoDetails>, AppError>;

    /// Enable the video and set the delivered URI of one format, atomically.
    /// Returns `None` when the video does not exist.
    async fn record_encoding(
        &self,
        id: i64,
        code: FormatCode,
        uri: &str,
    ) -> Result<Option<VideoDetails>, AppError>;

    /// Replace name, source and owner. Returns `None` when the video does not exist.
    async fn update(
        &self,
        id: i64,
        changes: VideoChanges,
    ) -> Result<Option<VideoDetails>, AppError>;

    /// Delete the video and, by cascade, its formats. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Check the backing store is reachable
    async fn ping(&self) -> Result<(), AppError>;
}

/// Read-only view of the users owned by the identity provider
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<UserSummary>, AppError>;

    async fn exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.get_user(id).await?.is_some())
    }
}
