//! Application state shared by every handler.

use std::sync::Arc;
use vidcat_core::Config;
use vidcat_db::{UserDirectory, VideoRepository};
use vidcat_processing::{MediaProber, UploadValidator};
use vidcat_storage::UploadStore;

use crate::services::video_lifecycle::VideoLifecycleService;

/// Catalog persistence: videos with their formats, and the read-only user directory.
#[derive(Clone)]
pub struct CatalogState {
    pub videos: Arc<dyn VideoRepository>,
    pub users: Arc<dyn UserDirectory>,
}

/// Upload handling: where files land, how they are checked and probed.
#[derive(Clone)]
pub struct MediaState {
    pub store: Arc<dyn UploadStore>,
    pub prober: Arc<dyn MediaProber>,
    pub validator: UploadValidator,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogState,
    pub media: MediaState,
}

impl AppState {
    pub fn new(config: Config, catalog: CatalogState, media: MediaState) -> Self {
        Self {
            config,
            catalog,
            media,
        }
    }

    /// Lifecycle operations bound to this state's collaborators.
    pub fn lifecycle(&self) -> VideoLifecycleService {
        VideoLifecycleService::new(
            self.catalog.videos.clone(),
            self.catalog.users.clone(),
            self.media.store.clone(),
            self.media.prober.clone(),
        )
    }
}
