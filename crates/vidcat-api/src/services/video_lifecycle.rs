//! Video lifecycle operations spanning the uploads directory and the catalog.
//!
//! File operations are not transactional with the database, so every mutation
//! touches the file first and undoes it if the database write fails.

use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vidcat_core::models::{
    FormatCode, NewVideo, Page, PageRequest, VideoChanges, VideoDetails, VideoFilter,
};
use vidcat_core::validation::validate_video_name;
use vidcat_core::AppError;
use vidcat_db::{UserDirectory, VideoRepository};
use vidcat_processing::MediaProber;
use vidcat_storage::{extension_of, resolve_name, ParkedFile, StagedFile, StorageError, UploadStore};

/// Requested edits to a video. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct VideoEdit {
    pub name: Option<String>,
    pub user_id: Option<i64>,
}

pub struct VideoLifecycleService {
    videos: Arc<dyn VideoRepository>,
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn UploadStore>,
    prober: Arc<dyn MediaProber>,
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl VideoLifecycleService {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn UploadStore>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        Self {
            videos,
            users,
            store,
            prober,
        }
    }

    /// Probe a staged upload, move it to a free name and register it.
    pub async fn upload(
        &self,
        owner_id: i64,
        name: &str,
        staged: StagedFile,
    ) -> Result<VideoDetails, AppError> {
        validate_video_name(name)?;

        if !self.users.exists(owner_id).await? {
            return Err(AppError::Unauthorized(format!(
                "Authenticated user {} is not registered",
                owner_id
            )));
        }

        let probe = self.prober.probe(staged.path()).await?;
        let extension = probe.container.extension();

        let resolved = resolve_name(self.store.as_ref(), name, extension, Utc::now(), None).await?;
        let path = self.store.persist(staged, &resolved.file_name).await?;

        let new_video = NewVideo {
            name: resolved.stem,
            duration: probe.duration_seconds,
            source: path_string(&path),
            user_id: owner_id,
        };

        match self.videos.create(new_video).await {
            Ok(details) => {
                tracing::info!(
                    video_id = details.video.id,
                    source = %details.video.source,
                    container = %probe.container,
                    duration = probe.duration_seconds,
                    "Video uploaded"
                );
                Ok(details)
            }
            Err(err) => {
                if let Err(cleanup) = self.store.remove(&path).await {
                    tracing::error!(
                        error = %cleanup,
                        path = %path.display(),
                        "Failed to remove stored upload after database error"
                    );
                }
                Err(err)
            }
        }
    }

    pub async fn list(
        &self,
        filter: &VideoFilter,
        page: PageRequest,
    ) -> Result<Page<VideoDetails>, AppError> {
        let page = self.videos.list(filter, page).await?;
        page.ensure_servable()?;
        Ok(page)
    }

    pub async fn get(&self, id: i64) -> Result<VideoDetails, AppError> {
        self.videos
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
    }

    pub async fn record_encoding(
        &self,
        id: i64,
        code: FormatCode,
        uri: &str,
    ) -> Result<VideoDetails, AppError> {
        let details = self
            .videos
            .record_encoding(id, code, uri)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        tracing::info!(video_id = id, format = %code, "Encoding recorded");
        Ok(details)
    }

    /// Fetch a video and check the caller owns it.
    async fn owned(&self, id: i64, caller_id: i64) -> Result<VideoDetails, AppError> {
        let details = self.get(id).await?;
        if details.video.user_id != caller_id {
            return Err(AppError::Unauthorized(format!(
                "User {} does not own video {}",
                caller_id, id
            )));
        }
        Ok(details)
    }

    /// Rename and/or reassign a video owned by the caller.
    pub async fn update(
        &self,
        id: i64,
        caller_id: i64,
        edit: VideoEdit,
    ) -> Result<VideoDetails, AppError> {
        if let Some(name) = edit.name.as_deref() {
            validate_video_name(name)?;
        }
        if let Some(user_id) = edit.user_id {
            if !self.users.exists(user_id).await? {
                return Err(AppError::Validation("The selected user is invalid.".to_string()));
            }
        }

        let current = self.owned(id, caller_id).await?;
        let current_path = PathBuf::from(&current.video.source);

        let (name, source_path) = match edit.name {
            Some(requested) if requested != current.video.name => {
                let extension = extension_of(&current_path).unwrap_or_default();
                let resolved = resolve_name(
                    self.store.as_ref(),
                    &requested,
                    &extension,
                    Utc::now(),
                    Some(&current_path),
                )
                .await?;
                let moved = self.store.rename(&current_path, &resolved.file_name).await?;
                (resolved.stem, moved)
            }
            _ => (current.video.name.clone(), current_path.clone()),
        };

        let changes = VideoChanges {
            name,
            source: path_string(&source_path),
            user_id: edit.user_id.unwrap_or(current.video.user_id),
        };

        let result = match self.videos.update(id, changes).await {
            Ok(Some(details)) => Ok(details),
            Ok(None) => Err(AppError::NotFound(format!("Video {} not found", id))),
            Err(err) => Err(err),
        };

        if result.is_err() && source_path != current_path {
            self.move_back(&source_path, &current_path).await;
        }

        let details = result?;
        tracing::info!(
            video_id = id,
            user_id = details.video.user_id,
            source = %details.video.source,
            "Video updated"
        );
        Ok(details)
    }

    async fn move_back(&self, moved: &Path, original: &Path) {
        let Some(file_name) = original.file_name().and_then(|n| n.to_str()) else {
            tracing::error!(path = %original.display(), "Cannot restore file without a name");
            return;
        };

        if let Err(e) = self.store.rename(moved, file_name).await {
            tracing::error!(
                error = %e,
                from = %moved.display(),
                to = %original.display(),
                "Failed to move file back after database error"
            );
        }
    }

    /// Delete a video owned by the caller; returns the removed source path.
    pub async fn delete(&self, id: i64, caller_id: i64) -> Result<String, AppError> {
        let current = self.owned(id, caller_id).await?;
        let source = current.video.source;

        let parked = match self.store.park(Path::new(&source)).await {
            Ok(parked) => Some(parked),
            Err(StorageError::NotFound(path)) => {
                tracing::warn!(video_id = id, path = %path, "Stored file already missing, deleting record only");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let result = match self.videos.delete(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::NotFound(format!("Video {} not found", id))),
            Err(err) => Err(err),
        };

        if let Err(err) = result {
            if let Some(parked) = parked {
                self.restore(parked).await;
            }
            return Err(err);
        }

        if let Some(parked) = parked {
            let hidden = parked.parked.clone();
            if let Err(e) = self.store.purge(parked).await {
                tracing::warn!(
                    error = %e,
                    path = %hidden.display(),
                    "Failed to purge parked file after delete"
                );
            }
        }

        tracing::info!(video_id = id, source = %source, "Video deleted");
        Ok(source)
    }

    async fn restore(&self, parked: ParkedFile) {
        let original = parked.original.clone();
        if let Err(e) = self.store.restore(parked).await {
            tracing::error!(
                error = %e,
                path = %original.display(),
                "Failed to restore parked file after database error"
            );
        }
    }
}
