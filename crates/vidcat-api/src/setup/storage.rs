//! Uploads directory and media prober setup

use anyhow::{Context, Result};
use std::sync::Arc;
use vidcat_core::Config;
use vidcat_processing::{FfprobeProber, MediaProber};
use vidcat_storage::{LocalUploadStore, UploadStore};

pub async fn setup_media(config: &Config) -> Result<(Arc<dyn UploadStore>, Arc<dyn MediaProber>)> {
    let store = LocalUploadStore::new(&config.upload_dir)
        .await
        .context("Failed to initialize uploads directory")?;
    tracing::info!(root = %store.root().display(), "Uploads directory ready");

    let prober = FfprobeProber::new(config.ffprobe_path.clone())
        .context("Invalid FFPROBE_PATH")?;
    tracing::info!(ffprobe_path = %config.ffprobe_path, "Media prober configured");

    Ok((Arc::new(store), Arc::new(prober)))
}
