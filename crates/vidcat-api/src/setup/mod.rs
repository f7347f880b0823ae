//! Application setup and initialization
//!
//! Everything main.rs needs to go from a loaded [`Config`] to a served router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::{AppState, CatalogState, MediaState};
use anyhow::{Context, Result};
use std::sync::Arc;
use vidcat_core::Config;
use vidcat_db::{PgUserDirectory, PgVideoRepository};
use vidcat_processing::UploadValidator;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let (store, prober) = storage::setup_media(&config).await?;

    let catalog = CatalogState {
        videos: Arc::new(PgVideoRepository::new(pool.clone())),
        users: Arc::new(PgUserDirectory::new(pool)),
    };
    let media = MediaState {
        store,
        prober,
        validator: UploadValidator::new(config.max_upload_size_bytes as u64),
    };

    let state = Arc::new(AppState::new(config.clone(), catalog, media));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
