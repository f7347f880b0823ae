//! Test helpers: build AppState and router for integration tests.
//!
//! The catalog is the in-memory implementation from `vidcat-db` (feature
//! `test-helpers`), uploads land in a temporary directory and probing is stubbed,
//! so these tests need neither Postgres nor ffprobe.

#![allow(dead_code)]

pub mod postgres;

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use chrono::Duration;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use vidcat_api::auth::JwtCodec;
use vidcat_api::setup::routes;
use vidcat_api::state::{AppState, CatalogState, MediaState};
use vidcat_core::Config;
use vidcat_db::test_helpers::InMemoryCatalog;
use vidcat_processing::{Container, MediaProbe, MediaProber, ProbeError, UploadValidator};
use vidcat_storage::LocalUploadStore;

pub const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const PROBED_DURATION: i32 = 12;

/// Prober returning a fixed result without looking at the file.
pub struct StubProber {
    container: Option<Container>,
}

impl StubProber {
    pub fn mp4() -> Self {
        Self {
            container: Some(Container::Mp4),
        }
    }

    /// Reports a container the catalog does not accept
    pub fn unsupported() -> Self {
        Self { container: None }
    }
}

#[async_trait]
impl MediaProber for StubProber {
    async fn probe(&self, _path: &Path) -> Result<MediaProbe, ProbeError> {
        match self.container {
            Some(container) => Ok(MediaProbe {
                container,
                duration_seconds: PROBED_DURATION,
            }),
            None => Err(ProbeError::UnsupportedContainer("matroska,webm".to_string())),
        }
    }
}

/// Test application: server plus handles on the catalog and uploads directory.
pub struct TestApp {
    pub server: TestServer,
    pub catalog: InMemoryCatalog,
    pub uploads: PathBuf,
    _uploads_dir: TempDir,
    jwt: JwtCodec,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// `Authorization` header value for `user_id`
    pub fn bearer(&self, user_id: i64) -> String {
        let token = self
            .jwt
            .issue(user_id, Duration::hours(1))
            .expect("Failed to issue test token");
        format!("Bearer {}", token)
    }

    /// Visible file names in the uploads directory, sorted
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.uploads)
            .expect("Failed to read uploads directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        names
    }

    /// Every entry in the uploads directory, hidden ones included
    pub fn all_entries(&self) -> usize {
        std::fs::read_dir(&self.uploads)
            .expect("Failed to read uploads directory")
            .count()
    }

    pub async fn upload(&self, user_id: i64, name: &str) -> TestResponse {
        self.server
            .post("/api/v1/videos")
            .add_header("Authorization", self.bearer(user_id))
            .multipart(upload_form(name, video_part(b"fake mp4 payload".to_vec())))
            .await
    }

    /// Upload and return the created video's JSON
    pub async fn upload_ok(&self, user_id: i64, name: &str) -> serde_json::Value {
        let response = self.upload(user_id, name).await;
        assert_eq!(response.status_code(), 201, "{}", response.text());
        response.json::<serde_json::Value>()["data"].clone()
    }
}

pub fn video_part(bytes: Vec<u8>) -> Part {
    Part::bytes(bytes)
        .file_name("movie.mp4")
        .mime_type("video/mp4")
}

pub fn upload_form(name: &str, source: Part) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_part("source", source)
}

pub fn test_config(uploads: &Path, max_upload_size_bytes: usize) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        database_url: "postgres://unused@localhost/vidcat".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        cors_origins: vec!["*".to_string()],
        jwt_secret: JWT_SECRET.to_string(),
        upload_dir: uploads.to_path_buf(),
        max_upload_size_bytes,
        ffprobe_path: "ffprobe".to_string(),
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(StubProber::mp4(), 1024 * 1024).await
}

pub async fn setup_test_app_with(prober: StubProber, max_upload_size_bytes: usize) -> TestApp {
    let uploads_dir = TempDir::new().expect("Failed to create uploads directory");
    let store = LocalUploadStore::new(uploads_dir.path())
        .await
        .expect("Failed to open upload store");
    let uploads = vidcat_storage::UploadStore::root(&store).to_path_buf();

    let catalog = InMemoryCatalog::new();
    catalog.add_user(ALICE, "alice");
    catalog.add_user(BOB, "bob");

    let config = test_config(&uploads, max_upload_size_bytes);
    let state = Arc::new(AppState::new(
        config.clone(),
        CatalogState {
            videos: Arc::new(catalog.clone()),
            users: Arc::new(catalog.clone()),
        },
        MediaState {
            store: Arc::new(store),
            prober: Arc::new(prober),
            validator: UploadValidator::new(max_upload_size_bytes as u64),
        },
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        catalog,
        uploads,
        _uploads_dir: uploads_dir,
        jwt: JwtCodec::new(JWT_SECRET),
    }
}
