//! Upload store abstraction
//!
//! This module defines the [`UploadStore`] trait and the file handles that move
//! through it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use vidcat_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Staging failed: {0}")]
    StagingFailed(String),

    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("File name too long: {0}")]
    NameTooLong(String),

    /// A recorded path that no longer lies inside the uploads root
    #[error("Path outside uploads directory: {0}")]
    OutsideRoot(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidPath(msg) | StorageError::NameTooLong(msg) => {
                AppError::Validation(msg)
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// An upload being written to a hidden temporary file inside the uploads root.
///
/// Dropping it before [`StagingFile::finish`] removes the partial file.
pub struct StagingFile {
    temp: TempPath,
    file: fs::File,
    written: u64,
}

impl StagingFile {
    pub(crate) fn new(temp: TempPath, file: fs::File) -> Self {
        StagingFile {
            temp,
            file,
            written: 0,
        }
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> StorageResult<()> {
        self.file.write_all(chunk).await.map_err(|e| {
            StorageError::StagingFailed(format!(
                "Failed to write staging file {}: {}",
                self.temp.display(),
                e
            ))
        })?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and sync the staged bytes, closing the write handle.
    pub async fn finish(mut self) -> StorageResult<StagedFile> {
        self.file.flush().await?;
        self.file.sync_all().await.map_err(|e| {
            StorageError::StagingFailed(format!(
                "Failed to sync staging file {}: {}",
                self.temp.display(),
                e
            ))
        })?;

        Ok(StagedFile {
            temp: self.temp,
            size: self.written,
        })
    }
}

/// A fully written upload waiting to be probed and persisted.
///
/// Dropping it removes the file.
#[derive(Debug)]
pub struct StagedFile {
    pub(crate) temp: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// A stored file moved aside under a hidden name while its record is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkedFile {
    pub original: PathBuf,
    pub parked: PathBuf,
}

/// Filesystem operations over the uploads root.
///
/// All stored files are direct children of [`UploadStore::root`]. Paths handed
/// back by the store are absolute and are what the catalog records as a video's
/// source.
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Absolute uploads root
    fn root(&self) -> &Path;

    /// Open a new staging file inside the root
    async fn stage(&self) -> StorageResult<StagingFile>;

    /// Whether `file_name` is taken inside the root
    async fn exists(&self, file_name: &str) -> StorageResult<bool>;

    /// Move a staged upload to `file_name` without overwriting, returning its path
    async fn persist(&self, staged: StagedFile, file_name: &str) -> StorageResult<PathBuf>;

    /// Rename a stored file to `file_name` without overwriting, returning the new path
    async fn rename(&self, from: &Path, file_name: &str) -> StorageResult<PathBuf>;

    /// Move a stored file aside under a hidden name
    async fn park(&self, path: &Path) -> StorageResult<ParkedFile>;

    /// Put a parked file back at its original path
    async fn restore(&self, parked: ParkedFile) -> StorageResult<PathBuf>;

    /// Permanently delete a parked file
    async fn purge(&self, parked: ParkedFile) -> StorageResult<()>;

    /// Delete a stored file; a missing file is not an error
    async fn remove(&self, path: &Path) -> StorageResult<()>;
}
