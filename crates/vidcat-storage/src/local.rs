use crate::traits::{
    ParkedFile, StagedFile, StagingFile, StorageError, StorageResult, UploadStore,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use uuid::Uuid;

const STAGING_PREFIX: &str = ".staging-";
const PARKED_PREFIX: &str = ".parked-";

/// Longest file name most filesystems accept, in bytes
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Uploads root on the local filesystem
#[derive(Clone, Debug)]
pub struct LocalUploadStore {
    root: PathBuf,
}

impl LocalUploadStore {
    /// Create the root if needed and resolve it to an absolute path
    ///
    /// # Arguments
    /// * `root` - Directory holding the stored uploads (e.g., "./public/uploads")
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create uploads directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let root = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to resolve uploads directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalUploadStore { root })
    }

    /// Convert a bare file name to its path inside the root
    ///
    /// Only a single, non-hidden path component is accepted.
    fn file_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
            || file_name.starts_with('.')
            || file_name.chars().any(|c| c.is_control())
        {
            return Err(StorageError::InvalidPath(format!(
                "'{}' is not a valid file name",
                file_name
            )));
        }
        if file_name.len() > MAX_FILE_NAME_BYTES {
            return Err(StorageError::NameTooLong(format!(
                "The stored file name may not exceed {} bytes",
                MAX_FILE_NAME_BYTES
            )));
        }

        Ok(self.root.join(file_name))
    }

    /// Check that `path` names a direct child of the root
    fn ensure_inside_root(&self, path: &Path) -> StorageResult<()> {
        let inside = match path.parent() {
            Some(parent) if parent == self.root => true,
            Some(parent) => parent
                .canonicalize()
                .map(|p| p == self.root)
                .unwrap_or(false),
            None => false,
        };

        let named = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n != "." && n != "..");

        if !(inside && named) {
            return Err(StorageError::OutsideRoot(format!(
                "{} is outside the uploads directory",
                path.display()
            )));
        }
        Ok(())
    }

    async fn try_exists(path: &Path) -> StorageResult<bool> {
        Ok(fs::try_exists(path).await?)
    }

    /// Rename `from` to `to`, refusing to replace an existing file
    async fn move_no_clobber(from: &Path, to: &Path) -> StorageResult<()> {
        if Self::try_exists(to).await? {
            return Err(StorageError::AlreadyExists(to.display().to_string()));
        }

        fs::rename(from, to).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound(from.display().to_string())
            } else {
                StorageError::MoveFailed(format!(
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    e
                ))
            }
        })
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn stage(&self) -> StorageResult<StagingFile> {
        let named = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.root)
            .map_err(|e| {
                StorageError::StagingFailed(format!(
                    "Failed to create staging file in {}: {}",
                    self.root.display(),
                    e
                ))
            })?;

        let (file, temp) = named.into_parts();

        tracing::debug!(path = %temp.display(), "Opened staging file");

        Ok(StagingFile::new(temp, fs::File::from_std(file)))
    }

    async fn exists(&self, file_name: &str) -> StorageResult<bool> {
        let path = self.file_path(file_name)?;
        Self::try_exists(&path).await
    }

    async fn persist(&self, staged: StagedFile, file_name: &str) -> StorageResult<PathBuf> {
        let path = self.file_path(file_name)?;
        let size = staged.size();
        let start = Instant::now();

        staged.temp.persist_noclobber(&path).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                StorageError::AlreadyExists(path.display().to_string())
            } else {
                StorageError::MoveFailed(format!(
                    "Failed to persist upload to {}: {}",
                    path.display(),
                    e.error
                ))
            }
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored upload"
        );

        Ok(path)
    }

    async fn rename(&self, from: &Path, file_name: &str) -> StorageResult<PathBuf> {
        self.ensure_inside_root(from)?;
        let to = self.file_path(file_name)?;
        let start = Instant::now();

        if to == from {
            return Ok(to);
        }

        Self::move_no_clobber(from, &to).await?;

        tracing::info!(
            from = %from.display(),
            to = %to.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Renamed stored upload"
        );

        Ok(to)
    }

    async fn park(&self, path: &Path) -> StorageResult<ParkedFile> {
        self.ensure_inside_root(path)?;
        let parked = self
            .root
            .join(format!("{}{}", PARKED_PREFIX, Uuid::new_v4().simple()));

        Self::move_no_clobber(path, &parked).await?;

        tracing::debug!(
            path = %path.display(),
            parked = %parked.display(),
            "Parked stored upload"
        );

        Ok(ParkedFile {
            original: path.to_path_buf(),
            parked,
        })
    }

    async fn restore(&self, parked: ParkedFile) -> StorageResult<PathBuf> {
        self.ensure_inside_root(&parked.parked)?;
        Self::move_no_clobber(&parked.parked, &parked.original).await?;

        tracing::info!(path = %parked.original.display(), "Restored parked upload");

        Ok(parked.original)
    }

    async fn purge(&self, parked: ParkedFile) -> StorageResult<()> {
        self.ensure_inside_root(&parked.parked)?;
        let start = Instant::now();

        fs::remove_file(&parked.parked).await.map_err(|e| {
            StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                parked.parked.display(),
                e
            ))
        })?;

        tracing::info!(
            path = %parked.original.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Deleted stored upload"
        );

        Ok(())
    }

    async fn remove(&self, path: &Path) -> StorageResult<()> {
        self.ensure_inside_root(path)?;

        if !Self::try_exists(path).await? {
            return Ok(());
        }

        fs::remove_file(path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Removed stored upload");

        Ok(())
    }
}
