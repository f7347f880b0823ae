//! Stored file naming
//!
//! A requested name is used as-is when `<name>.<ext>` is free. Otherwise the name
//! gets a UTC timestamp prefix, and if that is taken too a `-N` suffix, so two
//! uploads never share a file.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::traits::{StorageError, StorageResult, UploadStore};

/// Prefix format applied to a name that collides with an existing file
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d-%H-%M-%S";

/// Largest `-N` suffix tried before giving up
pub const MAX_SUFFIX: u32 = 10_000;

static EXTENSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.([A-Za-z0-9]+)$").expect("Invalid extension regex"));

/// The stem recorded as the video name, and the file name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub stem: String,
    pub file_name: String,
}

impl ResolvedName {
    pub fn new(stem: impl Into<String>, extension: &str) -> Self {
        let stem = stem.into();
        let file_name = if extension.is_empty() {
            stem.clone()
        } else {
            format!("{}.{}", stem, extension)
        };
        ResolvedName { stem, file_name }
    }
}

/// Extension (without the dot) of the file name at the end of `path`.
pub fn extension_of(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    EXTENSION_REGEX
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

async fn is_free(
    store: &dyn UploadStore,
    candidate: &ResolvedName,
    current: Option<&Path>,
) -> StorageResult<bool> {
    if current.is_some_and(|path| store.root().join(&candidate.file_name) == path) {
        return Ok(true);
    }
    Ok(!store.exists(&candidate.file_name).await?)
}

/// Pick a free stored name for `requested` with the given extension.
///
/// `current` is the file being renamed, if any; resolving to its own name is not
/// a collision.
pub async fn resolve_name(
    store: &dyn UploadStore,
    requested: &str,
    extension: &str,
    now: DateTime<Utc>,
    current: Option<&Path>,
) -> StorageResult<ResolvedName> {
    let plain = ResolvedName::new(requested, extension);
    if is_free(store, &plain, current).await? {
        return Ok(plain);
    }

    let prefixed = format!("{}{}", now.format(TIMESTAMP_FORMAT), requested);
    let candidate = ResolvedName::new(prefixed.as_str(), extension);
    if is_free(store, &candidate, current).await? {
        tracing::debug!(requested, stored = %candidate.file_name, "Name collision, using timestamp prefix");
        return Ok(candidate);
    }

    for n in 1..=MAX_SUFFIX {
        let candidate = ResolvedName::new(format!("{}-{}", prefixed, n), extension);
        if is_free(store, &candidate, current).await? {
            tracing::debug!(requested, stored = %candidate.file_name, "Name collision, using numbered suffix");
            return Ok(candidate);
        }
    }

    Err(StorageError::AlreadyExists(format!(
        "no free file name for '{}'",
        requested
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalUploadStore;
    use chrono::TimeZone;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 12, 5, 7).unwrap()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(
            extension_of(&PathBuf::from("/srv/uploads/clip.mp4")),
            Some("mp4".to_string())
        );
        assert_eq!(
            extension_of(&PathBuf::from("/srv/uploads/my.holiday.MOV")),
            Some("MOV".to_string())
        );
        assert_eq!(extension_of(&PathBuf::from("/srv/uploads/noext")), None);
    }

    #[test]
    fn test_resolved_name_without_extension() {
        let name = ResolvedName::new("clip", "");
        assert_eq!(name.file_name, "clip");
    }

    #[tokio::test]
    async fn test_free_name_is_used_as_is() {
        let dir = tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();

        let name = resolve_name(&store, "clip", "mp4", at_noon(), None)
            .await
            .unwrap();
        assert_eq!(name, ResolvedName::new("clip", "mp4"));
    }

    #[tokio::test]
    async fn test_collision_gets_timestamp_then_suffix() {
        let dir = tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        std::fs::write(store.root().join("clip.mp4"), b"1").unwrap();

        let second = resolve_name(&store, "clip", "mp4", at_noon(), None)
            .await
            .unwrap();
        assert_eq!(second.stem, "2024_03_09-12-05-07clip");
        assert_eq!(second.file_name, "2024_03_09-12-05-07clip.mp4");

        std::fs::write(store.root().join(&second.file_name), b"2").unwrap();
        let third = resolve_name(&store, "clip", "mp4", at_noon(), None)
            .await
            .unwrap();
        assert_eq!(third.file_name, "2024_03_09-12-05-07clip-1.mp4");
    }

    #[tokio::test]
    async fn test_longest_valid_name_still_fits_after_collisions() {
        use vidcat_core::validation::MAX_NAME_BYTES;

        let dir = tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        let name = "b".repeat(MAX_NAME_BYTES);

        std::fs::write(store.root().join(format!("{}.mp4", name)), b"1").unwrap();
        let second = resolve_name(&store, &name, "mp4", at_noon(), None)
            .await
            .unwrap();
        std::fs::write(store.root().join(&second.file_name), b"2").unwrap();
        let third = resolve_name(&store, &name, "mp4", at_noon(), None)
            .await
            .unwrap();

        assert_ne!(second.file_name, third.file_name);
        assert!(third.file_name.ends_with("-1.mp4"));

        let worst = format!(
            "{}{}-{}.mp4",
            at_noon().format(TIMESTAMP_FORMAT),
            name,
            MAX_SUFFIX
        );
        assert!(worst.len() <= crate::MAX_FILE_NAME_BYTES);
    }

    #[tokio::test]
    async fn test_own_name_is_not_a_collision() {
        let dir = tempdir().unwrap();
        let store = LocalUploadStore::new(dir.path()).await.unwrap();
        let current = store.root().join("clip.mp4");
        std::fs::write(&current, b"1").unwrap();

        let name = resolve_name(&store, "clip", "mp4", at_noon(), Some(&current))
            .await
            .unwrap();
        assert_eq!(name.file_name, "clip.mp4");
    }
}
