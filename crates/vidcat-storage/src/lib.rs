//! vidcat storage library
//!
//! Uploaded originals live as flat files directly inside a single uploads root.
//! The [`UploadStore`] trait covers every filesystem step the catalog needs:
//! staging an incoming upload, moving it into place, renaming, and the
//! park/restore/purge sequence that lets a delete be undone when the database
//! write fails.
//!
//! # File names
//!
//! Stored files are addressed by a bare file name (`<stem>.<ext>`). Names must be a
//! single path component; anything that would resolve outside the root is rejected
//! with [`StorageError::InvalidPath`], and names longer than
//! [`MAX_FILE_NAME_BYTES`] with [`StorageError::NameTooLong`].

pub mod local;
pub mod naming;
pub mod traits;

pub use local::{LocalUploadStore, MAX_FILE_NAME_BYTES};
pub use naming::{extension_of, resolve_name, ResolvedName, TIMESTAMP_FORMAT};
pub use traits::{ParkedFile, StagedFile, StagingFile, StorageError, StorageResult, UploadStore};
