//! Persistence for the video catalog
//!
//! Handlers depend on the [`VideoRepository`] and [`UserDirectory`] traits; the
//! Postgres implementations live in [`db`], and an in-memory catalog for tests is
//! available behind the `test-helpers` feature.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

pub use db::{PgUserDirectory, PgVideoRepository};
pub use traits::{UserDirectory, VideoRepository};
