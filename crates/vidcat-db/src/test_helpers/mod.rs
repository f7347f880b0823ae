//! Test helpers for crates depending on the repository traits

pub mod memory;

pub use memory::InMemoryCatalog;
