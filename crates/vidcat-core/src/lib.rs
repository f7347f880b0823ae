//! Vidcat Core Library
//!
//! This crate provides the domain models, error types, configuration and input
//! validation shared by every vidcat component.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
