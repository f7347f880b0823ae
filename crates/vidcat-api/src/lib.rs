//! Vidcat API Library
//!
//! HTTP handlers, authentication, and application setup for the video catalog.

mod api_doc;
pub mod constants;
mod handlers;
mod response;
pub mod services;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::ErrorResponse;
