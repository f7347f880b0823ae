//! Input validation shared by the upload and update paths.
//!
//! A video name becomes the stem of a file inside the uploads root, so it must be
//! a single safe path component.

use std::borrow::Cow;
use validator::ValidationError;

use crate::AppError;

/// Maximum length of a video name, in bytes.
///
/// The stored file name adds up to a 19-byte timestamp prefix, a `-N` suffix of
/// at most 6 bytes and a `.ext` of at most 5 bytes, and must stay within the
/// 255-byte file name limit.
pub const MAX_NAME_BYTES: usize = 255 - 19 - 6 - 5;

/// Maximum length of a delivered format URI, in characters.
pub const MAX_URI_LENGTH: usize = 255;

fn name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("The name field is required.");
    }
    if name.len() > MAX_NAME_BYTES {
        return Some("The name may not be greater than 225 bytes.");
    }
    if name.contains('/') || name.contains('\\') {
        return Some("The name may not contain path separators.");
    }
    if name.starts_with('.') || name.contains("..") {
        return Some("The name may not start with a dot or contain '..'.");
    }
    if name.chars().any(|c| c.is_control()) {
        return Some("The name may not contain control characters.");
    }
    None
}

/// Validate a requested video name.
pub fn validate_video_name(name: &str) -> Result<(), AppError> {
    match name_problem(name) {
        Some(msg) => Err(AppError::Validation(msg.to_string())),
        None => Ok(()),
    }
}

/// `validator` adapter for [`validate_video_name`], for `#[validate(custom(...))]`.
pub fn video_name(name: &str) -> Result<(), ValidationError> {
    match name_problem(name) {
        Some(msg) => Err(ValidationError::new("video_name").with_message(Cow::Borrowed(msg))),
        None => Ok(()),
    }
}
