use std::path::Path;
use vidcat_core::AppError;

pub const ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["video/mp4", "video/quicktime", "video/ogg", "application/ogg"];

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["mp4", "mov", "qt", "ogg", "ogv"];

/// Content types that say nothing about the payload; the file name decides instead
const GENERIC_CONTENT_TYPES: [&str; 2] = ["application/octet-stream", "binary/octet-stream"];

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum UploadValidationError {
    #[error("The source may not be greater than {max} bytes.")]
    FileTooLarge { size: u64, max: u64 },

    #[error("The source must be a file of type: mp4, mov, ogg, qt.")]
    InvalidType { content_type: String, filename: String },

    #[error("The source field is required.")]
    EmptyFile,
}

impl From<UploadValidationError> for AppError {
    fn from(err: UploadValidationError) -> Self {
        match err {
            UploadValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            other => AppError::Validation(other.to_string()),
        }
    }
}

/// Checks an incoming upload part against the size limit and the type allow-list.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: u64,
}

impl UploadValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate the declared type of a part.
    ///
    /// A specific content type must be on the allow-list. A missing or generic one
    /// falls back to the file name's extension.
    pub fn validate_type(
        &self,
        content_type: Option<&str>,
        filename: Option<&str>,
    ) -> Result<(), UploadValidationError> {
        let normalized = content_type
            .map(|ct| {
                ct.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_lowercase()
            })
            .filter(|ct| !ct.is_empty());

        let accepted = match normalized.as_deref() {
            Some(ct) if ALLOWED_CONTENT_TYPES.contains(&ct) => true,
            None => extension_allowed(filename),
            Some(ct) if GENERIC_CONTENT_TYPES.contains(&ct) => extension_allowed(filename),
            Some(_) => false,
        };

        if !accepted {
            return Err(UploadValidationError::InvalidType {
                content_type: content_type.unwrap_or_default().to_string(),
                filename: filename.unwrap_or_default().to_string(),
            });
        }

        Ok(())
    }

    /// Validate the running size of a part as it streams in
    pub fn validate_size(&self, size: u64) -> Result<(), UploadValidationError> {
        if size > self.max_file_size {
            return Err(UploadValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate the final size of a fully received part
    pub fn validate_complete(&self, size: u64) -> Result<(), UploadValidationError> {
        if size == 0 {
            return Err(UploadValidationError::EmptyFile);
        }
        self.validate_size(size)
    }
}

fn extension_allowed(filename: Option<&str>) -> bool {
    filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_content_types() {
        let v = UploadValidator::new(1024);
        assert!(v.validate_type(Some("video/mp4"), Some("a.bin")).is_ok());
        assert!(v.validate_type(Some("Video/QuickTime"), None).is_ok());
        assert!(v.validate_type(Some("application/ogg; codecs=theora"), None).is_ok());
        assert!(v.validate_type(Some("image/png"), Some("clip.mp4")).is_err());
    }

    #[test]
    fn test_generic_content_type_falls_back_to_extension() {
        let v = UploadValidator::new(1024);
        assert!(v
            .validate_type(Some("application/octet-stream"), Some("clip.MOV"))
            .is_ok());
        assert!(v.validate_type(None, Some("clip.ogv")).is_ok());
        assert!(v.validate_type(None, Some("clip.qt")).is_ok());
        assert!(v
            .validate_type(Some("application/octet-stream"), Some("clip.exe"))
            .is_err());
        assert!(v.validate_type(None, None).is_err());
    }

    #[test]
    fn test_size_limits() {
        let v = UploadValidator::new(10);
        assert!(v.validate_size(10).is_ok());
        assert!(matches!(
            v.validate_size(11),
            Err(UploadValidationError::FileTooLarge { size: 11, max: 10 })
        ));
        assert!(matches!(
            v.validate_complete(0),
            Err(UploadValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_error_mapping() {
        let too_large = AppError::from(UploadValidationError::FileTooLarge { size: 2, max: 1 });
        assert!(matches!(too_large, AppError::PayloadTooLarge(_)));
        let empty = AppError::from(UploadValidationError::EmptyFile);
        assert!(matches!(empty, AppError::Validation(_)));
    }
}
