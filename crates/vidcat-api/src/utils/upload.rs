//! Multipart parsing for video uploads

use axum::extract::Multipart;
use vidcat_core::validation::validate_video_name;
use vidcat_core::AppError;
use vidcat_processing::{UploadValidationError, UploadValidator};
use vidcat_storage::{StagedFile, UploadStore};

use crate::error::HttpAppError;

pub const SOURCE_FIELD: &str = "source";
pub const NAME_FIELD: &str = "name";

/// A fully read upload form: the requested name and the staged file.
pub struct UploadForm {
    pub name: String,
    pub source: StagedFile,
}

/// Read the `name` and `source` parts of an upload form.
///
/// The file is streamed chunk by chunk into a staging file inside the uploads root
/// and the size limit is enforced while reading, so an oversized upload never sits
/// in memory. Unknown parts are skipped.
pub async fn read_upload_form(
    mut multipart: Multipart,
    store: &dyn UploadStore,
    validator: &UploadValidator,
) -> Result<UploadForm, HttpAppError> {
    let mut name: Option<String> = None;
    let mut source: Option<StagedFile> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            NAME_FIELD => {
                name = Some(field.text().await?);
            }
            SOURCE_FIELD => {
                if source.is_some() {
                    return Err(AppError::Validation(
                        "Multiple source fields are not allowed.".to_string(),
                    )
                    .into());
                }

                validator.validate_type(field.content_type(), field.file_name())?;

                let mut staging = store.stage().await?;
                while let Some(chunk) = field.chunk().await? {
                    validator.validate_size(staging.written() + chunk.len() as u64)?;
                    staging.write_chunk(&chunk).await?;
                }
                validator.validate_complete(staging.written())?;

                source = Some(staging.finish().await?);
            }
            other => {
                tracing::debug!(field = other, "Ignoring unexpected multipart field");
            }
        }
    }

    let name = name.ok_or_else(|| AppError::Validation("The name field is required.".to_string()))?;
    validate_video_name(&name)?;

    let source = source.ok_or(UploadValidationError::EmptyFile)?;

    Ok(UploadForm { name, source })
}
