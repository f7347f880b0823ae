use crate::auth::models::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath};
use crate::response::Reply;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;
use vidcat_core::models::{FormatCode, VideoResponse};
use vidcat_core::AppError;

/// Completion callback from the external encoder.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EncodeRequest {
    /// One of 144, 240, 360, 480, 720, 1080 (string or number)
    #[schema(value_type = String, example = "720")]
    pub format: FormatCode,
    /// URI of the delivered rendition
    #[validate(length(min = 1, max = 255, message = "The file must be between 1 and 255 characters."))]
    pub file: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/videos/{id}/encode",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    request_body = EncodeRequest,
    responses(
        (status = 200, description = "Encoding recorded", body = crate::api_doc::VideoEnvelope),
        (status = 400, description = "Invalid format or file", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(user_id = user.id, video_id = %id, operation = "encode_video")
)]
pub async fn encode_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(request): ValidatedJson<EncodeRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let details = state
        .lifecycle()
        .record_encoding(id, request.format, &request.file)
        .await?;

    Ok(Reply::ok(VideoResponse::from(details)))
}
