use crate::auth::models::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedPath};
use crate::response::Reply;
use crate::services::video_lifecycle::VideoEdit;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;
use vidcat_core::models::VideoResponse;
use vidcat_core::validation::video_name;
use vidcat_core::AppError;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVideoRequest {
    /// New owner user ID
    pub user: Option<i64>,
    /// New name; the stored file is renamed to match
    #[validate(custom(function = "video_name"))]
    pub name: Option<String>,
}

#[utoipa::path(
    put,
    path = "/api/v1/videos/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Video updated", body = crate::api_doc::VideoEnvelope),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(user_id = user.id, video_id = %id, operation = "update_video")
)]
pub async fn update_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateVideoRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let edit = VideoEdit {
        name: request.name,
        user_id: request.user,
    };
    let details = state.lifecycle().update(id, user.id, edit).await?;

    Ok(Reply::ok(VideoResponse::from(details)))
}
