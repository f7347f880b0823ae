use crate::auth::models::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedPath};
use crate::response::Reply;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/v1/videos/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video deleted; data is the removed source path", body = crate::api_doc::SourceEnvelope),
        (status = 401, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(
    skip(state),
    fields(user_id = user.id, video_id = %id, operation = "delete_video")
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let source = state.lifecycle().delete(id, user.id).await?;
    Ok(Reply::ok(source))
}
