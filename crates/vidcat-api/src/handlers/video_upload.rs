use crate::auth::models::CurrentUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::response::Reply;
use crate::state::AppState;
use crate::utils::upload::read_upload_form;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
};
use std::sync::Arc;
use vidcat_core::models::VideoResponse;

#[utoipa::path(
    post,
    path = "/api/v1/videos",
    tag = "videos",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "`name` text part and `source` file part (mp4, mov, ogg, qt)"),
    responses(
        (status = 201, description = "Video uploaded successfully", body = crate::api_doc::VideoEnvelope),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[tracing::instrument(
    skip(state, multipart),
    fields(user_id = user.id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_upload_form(
        multipart,
        state.media.store.as_ref(),
        &state.media.validator,
    )
    .await?;

    let details = state
        .lifecycle()
        .upload(user.id, &form.name, form.source)
        .await?;

    Ok(Reply::created(VideoResponse::from(details)))
}
