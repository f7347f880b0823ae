use crate::error::{ErrorResponse, HttpAppError, ValidatedPath, ValidatedQuery};
use crate::response::{ApiResponse, Reply};
use crate::state::AppState;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use vidcat_core::models::{PageRequest, VideoFilter, VideoResponse};

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Page size (default 5, at most 100)
    pub per_page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Substring of the duration in seconds
    pub duration: Option<String>,
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    /// Owner username (case-insensitive substring) or owner id
    pub user: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of videos", body = crate::api_doc::VideoListEnvelope),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 404, description = "Empty page", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageRequest::new(query.page, query.per_page)?;
    let filter = VideoFilter {
        duration: query.duration,
        name: query.name,
        user: query.user,
        user_id: None,
    };

    let videos = state.lifecycle().list(&filter, page).await?;

    Ok(Json(ApiResponse::paged(videos.map(VideoResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/user/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Owner user ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Page of the user's videos", body = crate::api_doc::VideoListEnvelope),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 404, description = "Empty page", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(owner_id = %id, operation = "list_user_videos"))]
pub async fn list_user_videos(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = PageRequest::new(query.page, query.per_page)?;

    let videos = state
        .lifecycle()
        .list(&VideoFilter::for_user(id), page)
        .await?;

    Ok(Json(ApiResponse::paged(videos.map(VideoResponse::from))))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{id}",
    tag = "videos",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = crate::api_doc::VideoEnvelope),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(video_id = %id, operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<impl IntoResponse, HttpAppError> {
    let details = state.lifecycle().get(id).await?;
    Ok(Reply::ok(VideoResponse::from(details)))
}
