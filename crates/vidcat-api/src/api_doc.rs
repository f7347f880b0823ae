//! OpenAPI documentation, served at `/api-docs/openapi.json` and rendered by RapiDoc at `/docs`.

use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::error;
use crate::handlers;
use vidcat_core::models;

/// Envelope carrying a single video.
#[allow(dead_code)]
#[derive(Serialize, ToSchema)]
pub struct VideoEnvelope {
    #[schema(example = "Ok")]
    pub message: String,
    pub data: models::VideoResponse,
}

/// Envelope carrying one page of videos.
#[allow(dead_code)]
#[derive(Serialize, ToSchema)]
pub struct VideoListEnvelope {
    #[schema(example = "Ok")]
    pub message: String,
    pub data: Vec<models::VideoResponse>,
    pub pager: Vec<models::Pager>,
}

/// Envelope carrying the source path of a deleted video.
#[allow(dead_code)]
#[derive(Serialize, ToSchema)]
pub struct SourceEnvelope {
    #[schema(example = "Ok")]
    pub message: String,
    pub data: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidcat API",
        version = "0.1.0",
        description = "Video catalog: upload, list, rename, transfer and delete videos and record encoder deliveries. All catalog endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_get::list_videos,
        handlers::video_get::list_user_videos,
        handlers::video_get::get_video,
        handlers::video_encode::encode_video,
        handlers::video_update::update_video,
        handlers::video_delete::delete_video,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::VideoResponse,
            models::UserSummary,
            models::Pager,
            handlers::video_encode::EncodeRequest,
            handlers::video_update::UpdateVideoRequest,
            handlers::health::HealthCheckResponse,
            VideoEnvelope,
            VideoListEnvelope,
            SourceEnvelope,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video catalog"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
