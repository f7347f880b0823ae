//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState, JwtCodec};
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use vidcat_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        jwt: JwtCodec::new(&config.jwt_secret),
    };

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let api = public_routes().merge(protected);

    let app = Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(handlers::health::health_check))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/docs"))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            config
                .max_upload_size_bytes
                .saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Catalog reads, open to anonymous callers
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/videos", get(handlers::video_get::list_videos))
        .route("/videos/user/{id}", get(handlers::video_get::list_user_videos))
        .route("/videos/{id}", get(handlers::video_get::get_video))
}

/// Mutations, behind the bearer token middleware
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/videos", post(handlers::video_upload::upload_video))
        .route(
            "/videos/{id}",
            axum::routing::put(handlers::video_update::update_video)
                .delete(handlers::video_delete::delete_video),
        )
        .route("/videos/{id}/encode", post(handlers::video_encode::encode_video))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
