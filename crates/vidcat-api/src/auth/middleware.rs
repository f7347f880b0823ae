use crate::auth::jwt::JwtCodec;
use crate::auth::models::CurrentUser;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use vidcat_core::AppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtCodec,
}

fn authenticate(auth_state: &AuthState, request: &Request) -> Result<CurrentUser, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let claims = auth_state.jwt.validate(token.trim())?;
    Ok(CurrentUser {
        id: claims.user_id()?,
    })
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&auth_state, &request) {
        Ok(user) => {
            tracing::debug!(user_id = user.id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
