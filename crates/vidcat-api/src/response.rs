//! Success envelope shared by every catalog route.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use vidcat_core::models::{Page, Pager};

const OK: &str = "Ok";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Single-element list with the current and last page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pager: Option<Vec<Pager>>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            message: OK.to_string(),
            data: Some(data),
            pager: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    pub fn paged(page: Page<T>) -> Self {
        let pager = page.pager();
        Self {
            message: OK.to_string(),
            data: Some(page.items),
            pager: Some(vec![pager]),
        }
    }
}

/// Pairs an envelope with its status code.
pub struct Reply<T>(pub StatusCode, pub ApiResponse<T>);

impl<T: Serialize> Reply<T> {
    pub fn ok(data: T) -> Self {
        Reply(StatusCode::OK, ApiResponse::ok(data))
    }

    pub fn created(data: T) -> Self {
        Reply(StatusCode::CREATED, ApiResponse::ok(data))
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
