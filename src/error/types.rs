//! API error types
//!
//! The taxonomy is deliberately coarse: nearly every failure in this layer
//! is the caller's problem and aborts the handler with a bare 400, exactly
//! one status code per request. Only the newer timeline-style handlers
//! classify backend failures further (404/403/502/500) and carry a JSON
//! error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::patch::PatchError;
use crate::schemas::fields::FieldError;
use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// No agent in request extensions. Signals an upstream middleware
    /// failure, but is reported like any malformed request.
    #[error("could not find agent info")]
    MissingAgent,

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Field(#[from] FieldError),

    #[error("{0}")]
    Patch(#[from] PatchError),

    /// A backend failure reported the legacy way: always a 400, whatever
    /// the actual cause.
    #[error("backend call failed: {0}")]
    Backend(ServiceError),

    #[error("resource not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("upstream unavailable: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Flatten a backend error into the legacy-shape 400.
    pub fn backend(err: ServiceError) -> Self {
        ApiError::Backend(err)
    }

    /// Classify a backend error the way the timeline-style handlers do.
    pub fn classify(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::PermissionDenied => ApiError::PermissionDenied,
            ServiceError::Unavailable(msg) => ApiError::Upstream(msg),
            ServiceError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Legacy-shape failures: bare status code, no body, matching
            // the behavior of the vast majority of handlers.
            ApiError::MissingAgent
            | ApiError::BadRequest(_)
            | ApiError::Field(_)
            | ApiError::Patch(_)
            | ApiError::Backend(_) => StatusCode::BAD_REQUEST.into_response(),

            ApiError::NotFound => error_body(
                StatusCode::NOT_FOUND,
                "not_found_error",
                "resource not found",
            ),
            ApiError::PermissionDenied => error_body(
                StatusCode::FORBIDDEN,
                "permission_error",
                "user has no permission",
            ),
            ApiError::Upstream(msg) => {
                error_body(StatusCode::BAD_GATEWAY, "upstream_error", &msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                error_body(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "api_error",
                    "an internal error occurred",
                )
            }
        }
    }
}

fn error_body(status: StatusCode, error_type: &str, message: &str) -> Response {
    let body = Json(ErrorResponse {
        error: ErrorDetail {
            type_: error_type.to_string(),
            message: message.to_string(),
        },
    });
    (status, body).into_response()
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    type_: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_failures_map_to_bare_400() {
        for err in [
            ApiError::MissingAgent,
            ApiError::BadRequest("bad".to_string()),
            ApiError::Backend(ServiceError::NotFound),
            ApiError::Field(FieldError::Unknown("bogus".to_string())),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn classified_backend_errors_keep_their_status() {
        let response = ApiError::classify(ServiceError::NotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::classify(ServiceError::PermissionDenied).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response =
            ApiError::classify(ServiceError::Unavailable("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response =
            ApiError::classify(ServiceError::Internal("boom".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
