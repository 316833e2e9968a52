//! API endpoint handlers module
//!
//! One handler per REST operation. Every handler follows the same shape:
//! pull the authenticated agent out of request extensions, bind the typed
//! input, call the backend facade, wrap the result. The shared extraction
//! helpers live here; everything domain-specific lives in the per-domain
//! modules.

pub mod calls;
pub mod campaigns;
pub mod contacts;
pub mod conversation_accounts;
pub mod conversations;
pub mod health;
pub mod timelines;

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use uuid::Uuid;

use crate::error::ApiError;
use crate::schemas::Agent;

/// Extract the agent the auth middleware injected into request extensions.
/// Absence means the middleware was bypassed or misconfigured; it aborts
/// the handler with a 400 like any other malformed request.
pub(crate) fn require_agent(agent: Option<Extension<Agent>>) -> Result<Agent, ApiError> {
    match agent {
        Some(Extension(agent)) => Ok(agent),
        None => {
            tracing::error!("Could not find agent info");
            Err(ApiError::MissingAgent)
        }
    }
}

/// Parse a path segment as a UUID.
pub(crate) fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::BadRequest(format!("invalid id: {id}")))
}

/// Unwrap a JSON body extractor, reporting decode failures as a 400 rather
/// than axum's default 422.
pub(crate) fn bind<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Failed to bind request body");
            Err(ApiError::BadRequest(rejection.to_string()))
        }
    }
}
