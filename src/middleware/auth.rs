//! Authentication middleware
//!
//! Authenticates the caller from a bearer token and attaches the resulting
//! [`Agent`] to request extensions. Handlers never look at credentials;
//! they only read the agent (and answer 400 when it is missing, since a
//! request without an agent means the middleware chain upstream of the
//! handler was bypassed or misconfigured).

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Settings;
use crate::schemas::agent::Agent;

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub agent_id: Uuid,
    pub customer_id: Uuid,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub permission: u64,

    pub exp: usize,
}

impl From<Claims> for Agent {
    fn from(claims: Claims) -> Self {
        Agent {
            id: claims.agent_id,
            customer_id: claims.customer_id,
            username: claims.username,
            name: claims.name,
            permission: claims.permission,
        }
    }
}

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    /// No access token provided in request
    MissingToken,
    /// Token is invalid, expired, or signed with the wrong key
    InvalidToken,
    /// Internal error during authentication
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "Missing access token. Include 'Authorization: Bearer <token>' in your request.",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "authentication_error",
                "Invalid access token.",
            ),
            AuthError::InternalError(msg) => {
                tracing::error!(error = %msg, "Authentication internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "api_error",
                    "An internal error occurred during authentication.",
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": { "type": error_type, "message": message }
        }));
        (status, body).into_response()
    }
}

/// Authentication state required by the middleware
#[derive(Clone)]
pub struct AuthState {
    pub settings: Arc<Settings>,
}

impl AuthState {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

/// Middleware to authenticate the caller and attach the agent
///
/// 1. Extracts the bearer token from the `Authorization` header
/// 2. Accepts the ephemeral development token (if one was generated)
/// 3. Otherwise verifies the JWT and builds the agent from its claims
/// 4. Injects [`Agent`] into request extensions on success
pub async fn authenticate(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if !auth_state.settings.require_auth {
        tracing::debug!("Authentication disabled, injecting anonymous agent");
        request.extensions_mut().insert(anonymous_agent());
        return Ok(next.run(request).await);
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        tracing::warn!("Request missing access token");
        return Err(AuthError::MissingToken);
    };

    // Ephemeral development token generated at startup
    if let Some(ref ephemeral) = auth_state.settings.ephemeral_access_token {
        if token == *ephemeral {
            tracing::debug!("Ephemeral development token authenticated");
            request.extensions_mut().insert(anonymous_agent());
            return Ok(next.run(request).await);
        }
    }

    let Some(ref secret) = auth_state.settings.jwt_secret else {
        return Err(AuthError::InternalError(
            "no JWT secret configured".to_string(),
        ));
    };

    let agent = verify_token(&token, secret)?;
    tracing::debug!(agent_id = %agent.id, username = %agent.username, "Agent authenticated");
    request.extensions_mut().insert(agent);
    Ok(next.run(request).await)
}

/// Verify a JWT access token and build the agent from its claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Agent, AuthError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| {
        tracing::warn!(error = %err, "Token verification failed");
        AuthError::InvalidToken
    })?;
    Ok(data.claims.into())
}

fn anonymous_agent() -> Agent {
    Agent {
        id: Uuid::nil(),
        customer_id: Uuid::nil(),
        username: "anonymous".to_string(),
        name: "Anonymous".to_string(),
        permission: 0,
    }
}
