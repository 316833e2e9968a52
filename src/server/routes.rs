//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{
    calls, campaigns, contacts, conversation_accounts, conversations, health, timelines,
};
use crate::middleware::{
    auth::{authenticate, AuthState},
    logging::log_request,
};
use crate::server::state::AppState;

/// Domain API routes, without any middleware attached.
///
/// Kept separate from [`create_router`] so handler tests can drive the
/// routes directly with an agent extension in place of the auth middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // calls
        .route("/calls", post(calls::create_call).get(calls::list_calls))
        .route("/calls/:id", get(calls::get_call).delete(calls::delete_call))
        .route("/calls/:id/hangup", post(calls::hangup_call))
        // contacts
        .route(
            "/contacts",
            post(contacts::create_contact).get(contacts::list_contacts),
        )
        .route(
            "/contacts/:id",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        // campaigns
        .route(
            "/campaigns",
            post(campaigns::create_campaign).get(campaigns::list_campaigns),
        )
        .route(
            "/campaigns/:id",
            get(campaigns::get_campaign)
                .put(campaigns::update_campaign)
                .delete(campaigns::delete_campaign),
        )
        // conversations
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/:id",
            get(conversations::get_conversation).put(conversations::update_conversation),
        )
        // conversation accounts
        .route(
            "/conversation_accounts",
            post(conversation_accounts::create_account)
                .get(conversation_accounts::list_accounts),
        )
        .route(
            "/conversation_accounts/:id",
            get(conversation_accounts::get_account)
                .put(conversation_accounts::update_account)
                .delete(conversation_accounts::delete_account),
        )
        // timelines
        .route(
            "/timelines/:resource_type/:resource_id/events",
            get(timelines::list_timeline_events),
        )
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes (no authentication required)
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/liveness", get(health::liveness));

    let auth_state = AuthState::new(state.settings.clone());

    // Authenticated domain routes, versioned under /v1.0
    let domain_routes =
        api_routes().layer(middleware::from_fn_with_state(auth_state, authenticate));

    Router::new()
        .nest("/v1.0", domain_routes)
        .merge(health_routes)
        // Apply middleware layers (order matters: first added = outermost = runs first)
        .layer(create_cors_layer())
        // Custom request logging with trace IDs
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Create CORS layer with permissive settings for development
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            // Expose trace ID headers to clients
            "x-trace-id".parse().unwrap(),
            "x-request-id".parse().unwrap(),
        ])
}
