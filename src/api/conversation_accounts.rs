//! Conversation account endpoints
//!
//! Accounts hold the credentials for external messaging channels; their
//! secret and token are mutable through the same sparse-patch pipeline as
//! the display fields.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::{bind, parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{generate_list_response, ListResponse, PageParams};
use crate::patch::SparsePatch;
use crate::schemas::conversation_account::{
    convert_field_map, ConversationAccount, ConversationAccountCreateRequest,
    ConversationAccountUpdateRequest,
};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// GET /conversation_accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<ConversationAccount>>, ApiError> {
    let agent = require_agent(agent)?;

    let accounts = state
        .service
        .conversation_account_gets(&agent, params.effective_size(), &params.effective_token())
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(generate_list_response(accounts)))
}

/// POST /conversation_accounts
pub async fn create_account(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    body: Result<Json<ConversationAccountCreateRequest>, JsonRejection>,
) -> Result<Json<ConversationAccount>, ApiError> {
    let agent = require_agent(agent)?;
    let req = bind(body)?;

    let account = state
        .service
        .conversation_account_create(&agent, req.into())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(account))
}

/// GET /conversation_accounts/{id}
pub async fn get_account(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<ConversationAccount>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let account = state
        .service
        .conversation_account_get(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(account))
}

/// PUT /conversation_accounts/{id}
pub async fn update_account(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
    body: Result<Json<ConversationAccountUpdateRequest>, JsonRejection>,
) -> Result<Json<ConversationAccount>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;
    let req = bind(body)?;

    let patch = SparsePatch::builder()
        .set("name", &req.name)
        .set("detail", &req.detail)
        .set("secret", &req.secret)
        .set("token", &req.token)
        .build()?;
    let fields = convert_field_map(&patch)?;

    let account = state
        .service
        .conversation_account_update(&agent, id, fields)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(account))
}

/// DELETE /conversation_accounts/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<ConversationAccount>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let account = state
        .service
        .conversation_account_delete(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(account))
}
