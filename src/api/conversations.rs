//! Conversation endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::{bind, parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{generate_list_response, ListResponse, PageParams};
use crate::patch::SparsePatch;
use crate::schemas::conversation::{
    convert_field_map, Conversation, ConversationUpdateRequest,
};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Conversation>>, ApiError> {
    let agent = require_agent(agent)?;

    let conversations = state
        .service
        .conversation_gets(&agent, params.effective_size(), &params.effective_token())
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(generate_list_response(conversations)))
}

/// GET /conversations/{id}
pub async fn get_conversation(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let conversation = state
        .service
        .conversation_get(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(conversation))
}

/// PUT /conversations/{id}
pub async fn update_conversation(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
    body: Result<Json<ConversationUpdateRequest>, JsonRejection>,
) -> Result<Json<Conversation>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;
    let req = bind(body)?;

    let patch = SparsePatch::builder()
        .set("name", &req.name)
        .set("detail", &req.detail)
        .build()?;
    let fields = convert_field_map(&patch)?;

    let conversation = state
        .service
        .conversation_update(&agent, id, fields)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(conversation))
}
