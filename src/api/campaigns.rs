//! Campaign endpoints
//!
//! Campaign updates go through the sparse-patch pipeline: only fields the
//! caller actually sent are collected, then the whole patch is validated
//! against the campaign field whitelist before the backend sees it.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::{bind, parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{generate_list_response, ListResponse, PageParams};
use crate::patch::SparsePatch;
use crate::schemas::campaign::{
    convert_field_map, Campaign, CampaignCreateRequest, CampaignUpdateRequest,
};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// GET /campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Campaign>>, ApiError> {
    let agent = require_agent(agent)?;

    let campaigns = state
        .service
        .campaign_gets(&agent, params.effective_size(), &params.effective_token())
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(generate_list_response(campaigns)))
}

/// POST /campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    body: Result<Json<CampaignCreateRequest>, JsonRejection>,
) -> Result<Json<Campaign>, ApiError> {
    let agent = require_agent(agent)?;
    let req = bind(body)?;

    let campaign = state
        .service
        .campaign_create(&agent, req.into())
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(campaign))
}

/// GET /campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let campaign = state
        .service
        .campaign_get(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(campaign))
}

/// PUT /campaigns/{id}
pub async fn update_campaign(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
    body: Result<Json<CampaignUpdateRequest>, JsonRejection>,
) -> Result<Json<Campaign>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;
    let req = bind(body)?;

    let patch = SparsePatch::builder()
        .set("name", &req.name)
        .set("detail", &req.detail)
        .set("service_level", &req.service_level)
        .set("end_handle", &req.end_handle)
        .build()?;
    let fields = convert_field_map(&patch)?;

    let campaign = state
        .service
        .campaign_update(&agent, id, fields)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(campaign))
}

/// DELETE /campaigns/{id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Campaign>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let campaign = state
        .service
        .campaign_delete(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(campaign))
}
