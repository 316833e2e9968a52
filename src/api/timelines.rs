//! Timeline endpoints
//!
//! The newest handler shape of the gateway: backend failures keep their
//! classification (404/403/502/500 with a JSON error body) instead of
//! flattening to a bare 400, and the next page token comes straight from
//! the backend rather than from the last record.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::{parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{ListResponse, PageParams};
use crate::schemas::timeline::{is_timeline_resource, TimelineEvent};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// GET /timelines/{resource_type}/{resource_id}/events
pub async fn list_timeline_events(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path((resource_type, resource_id)): Path<(String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<TimelineEvent>>, ApiError> {
    let agent = require_agent(agent)?;

    if !is_timeline_resource(&resource_type) {
        return Err(ApiError::BadRequest(format!(
            "unknown timeline resource type: {resource_type}"
        )));
    }
    let resource_id = parse_id(&resource_id)?;

    let (events, next_page_token) = state
        .service
        .timeline_event_list(
            &agent,
            &resource_type,
            resource_id,
            params.effective_size(),
            &params.effective_token(),
        )
        .await
        .map_err(ApiError::classify)?;

    Ok(Json(ListResponse::new(events, next_page_token)))
}
