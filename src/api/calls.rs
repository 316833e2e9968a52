//! Call endpoints
//!
//! Outgoing call creation plus the read/hangup lifecycle. Call records
//! carry their creation timestamp as a pre-formatted string, so the list
//! cursor passes it straight through.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};

use crate::api::{bind, parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{generate_list_response, ListResponse, PageParams};
use crate::schemas::call::{Call, CallCreateRequest, CallCreateResponse};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// POST /calls
///
/// Creates outgoing calls to every destination; multiple destinations also
/// spawn a groupcall tying them together.
pub async fn create_call(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    body: Result<Json<CallCreateRequest>, JsonRejection>,
) -> Result<Json<CallCreateResponse>, ApiError> {
    let agent = require_agent(agent)?;
    let req = bind(body)?;

    let source = req
        .source
        .ok_or_else(|| ApiError::BadRequest("source is required".to_string()))?;
    let destinations = req
        .destinations
        .ok_or_else(|| ApiError::BadRequest("destinations is required".to_string()))?;

    let (calls, groupcalls) = state
        .service
        .call_create(
            &agent,
            req.flow_id.unwrap_or_default(),
            req.actions.unwrap_or_default(),
            source,
            destinations,
        )
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(CallCreateResponse { calls, groupcalls }))
}

/// GET /calls
pub async fn list_calls(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Call>>, ApiError> {
    let agent = require_agent(agent)?;

    let calls = state
        .service
        .call_gets(&agent, params.effective_size(), &params.effective_token())
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(generate_list_response(calls)))
}

/// GET /calls/{id}
pub async fn get_call(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Call>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let call = state
        .service
        .call_get(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(call))
}

/// DELETE /calls/{id}
pub async fn delete_call(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Call>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let call = state
        .service
        .call_delete(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(call))
}

/// POST /calls/{id}/hangup
pub async fn hangup_call(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Call>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let call = state
        .service
        .call_hangup(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(call))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::{Extension, Router};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::schemas::call::{Address, CallStatus};
    use crate::schemas::Agent;
    use crate::server::routes::api_routes;
    use crate::server::state::AppState;
    use crate::services::mock::MockServiceHandler;
    use crate::services::ServiceError;

    use super::*;

    fn test_agent() -> Agent {
        Agent {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            username: "test@test.com".to_string(),
            name: "test".to_string(),
            permission: 0,
        }
    }

    fn app(mock: Arc<MockServiceHandler>) -> Router {
        api_routes()
            .layer(Extension(test_agent()))
            .with_state(AppState::with_service(mock))
    }

    fn app_without_agent(mock: Arc<MockServiceHandler>) -> Router {
        api_routes().with_state(AppState::with_service(mock))
    }

    fn call(tm_create: &str) -> Call {
        Call {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            flow_id: Uuid::new_v4(),
            status: CallStatus::Progressing,
            source: Address::default(),
            destination: Address::default(),
            direction: "outgoing".to_string(),
            tm_create: tm_create.to_string(),
            tm_update: String::new(),
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_next_token_is_last_record_timestamp() {
        let mock = Arc::new(MockServiceHandler {
            calls: vec![
                call("2020-09-20T03:23:20.995000"),
                call("2020-09-20T03:23:21.995000"),
                call("2020-09-20T03:23:22.995000"),
            ],
            ..Default::default()
        });

        let response = app(mock.clone())
            .oneshot(
                Request::builder()
                    .uri("/calls?page_size=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"].as_array().unwrap().len(), 3);
        assert_eq!(body["next_page_token"], "2020-09-20T03:23:22.995000");
        assert_eq!(
            *mock.seen_page.lock().unwrap(),
            Some((3, String::new()))
        );
    }

    #[tokio::test]
    async fn list_clamps_page_size_zero_to_default() {
        let mock = Arc::new(MockServiceHandler {
            calls: vec![call("2020-09-20T03:23:20.995000")],
            ..Default::default()
        });

        let response = app(mock.clone())
            .oneshot(
                Request::builder()
                    .uri("/calls?page_size=0&page_token=2020-09-20T03:23:19.995000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *mock.seen_page.lock().unwrap(),
            Some((100, "2020-09-20T03:23:19.995000".to_string()))
        );
    }

    #[tokio::test]
    async fn empty_list_yields_empty_array_and_token() {
        let mock = Arc::new(MockServiceHandler::default());

        let response = app(mock)
            .oneshot(Request::builder().uri("/calls").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"result":[],"next_page_token":""}"#
        );
    }

    #[tokio::test]
    async fn missing_agent_is_a_400_before_the_backend() {
        let mock = Arc::new(MockServiceHandler::default());

        let response = app_without_agent(mock.clone())
            .oneshot(Request::builder().uri("/calls").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls_made(), 0);
    }

    #[tokio::test]
    async fn create_requires_source_and_destinations() {
        let mock = Arc::new(MockServiceHandler::default());

        let response = app(mock.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calls")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"flow_id": Uuid::new_v4()}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls_made(), 0);
    }

    #[tokio::test]
    async fn create_returns_calls_and_groupcalls() {
        let mock = Arc::new(MockServiceHandler {
            calls: vec![call("2020-09-20T03:23:20.995000")],
            ..Default::default()
        });

        let body = json!({
            "flow_id": Uuid::new_v4(),
            "source": {"type": "tel", "target": "+821100000001"},
            "destinations": [{"type": "tel", "target": "+821100000002"}],
        });
        let response = app(mock)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/calls")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["calls"].as_array().unwrap().len(), 1);
        assert_eq!(body["groupcalls"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn unparseable_id_is_a_400() {
        let mock = Arc::new(MockServiceHandler::default());

        let response = app(mock.clone())
            .oneshot(
                Request::builder()
                    .uri("/calls/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls_made(), 0);
    }

    #[tokio::test]
    async fn backend_failure_flattens_to_400() {
        let mock = Arc::new(MockServiceHandler {
            fail_with: Some(ServiceError::NotFound),
            ..Default::default()
        });

        let response = app(mock)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/calls/{}/hangup", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
