//! Contact endpoints
//!
//! Contact listing always scopes to the caller's customer and excludes
//! deleted records; both filters are injected here, never taken from the
//! request. Contacts are also the one entity whose creation timestamp is
//! typed, so their list cursor renders through the timestamp formatter.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::api::{bind, parse_id, require_agent};
use crate::error::ApiError;
use crate::pagination::{generate_list_response, ListResponse, PageParams};
use crate::schemas::contact::{Contact, ContactCreateRequest, ContactUpdate};
use crate::schemas::Agent;
use crate::server::state::AppState;

/// GET /contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListResponse<Contact>>, ApiError> {
    let agent = require_agent(agent)?;

    let filters = HashMap::from([
        ("customer_id".to_string(), agent.customer_id.to_string()),
        ("deleted".to_string(), "false".to_string()),
    ]);

    let contacts = state
        .service
        .contact_list(
            &agent,
            params.effective_size(),
            &params.effective_token(),
            filters,
        )
        .await
        .map_err(ApiError::backend)?;

    Ok(Json(generate_list_response(contacts)))
}

/// POST /contacts
pub async fn create_contact(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    body: Result<Json<ContactCreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let agent = require_agent(agent)?;
    let req = bind(body)?;

    let contact = state
        .service
        .contact_create(&agent, req.into())
        .await
        .map_err(ApiError::backend)?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /contacts/{id}
pub async fn get_contact(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let contact = state
        .service
        .contact_get(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(contact))
}

/// PUT /contacts/{id}
///
/// Contacts predate the sparse-patch protocol: the optional fields are
/// forwarded positionally and the backend ignores absent ones.
pub async fn update_contact(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
    body: Result<Json<ContactUpdate>, JsonRejection>,
) -> Result<Json<Contact>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;
    let update = bind(body)?;

    let contact = state
        .service
        .contact_update(&agent, id, update)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(contact))
}

/// DELETE /contacts/{id}
pub async fn delete_contact(
    State(state): State<AppState>,
    agent: Option<Extension<Agent>>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let agent = require_agent(agent)?;
    let id = parse_id(&id)?;

    let contact = state
        .service
        .contact_delete(&agent, id)
        .await
        .map_err(ApiError::backend)?;
    Ok(Json(contact))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::{Extension, Router};
    use chrono::TimeZone;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::schemas::Agent;
    use crate::server::routes::api_routes;
    use crate::server::state::AppState;
    use crate::services::mock::MockServiceHandler;

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

    fn app(agent: &Agent, mock: Arc<MockServiceHandler>) -> Router {
        api_routes()
            .layer(Extension(agent.clone()))
            .with_state(AppState::with_service(mock))
    }

    fn contact(seconds: u32) -> Contact {
        Contact {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            first_name: "Kim".to_string(),
            tm_create: Some(Utc.with_ymd_and_hms(2021, 2, 26, 18, 26, seconds).unwrap()),
            ..Default::default()
        }
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_scopes_to_customer_and_excludes_deleted() {
        let agent = test_agent();
        let mock = Arc::new(MockServiceHandler {
            contacts: vec![contact(10), contact(11)],
            ..Default::default()
        });

        let response = app(&agent, mock.clone())
            .oneshot(
                Request::builder()
                    .uri("/contacts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["result"].as_array().unwrap().len(), 2);
        // Typed timestamp renders as the page cursor
        assert_eq!(body["next_page_token"], "2021-02-26T18:26:11.000000Z");

        let filters = mock.seen_filters.lock().unwrap().clone().unwrap();
        assert_eq!(
            filters.get("customer_id"),
            Some(&agent.customer_id.to_string())
        );
        assert_eq!(filters.get("deleted"), Some(&"false".to_string()));
    }

    #[tokio::test]
    async fn create_returns_201() {
        let agent = test_agent();
        let mock = Arc::new(MockServiceHandler {
            contacts: vec![contact(10)],
            ..Default::default()
        });

        let response = app(&agent, mock.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/contacts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"first_name": "Kim", "last_name": "Lee"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        // Absent optional fields arrive at the backend as defaults
        let seen = mock.seen_update.lock().unwrap().clone().unwrap();
        assert_eq!(seen["first_name"], "Kim");
        assert_eq!(seen["company"], "");
        assert_eq!(seen["phone_numbers"], json!([]));
    }

    #[tokio::test]
    async fn update_forwards_only_supplied_positional_fields() {
        let agent = test_agent();
        let mock = Arc::new(MockServiceHandler {
            contacts: vec![contact(10)],
            ..Default::default()
        });

        let response = app(&agent, mock.clone())
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/contacts/{}", Uuid::new_v4()))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({"first_name": "Park"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let seen = mock.seen_update.lock().unwrap().clone().unwrap();
        assert_eq!(seen["first_name"], "Park");
        assert_eq!(seen["last_name"], Value::Null);
    }

    #[tokio::test]
    async fn malformed_body_is_a_400() {
        let agent = test_agent();
        let mock = Arc::new(MockServiceHandler::default());

        let response = app(&agent, mock.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/contacts")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.calls_made(), 0);
    }
}
