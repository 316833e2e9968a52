//! RPC client implementation of the ServiceHandler facade
//!
//! Each manager microservice accepts the platform's request envelope
//! `{uri, method, data}` and answers `{status_code, data}`. This client
//! posts those envelopes over HTTP to the manager that owns the entity and
//! classifies failures into the typed [`ServiceError`] taxonomy. No retry,
//! no circuit breaking; a failed request fails the calling handler.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config::Settings;
use crate::schemas::agent::Agent;
use crate::schemas::call::{Action, Address, Call, Groupcall};
use crate::schemas::campaign::{self, Campaign, CampaignCreate};
use crate::schemas::contact::{Contact, ContactCreate, ContactUpdate};
use crate::schemas::conversation::{self, Conversation};
use crate::schemas::conversation_account::{
    self, ConversationAccount, ConversationAccountCreate,
};
use crate::schemas::fields::FieldMap;
use crate::schemas::timeline::TimelineEvent;
use crate::services::{ServiceError, ServiceHandler};

/// The request envelope a manager accepts.
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    uri: String,
    method: &'a str,
    data: Value,
}

/// The response envelope a manager answers with.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    status_code: u16,

    #[serde(default)]
    data: Value,
}

/// ServiceHandler implementation backed by per-manager RPC endpoints.
pub struct RpcServiceHandler {
    client: reqwest::Client,
    call_manager_url: String,
    contact_manager_url: String,
    campaign_manager_url: String,
    conversation_manager_url: String,
    timeline_manager_url: String,
}

impl RpcServiceHandler {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.backend.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            call_manager_url: settings.backend.call_manager_url.clone(),
            contact_manager_url: settings.backend.contact_manager_url.clone(),
            campaign_manager_url: settings.backend.campaign_manager_url.clone(),
            conversation_manager_url: settings.backend.conversation_manager_url.clone(),
            timeline_manager_url: settings.backend.timeline_manager_url.clone(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        uri: String,
        method: &'static str,
        data: Value,
    ) -> Result<T, ServiceError> {
        tracing::debug!(endpoint = %endpoint, uri = %uri, method = %method, "Sending backend request");

        let envelope = RpcRequest { uri, method, data };
        let response = self
            .client
            .post(endpoint)
            .json(&envelope)
            .send()
            .await
            .map_err(|err| ServiceError::Unavailable(err.to_string()))?;

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|err| ServiceError::Unavailable(err.to_string()))?;

        match envelope.status_code {
            200..=299 => serde_json::from_value(envelope.data)
                .map_err(|err| ServiceError::Internal(err.to_string())),
            404 => Err(ServiceError::NotFound),
            403 => Err(ServiceError::PermissionDenied),
            502 | 503 => Err(ServiceError::Unavailable(format!(
                "backend returned status {}",
                envelope.status_code
            ))),
            status => Err(ServiceError::Internal(format!(
                "backend returned status {}",
                status
            ))),
        }
    }

    fn list_uri(resource: &str, page_size: u64, page_token: &str) -> String {
        format!(
            "/v1/{}?page_size={}&page_token={}",
            resource, page_size, page_token
        )
    }
}

#[async_trait]
impl ServiceHandler for RpcServiceHandler {
    async fn call_create(
        &self,
        agent: &Agent,
        flow_id: Uuid,
        actions: Vec<Action>,
        source: Address,
        destinations: Vec<Address>,
    ) -> Result<(Vec<Call>, Vec<Groupcall>), ServiceError> {
        #[derive(Deserialize)]
        struct CreateResult {
            #[serde(default)]
            calls: Vec<Call>,
            #[serde(default)]
            groupcalls: Vec<Groupcall>,
        }

        let data = json!({
            "customer_id": agent.customer_id,
            "flow_id": flow_id,
            "actions": actions,
            "source": source,
            "destinations": destinations,
        });

        let res: CreateResult = self
            .send(&self.call_manager_url, "/v1/calls".to_string(), "POST", data)
            .await?;
        Ok((res.calls, res.groupcalls))
    }

    async fn call_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Call>, ServiceError> {
        let uri = Self::list_uri("calls", page_size, page_token);
        let data = json!({ "customer_id": agent.customer_id });
        self.send(&self.call_manager_url, uri, "GET", data).await
    }

    async fn call_get(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.call_manager_url,
            format!("/v1/calls/{}", id),
            "GET",
            data,
        )
        .await
    }

    async fn call_delete(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.call_manager_url,
            format!("/v1/calls/{}", id),
            "DELETE",
            data,
        )
        .await
    }

    async fn call_hangup(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.call_manager_url,
            format!("/v1/calls/{}/hangup", id),
            "POST",
            data,
        )
        .await
    }

    async fn contact_list(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
        filters: HashMap<String, String>,
    ) -> Result<Vec<Contact>, ServiceError> {
        let uri = Self::list_uri("contacts", page_size, page_token);
        let data = json!({ "customer_id": agent.customer_id, "filters": filters });
        self.send(&self.contact_manager_url, uri, "GET", data).await
    }

    async fn contact_create(
        &self,
        agent: &Agent,
        create: ContactCreate,
    ) -> Result<Contact, ServiceError> {
        let mut data = serde_json::to_value(create)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        data["customer_id"] = json!(agent.customer_id);
        self.send(
            &self.contact_manager_url,
            "/v1/contacts".to_string(),
            "POST",
            data,
        )
        .await
    }

    async fn contact_get(&self, agent: &Agent, id: Uuid) -> Result<Contact, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.contact_manager_url,
            format!("/v1/contacts/{}", id),
            "GET",
            data,
        )
        .await
    }

    async fn contact_update(
        &self,
        agent: &Agent,
        id: Uuid,
        update: ContactUpdate,
    ) -> Result<Contact, ServiceError> {
        let mut data = serde_json::to_value(update)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        data["customer_id"] = json!(agent.customer_id);
        self.send(
            &self.contact_manager_url,
            format!("/v1/contacts/{}", id),
            "PUT",
            data,
        )
        .await
    }

    async fn contact_delete(&self, agent: &Agent, id: Uuid) -> Result<Contact, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.contact_manager_url,
            format!("/v1/contacts/{}", id),
            "DELETE",
            data,
        )
        .await
    }

    async fn campaign_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Campaign>, ServiceError> {
        let uri = Self::list_uri("campaigns", page_size, page_token);
        let data = json!({ "customer_id": agent.customer_id, "deleted": "false" });
        self.send(&self.campaign_manager_url, uri, "GET", data).await
    }

    async fn campaign_create(
        &self,
        agent: &Agent,
        create: CampaignCreate,
    ) -> Result<Campaign, ServiceError> {
        let mut data = serde_json::to_value(create)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        data["customer_id"] = json!(agent.customer_id);
        self.send(
            &self.campaign_manager_url,
            "/v1/campaigns".to_string(),
            "POST",
            data,
        )
        .await
    }

    async fn campaign_get(&self, agent: &Agent, id: Uuid) -> Result<Campaign, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.campaign_manager_url,
            format!("/v1/campaigns/{}", id),
            "GET",
            data,
        )
        .await
    }

    async fn campaign_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<campaign::Field>,
    ) -> Result<Campaign, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id, "fields": fields });
        self.send(
            &self.campaign_manager_url,
            format!("/v1/campaigns/{}", id),
            "PUT",
            data,
        )
        .await
    }

    async fn campaign_delete(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<Campaign, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.campaign_manager_url,
            format!("/v1/campaigns/{}", id),
            "DELETE",
            data,
        )
        .await
    }

    async fn conversation_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Conversation>, ServiceError> {
        let uri = Self::list_uri("conversations", page_size, page_token);
        let data = json!({ "customer_id": agent.customer_id, "deleted": "false" });
        self.send(&self.conversation_manager_url, uri, "GET", data)
            .await
    }

    async fn conversation_get(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<Conversation, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.conversation_manager_url,
            format!("/v1/conversations/{}", id),
            "GET",
            data,
        )
        .await
    }

    async fn conversation_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<conversation::Field>,
    ) -> Result<Conversation, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id, "fields": fields });
        self.send(
            &self.conversation_manager_url,
            format!("/v1/conversations/{}", id),
            "PUT",
            data,
        )
        .await
    }

    async fn conversation_account_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<ConversationAccount>, ServiceError> {
        let uri = Self::list_uri("accounts", page_size, page_token);
        let data = json!({ "customer_id": agent.customer_id, "deleted": "false" });
        self.send(&self.conversation_manager_url, uri, "GET", data)
            .await
    }

    async fn conversation_account_create(
        &self,
        agent: &Agent,
        create: ConversationAccountCreate,
    ) -> Result<ConversationAccount, ServiceError> {
        let mut data = serde_json::to_value(create)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        data["customer_id"] = json!(agent.customer_id);
        self.send(
            &self.conversation_manager_url,
            "/v1/accounts".to_string(),
            "POST",
            data,
        )
        .await
    }

    async fn conversation_account_get(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<ConversationAccount, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.conversation_manager_url,
            format!("/v1/accounts/{}", id),
            "GET",
            data,
        )
        .await
    }

    async fn conversation_account_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<conversation_account::Field>,
    ) -> Result<ConversationAccount, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id, "fields": fields });
        self.send(
            &self.conversation_manager_url,
            format!("/v1/accounts/{}", id),
            "PUT",
            data,
        )
        .await
    }

    async fn conversation_account_delete(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<ConversationAccount, ServiceError> {
        let data = json!({ "customer_id": agent.customer_id });
        self.send(
            &self.conversation_manager_url,
            format!("/v1/accounts/{}", id),
            "DELETE",
            data,
        )
        .await
    }

    async fn timeline_event_list(
        &self,
        agent: &Agent,
        resource_type: &str,
        resource_id: Uuid,
        page_size: u64,
        page_token: &str,
    ) -> Result<(Vec<TimelineEvent>, String), ServiceError> {
        #[derive(Deserialize)]
        struct ListResult {
            #[serde(default)]
            events: Vec<TimelineEvent>,
            #[serde(default)]
            next_page_token: String,
        }

        let uri = format!(
            "/v1/timelines/{}/{}/events?page_size={}&page_token={}",
            resource_type, resource_id, page_size, page_token
        );
        let data = json!({ "customer_id": agent.customer_id });

        let res: ListResult = self
            .send(&self.timeline_manager_url, uri, "GET", data)
            .await?;
        Ok((res.events, res.next_page_token))
    }
}
