//! The backend service facade
//!
//! Every domain operation the gateway exposes is a single method on this
//! trait. The concrete implementation fronts the platform's independent
//! manager microservices; handlers treat it as a black box that may itself
//! perform network I/O, retries, or timeouts. No business rule lives on
//! this side of the seam.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

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

/// Typed backend failure classification.
///
/// Legacy-shape handlers flatten every variant to a 400; the newer
/// timeline handlers map `NotFound`/`PermissionDenied`/`Unavailable` to
/// 404/403/502.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("resource not found")]
    NotFound,

    #[error("user has no permission")]
    PermissionDenied,

    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

/// One method per domain operation. Arguments arrive fully typed; the
/// facade owns marshaling them to whatever transport the managers speak.
#[async_trait]
pub trait ServiceHandler: Send + Sync {
    // calls
    async fn call_create(
        &self,
        agent: &Agent,
        flow_id: Uuid,
        actions: Vec<Action>,
        source: Address,
        destinations: Vec<Address>,
    ) -> Result<(Vec<Call>, Vec<Groupcall>), ServiceError>;

    async fn call_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Call>, ServiceError>;

    async fn call_get(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError>;

    async fn call_delete(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError>;

    async fn call_hangup(&self, agent: &Agent, id: Uuid) -> Result<Call, ServiceError>;

    // contacts
    async fn contact_list(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
        filters: HashMap<String, String>,
    ) -> Result<Vec<Contact>, ServiceError>;

    async fn contact_create(
        &self,
        agent: &Agent,
        create: ContactCreate,
    ) -> Result<Contact, ServiceError>;

    async fn contact_get(&self, agent: &Agent, id: Uuid) -> Result<Contact, ServiceError>;

    async fn contact_update(
        &self,
        agent: &Agent,
        id: Uuid,
        update: ContactUpdate,
    ) -> Result<Contact, ServiceError>;

    async fn contact_delete(&self, agent: &Agent, id: Uuid) -> Result<Contact, ServiceError>;

    // campaigns
    async fn campaign_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Campaign>, ServiceError>;

    async fn campaign_create(
        &self,
        agent: &Agent,
        create: CampaignCreate,
    ) -> Result<Campaign, ServiceError>;

    async fn campaign_get(&self, agent: &Agent, id: Uuid) -> Result<Campaign, ServiceError>;

    async fn campaign_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<campaign::Field>,
    ) -> Result<Campaign, ServiceError>;

    async fn campaign_delete(&self, agent: &Agent, id: Uuid)
        -> Result<Campaign, ServiceError>;

    // conversations
    async fn conversation_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Conversation>, ServiceError>;

    async fn conversation_get(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<Conversation, ServiceError>;

    async fn conversation_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<conversation::Field>,
    ) -> Result<Conversation, ServiceError>;

    // conversation accounts
    async fn conversation_account_gets(
        &self,
        agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<ConversationAccount>, ServiceError>;

    async fn conversation_account_create(
        &self,
        agent: &Agent,
        create: ConversationAccountCreate,
    ) -> Result<ConversationAccount, ServiceError>;

    async fn conversation_account_get(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<ConversationAccount, ServiceError>;

    async fn conversation_account_update(
        &self,
        agent: &Agent,
        id: Uuid,
        fields: FieldMap<conversation_account::Field>,
    ) -> Result<ConversationAccount, ServiceError>;

    async fn conversation_account_delete(
        &self,
        agent: &Agent,
        id: Uuid,
    ) -> Result<ConversationAccount, ServiceError>;

    // timelines
    //
    // Returns the events plus the next page token, which for timelines is
    // computed by the backend rather than derived from the last record.
    async fn timeline_event_list(
        &self,
        agent: &Agent,
        resource_type: &str,
        resource_id: Uuid,
        page_size: u64,
        page_token: &str,
    ) -> Result<(Vec<TimelineEvent>, String), ServiceError>;
}
