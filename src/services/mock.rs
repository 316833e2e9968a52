//! Canned ServiceHandler used by handler tests
//!
//! Configure the records each domain returns, or set `fail_with` to make
//! every call fail with that error. Page parameters and update field maps
//! are recorded so tests can assert what actually crossed the facade
//! boundary, and in particular that nothing crossed it at all when a
//! request was rejected up front.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
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
use crate::services::{ServiceError, ServiceHandler};

#[derive(Default)]
pub struct MockServiceHandler {
    pub calls: Vec<Call>,
    pub groupcalls: Vec<Groupcall>,
    pub contacts: Vec<Contact>,
    pub campaigns: Vec<Campaign>,
    pub conversations: Vec<Conversation>,
    pub accounts: Vec<ConversationAccount>,
    pub timeline_events: Vec<TimelineEvent>,
    pub timeline_next_token: String,

    /// When set, every facade call fails with this error.
    pub fail_with: Option<ServiceError>,

    /// `(page_size, page_token)` of the last list call.
    pub seen_page: Mutex<Option<(u64, String)>>,

    /// Serialized field map / update payload of the last update call.
    pub seen_update: Mutex<Option<Value>>,

    /// Filters of the last contact list call.
    pub seen_filters: Mutex<Option<HashMap<String, String>>>,

    /// Total number of facade calls that were made.
    pub call_count: Mutex<usize>,
}

impl MockServiceHandler {
    fn observe(&self) -> Result<(), ServiceError> {
        *self.call_count.lock().unwrap() += 1;
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record_page(&self, page_size: u64, page_token: &str) {
        *self.seen_page.lock().unwrap() = Some((page_size, page_token.to_string()));
    }

    fn record_update<T: serde::Serialize>(&self, update: &T) {
        *self.seen_update.lock().unwrap() = Some(serde_json::to_value(update).unwrap());
    }

    pub fn calls_made(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl ServiceHandler for MockServiceHandler {
    async fn call_create(
        &self,
        _agent: &Agent,
        _flow_id: Uuid,
        _actions: Vec<Action>,
        _source: Address,
        _destinations: Vec<Address>,
    ) -> Result<(Vec<Call>, Vec<Groupcall>), ServiceError> {
        self.observe()?;
        Ok((self.calls.clone(), self.groupcalls.clone()))
    }

    async fn call_gets(
        &self,
        _agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Call>, ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        Ok(self.calls.clone())
    }

    async fn call_get(&self, _agent: &Agent, _id: Uuid) -> Result<Call, ServiceError> {
        self.observe()?;
        Ok(self.calls[0].clone())
    }

    async fn call_delete(&self, _agent: &Agent, _id: Uuid) -> Result<Call, ServiceError> {
        self.observe()?;
        Ok(self.calls[0].clone())
    }

    async fn call_hangup(&self, _agent: &Agent, _id: Uuid) -> Result<Call, ServiceError> {
        self.observe()?;
        Ok(self.calls[0].clone())
    }

    async fn contact_list(
        &self,
        _agent: &Agent,
        page_size: u64,
        page_token: &str,
        filters: HashMap<String, String>,
    ) -> Result<Vec<Contact>, ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        *self.seen_filters.lock().unwrap() = Some(filters);
        Ok(self.contacts.clone())
    }

    async fn contact_create(
        &self,
        _agent: &Agent,
        create: ContactCreate,
    ) -> Result<Contact, ServiceError> {
        self.observe()?;
        self.record_update(&create);
        Ok(self.contacts[0].clone())
    }

    async fn contact_get(&self, _agent: &Agent, _id: Uuid) -> Result<Contact, ServiceError> {
        self.observe()?;
        Ok(self.contacts[0].clone())
    }

    async fn contact_update(
        &self,
        _agent: &Agent,
        _id: Uuid,
        update: ContactUpdate,
    ) -> Result<Contact, ServiceError> {
        self.observe()?;
        self.record_update(&update);
        Ok(self.contacts[0].clone())
    }

    async fn contact_delete(&self, _agent: &Agent, _id: Uuid) -> Result<Contact, ServiceError> {
        self.observe()?;
        Ok(self.contacts[0].clone())
    }

    async fn campaign_gets(
        &self,
        _agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Campaign>, ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        Ok(self.campaigns.clone())
    }

    async fn campaign_create(
        &self,
        _agent: &Agent,
        create: CampaignCreate,
    ) -> Result<Campaign, ServiceError> {
        self.observe()?;
        self.record_update(&create);
        Ok(self.campaigns[0].clone())
    }

    async fn campaign_get(&self, _agent: &Agent, _id: Uuid) -> Result<Campaign, ServiceError> {
        self.observe()?;
        Ok(self.campaigns[0].clone())
    }

    async fn campaign_update(
        &self,
        _agent: &Agent,
        _id: Uuid,
        fields: FieldMap<campaign::Field>,
    ) -> Result<Campaign, ServiceError> {
        self.observe()?;
        self.record_update(&fields);
        Ok(self.campaigns[0].clone())
    }

    async fn campaign_delete(
        &self,
        _agent: &Agent,
        _id: Uuid,
    ) -> Result<Campaign, ServiceError> {
        self.observe()?;
        Ok(self.campaigns[0].clone())
    }

    async fn conversation_gets(
        &self,
        _agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<Conversation>, ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        Ok(self.conversations.clone())
    }

    async fn conversation_get(
        &self,
        _agent: &Agent,
        _id: Uuid,
    ) -> Result<Conversation, ServiceError> {
        self.observe()?;
        Ok(self.conversations[0].clone())
    }

    async fn conversation_update(
        &self,
        _agent: &Agent,
        _id: Uuid,
        fields: FieldMap<conversation::Field>,
    ) -> Result<Conversation, ServiceError> {
        self.observe()?;
        self.record_update(&fields);
        Ok(self.conversations[0].clone())
    }

    async fn conversation_account_gets(
        &self,
        _agent: &Agent,
        page_size: u64,
        page_token: &str,
    ) -> Result<Vec<ConversationAccount>, ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        Ok(self.accounts.clone())
    }

    async fn conversation_account_create(
        &self,
        _agent: &Agent,
        create: ConversationAccountCreate,
    ) -> Result<ConversationAccount, ServiceError> {
        self.observe()?;
        self.record_update(&create);
        Ok(self.accounts[0].clone())
    }

    async fn conversation_account_get(
        &self,
        _agent: &Agent,
        _id: Uuid,
    ) -> Result<ConversationAccount, ServiceError> {
        self.observe()?;
        Ok(self.accounts[0].clone())
    }

    async fn conversation_account_update(
        &self,
        _agent: &Agent,
        _id: Uuid,
        fields: FieldMap<conversation_account::Field>,
    ) -> Result<ConversationAccount, ServiceError> {
        self.observe()?;
        self.record_update(&fields);
        Ok(self.accounts[0].clone())
    }

    async fn conversation_account_delete(
        &self,
        _agent: &Agent,
        _id: Uuid,
    ) -> Result<ConversationAccount, ServiceError> {
        self.observe()?;
        Ok(self.accounts[0].clone())
    }

    async fn timeline_event_list(
        &self,
        _agent: &Agent,
        _resource_type: &str,
        _resource_id: Uuid,
        page_size: u64,
        page_token: &str,
    ) -> Result<(Vec<TimelineEvent>, String), ServiceError> {
        self.observe()?;
        self.record_page(page_size, page_token);
        Ok((self.timeline_events.clone(), self.timeline_next_token.clone()))
    }
}
