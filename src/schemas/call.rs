//! Call domain wire models
//!
//! Webhook-message representations returned by the call manager, plus the
//! request shapes the gateway accepts for outgoing call creation. Call
//! records carry their creation timestamp as a pre-formatted string, so
//! the page cursor passes it through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::pagination::PageCursor;

/// A common address: the source or destination endpoint of a call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "type", default)]
    pub address_type: String,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub target_name: String,
}

/// A flow action executed when the call connects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type", default)]
    pub action_type: String,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub option: Value,
}

/// Call status as reported by the call manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Dialing,
    Ringing,
    Progressing,
    Terminating,
    Canceling,
    Hangup,
}

/// Webhook-message representation of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub flow_id: Uuid,

    pub status: CallStatus,
    pub source: Address,
    pub destination: Address,

    #[serde(default)]
    pub direction: String,

    #[serde(default)]
    pub tm_create: String,

    #[serde(default)]
    pub tm_update: String,
}

impl PageCursor for Call {
    fn page_cursor(&self) -> String {
        self.tm_create.clone()
    }
}

/// Webhook-message representation of a groupcall spawned alongside a call
/// with multiple destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Groupcall {
    pub id: Uuid,
    pub customer_id: Uuid,

    pub source: Address,
    pub destinations: Vec<Address>,

    #[serde(default)]
    pub call_ids: Vec<Uuid>,

    #[serde(default)]
    pub tm_create: String,
}

/// `POST /calls` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallCreateRequest {
    pub flow_id: Option<Uuid>,
    pub actions: Option<Vec<Action>>,
    pub source: Option<Address>,
    pub destinations: Option<Vec<Address>>,
}

/// `POST /calls` response body: the created calls and any groupcalls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallCreateResponse {
    pub calls: Vec<Call>,
    pub groupcalls: Vec<Groupcall>,
}
