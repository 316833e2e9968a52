//! Conversation account domain wire models and field-map validator
//!
//! A conversation account holds the credentials for an external messaging
//! channel (SMS, line, etc.). Its secret and token are mutable alongside
//! the display fields, all through the sparse-patch protocol.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::PageCursor;
use crate::patch::SparsePatch;
use crate::schemas::fields::{FieldError, FieldMap, FieldValue};

/// Webhook-message representation of a conversation account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[serde(rename = "type", default)]
    pub account_type: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub detail: String,

    #[serde(default)]
    pub tm_create: String,

    #[serde(default)]
    pub tm_update: String,
}

impl PageCursor for ConversationAccount {
    fn page_cursor(&self) -> String {
        self.tm_create.clone()
    }
}

/// `POST /conversation_accounts` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationAccountCreateRequest {
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub name: Option<String>,
    pub detail: Option<String>,
    pub secret: Option<String>,
    pub token: Option<String>,
}

/// Typed arguments for account creation handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversationAccountCreate {
    #[serde(rename = "type")]
    pub account_type: String,
    pub name: String,
    pub detail: String,
    pub secret: String,
    pub token: String,
}

impl From<ConversationAccountCreateRequest> for ConversationAccountCreate {
    fn from(req: ConversationAccountCreateRequest) -> Self {
        Self {
            account_type: req.account_type.unwrap_or_default(),
            name: req.name.unwrap_or_default(),
            detail: req.detail.unwrap_or_default(),
            secret: req.secret.unwrap_or_default(),
            token: req.token.unwrap_or_default(),
        }
    }
}

/// `PUT /conversation_accounts/{id}` request body. Unknown keys reject the
/// whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationAccountUpdateRequest {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub secret: Option<String>,
    pub token: Option<String>,
}

/// The closed set of account fields external callers may mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Detail,
    Secret,
    Token,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Detail => "detail",
            Field::Secret => "secret",
            Field::Token => "token",
        }
    }

    pub fn parse(key: &str) -> Result<Self, FieldError> {
        match key {
            "name" => Ok(Field::Name),
            "detail" => Ok(Field::Detail),
            "secret" => Ok(Field::Secret),
            "token" => Ok(Field::Token),
            _ => Err(FieldError::Unknown(key.to_string())),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Validate a sparse patch against the account whitelist.
pub fn convert_field_map(patch: &SparsePatch) -> Result<FieldMap<Field>, FieldError> {
    let mut fields = FieldMap::new();
    for (key, value) in patch.iter() {
        let field = Field::parse(key)?;
        let value = match field {
            Field::Name => FieldValue::text("name", value)?,
            Field::Detail => FieldValue::text("detail", value)?,
            Field::Secret => FieldValue::text("secret", value)?,
            Field::Token => FieldValue::text("token", value)?,
        };
        fields.insert(field, value);
    }
    Ok(fields)
}
