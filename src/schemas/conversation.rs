//! Conversation domain wire models and field-map validator

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::PageCursor;
use crate::patch::SparsePatch;
use crate::schemas::fields::{FieldError, FieldMap, FieldValue};

/// Webhook-message representation of a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub account_id: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub detail: String,

    #[serde(default)]
    pub channel_type: String,

    #[serde(default)]
    pub tm_create: String,

    #[serde(default)]
    pub tm_update: String,
}

impl PageCursor for Conversation {
    fn page_cursor(&self) -> String {
        self.tm_create.clone()
    }
}

/// `PUT /conversations/{id}` request body. Unknown keys reject the whole
/// request; they must never silently vanish from a partial update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversationUpdateRequest {
    pub name: Option<String>,
    pub detail: Option<String>,
}

/// The closed set of conversation fields external callers may mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Detail,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Detail => "detail",
        }
    }

    pub fn parse(key: &str) -> Result<Self, FieldError> {
        match key {
            "name" => Ok(Field::Name),
            "detail" => Ok(Field::Detail),
            _ => Err(FieldError::Unknown(key.to_string())),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Validate a sparse patch against the conversation whitelist.
pub fn convert_field_map(patch: &SparsePatch) -> Result<FieldMap<Field>, FieldError> {
    let mut fields = FieldMap::new();
    for (key, value) in patch.iter() {
        let field = Field::parse(key)?;
        let value = match field {
            Field::Name => FieldValue::text("name", value)?,
            Field::Detail => FieldValue::text("detail", value)?,
        };
        fields.insert(field, value);
    }
    Ok(fields)
}
