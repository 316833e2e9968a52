//! Campaign domain wire models and field-map validator
//!
//! Campaign updates go through the sparse-patch protocol: the handler
//! builds a [`SparsePatch`] from the request body and this module's
//! converter validates it against the campaign's whitelist of mutable
//! fields before anything is forwarded to the campaign manager.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::PageCursor;
use crate::patch::SparsePatch;
use crate::schemas::fields::{FieldError, FieldMap, FieldValue};

/// What the dialer does when a campaign exhausts its outdial targets.
pub const END_HANDLES: [&str; 2] = ["stop", "continue"];

/// Webhook-message representation of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub detail: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub service_level: i64,

    #[serde(default)]
    pub end_handle: String,

    #[serde(default)]
    pub tm_create: String,

    #[serde(default)]
    pub tm_update: String,
}

impl PageCursor for Campaign {
    fn page_cursor(&self) -> String {
        self.tm_create.clone()
    }
}

/// `POST /campaigns` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignCreateRequest {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub service_level: Option<i64>,
    pub end_handle: Option<String>,
    pub outplan_id: Option<Uuid>,
    pub outdial_id: Option<Uuid>,
    pub queue_id: Option<Uuid>,
}

/// Typed arguments for campaign creation handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignCreate {
    pub name: String,
    pub detail: String,
    pub service_level: i64,
    pub end_handle: String,
    pub outplan_id: Uuid,
    pub outdial_id: Uuid,
    pub queue_id: Uuid,
}

impl From<CampaignCreateRequest> for CampaignCreate {
    fn from(req: CampaignCreateRequest) -> Self {
        Self {
            name: req.name.unwrap_or_default(),
            detail: req.detail.unwrap_or_default(),
            service_level: req.service_level.unwrap_or_default(),
            end_handle: req.end_handle.unwrap_or_default(),
            outplan_id: req.outplan_id.unwrap_or_default(),
            outdial_id: req.outdial_id.unwrap_or_default(),
            queue_id: req.queue_id.unwrap_or_default(),
        }
    }
}

/// `PUT /campaigns/{id}` request body. Every field is optional; only the
/// ones the caller supplied make it into the patch. Unknown keys reject
/// the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CampaignUpdateRequest {
    pub name: Option<String>,
    pub detail: Option<String>,
    pub service_level: Option<i64>,
    pub end_handle: Option<String>,
}

/// The closed set of campaign fields external callers may mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Detail,
    ServiceLevel,
    EndHandle,
}

impl Field {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Detail => "detail",
            Field::ServiceLevel => "service_level",
            Field::EndHandle => "end_handle",
        }
    }

    pub fn parse(key: &str) -> Result<Self, FieldError> {
        match key {
            "name" => Ok(Field::Name),
            "detail" => Ok(Field::Detail),
            "service_level" => Ok(Field::ServiceLevel),
            "end_handle" => Ok(Field::EndHandle),
            _ => Err(FieldError::Unknown(key.to_string())),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Validate a sparse patch against the campaign whitelist and coerce each
/// value to its typed form. Any unknown key or uncoercible value rejects
/// the whole patch.
pub fn convert_field_map(patch: &SparsePatch) -> Result<FieldMap<Field>, FieldError> {
    let mut fields = FieldMap::new();
    for (key, value) in patch.iter() {
        let field = Field::parse(key)?;
        let value = match field {
            Field::Name => FieldValue::text("name", value)?,
            Field::Detail => FieldValue::text("detail", value)?,
            Field::ServiceLevel => FieldValue::integer("service_level", value)?,
            Field::EndHandle => {
                FieldValue::one_of("end_handle", value, &END_HANDLES, "stop|continue")?
            }
        };
        fields.insert(field, value);
    }
    Ok(fields)
}
