//! Contact domain wire models
//!
//! Contacts are the one entity whose creation timestamp arrives as a typed
//! `Option<DateTime<Utc>>` rather than a pre-formatted string, so their
//! page cursor renders through [`format_cursor`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pagination::{format_cursor, PageCursor};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneNumber {
    #[serde(default)]
    pub number: String,

    #[serde(rename = "type", default)]
    pub phone_type: String,

    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Email {
    #[serde(default)]
    pub address: String,

    #[serde(rename = "type", default)]
    pub email_type: String,

    #[serde(default)]
    pub is_primary: bool,
}

/// Webhook-message representation of a contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default)]
    pub company: String,

    #[serde(default)]
    pub job_title: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub external_id: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,

    #[serde(default)]
    pub emails: Vec<Email>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,

    pub tm_create: Option<DateTime<Utc>>,
    pub tm_update: Option<DateTime<Utc>>,
}

impl PageCursor for Contact {
    fn page_cursor(&self) -> String {
        format_cursor(&self.tm_create)
    }
}

/// `POST /contacts` request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactCreateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub source: Option<String>,
    pub external_id: Option<String>,
    pub notes: Option<String>,
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    pub emails: Option<Vec<Email>>,
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Typed arguments for contact creation handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactCreate {
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub company: String,
    pub job_title: String,
    pub source: String,
    pub external_id: String,
    pub notes: String,
    pub phone_numbers: Vec<PhoneNumber>,
    pub emails: Vec<Email>,
    pub tag_ids: Vec<Uuid>,
}

impl From<ContactCreateRequest> for ContactCreate {
    fn from(req: ContactCreateRequest) -> Self {
        Self {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            display_name: req.display_name.unwrap_or_default(),
            company: req.company.unwrap_or_default(),
            job_title: req.job_title.unwrap_or_default(),
            source: req.source.unwrap_or_default(),
            external_id: req.external_id.unwrap_or_default(),
            notes: req.notes.unwrap_or_default(),
            phone_numbers: req.phone_numbers.unwrap_or_default(),
            emails: req.emails.unwrap_or_default(),
            tag_ids: req.tag_ids.unwrap_or_default(),
        }
    }
}

/// `PUT /contacts/{id}` request body.
///
/// Contacts predate the sparse-patch protocol; their update forwards the
/// optional fields positionally and the backend ignores absent ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub external_id: Option<String>,
    pub notes: Option<String>,
}
