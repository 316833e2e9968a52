//! Schema module
//!
//! Wire models for every domain the gateway fronts, plus the per-domain
//! field-map validators consumed by the sparse-patch update handlers.

pub mod agent;
pub mod call;
pub mod campaign;
pub mod contact;
pub mod conversation;
pub mod conversation_account;
pub mod fields;
pub mod timeline;

pub use agent::Agent;
pub use fields::{FieldError, FieldMap, FieldValue};
