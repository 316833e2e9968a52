//! Shared field-map machinery for sparse updates
//!
//! Each patchable domain owns a closed `Field` enum naming the fields it
//! permits external mutation of, plus a converter that checks every key of
//! a sparse patch against that whitelist and coerces the raw JSON value to
//! the domain's expected type. The pieces the domains share live here.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// A validated, typed set of "field → new value" pairs ready to hand to a
/// domain's update operation.
pub type FieldMap<F> = BTreeMap<F, FieldValue>;

/// A sparse patch key failed validation against a domain whitelist.
///
/// Any error here rejects the entire patch; no accepted subset is applied.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    Unknown(String),

    #[error("invalid value for field '{field}': expected {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}

/// A coerced field value, typed at the seam between the raw patch and the
/// backend update call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Id(Uuid),
    Text(String),
    Flag(bool),
    Integer(i64),
    Data(Value),
}

impl FieldValue {
    pub fn text(field: &'static str, value: &Value) -> Result<Self, FieldError> {
        match value.as_str() {
            Some(s) => Ok(Self::Text(s.to_string())),
            None => Err(FieldError::InvalidValue {
                field,
                expected: "a string",
            }),
        }
    }

    pub fn integer(field: &'static str, value: &Value) -> Result<Self, FieldError> {
        match value.as_i64() {
            Some(n) => Ok(Self::Integer(n)),
            None => Err(FieldError::InvalidValue {
                field,
                expected: "an integer",
            }),
        }
    }

    pub fn flag(field: &'static str, value: &Value) -> Result<Self, FieldError> {
        match value.as_bool() {
            Some(b) => Ok(Self::Flag(b)),
            None => Err(FieldError::InvalidValue {
                field,
                expected: "a boolean",
            }),
        }
    }

    /// Coerce a string value into a UUID.
    pub fn id(field: &'static str, value: &Value) -> Result<Self, FieldError> {
        value
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(Self::Id)
            .ok_or(FieldError::InvalidValue {
                field,
                expected: "a UUID string",
            })
    }

    /// Coerce a string value that must be one of a closed set of variants.
    pub fn one_of(
        field: &'static str,
        value: &Value,
        allowed: &[&str],
        expected: &'static str,
    ) -> Result<Self, FieldError> {
        match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(Self::Text(s.to_string())),
            _ => Err(FieldError::InvalidValue { field, expected }),
        }
    }

    /// Pass a nested object through untouched.
    pub fn data(field: &'static str, value: &Value) -> Result<Self, FieldError> {
        if value.is_object() {
            Ok(Self::Data(value.clone()))
        } else {
            Err(FieldError::InvalidValue {
                field,
                expected: "an object",
            })
        }
    }
}
