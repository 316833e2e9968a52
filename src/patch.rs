//! Sparse partial-update extraction
//!
//! PATCH-like PUT handlers must never clobber fields the caller did not
//! mention. Update request structs model every updatable field as an
//! `Option<T>` (absent in the JSON body ⇔ `None`), and this builder turns
//! such a struct into a map holding only the fields the caller actually
//! supplied, keyed by wire field name. The map is then handed to the
//! owning domain's field-map validator before anything reaches the backend.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// A value could not be encoded into the patch.
///
/// This fails the whole operation as a client error; no partial map is
/// ever produced.
#[derive(Debug, Error)]
#[error("could not encode patch field '{field}': {source}")]
pub struct PatchError {
    pub field: &'static str,
    #[source]
    source: serde_json::Error,
}

/// The set of fields a client explicitly supplied in an update body.
///
/// Keys are wire field names; values are the raw decoded JSON values.
/// Constructed per request, consumed immediately by a domain field-map
/// validator, then discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparsePatch {
    fields: Map<String, Value>,
}

impl SparsePatch {
    pub fn builder() -> SparsePatchBuilder {
        SparsePatchBuilder {
            fields: Map::new(),
            error: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// Builder inserting only present fields into the patch.
///
/// Encoding errors are latched and reported once by [`build`], so handler
/// code can chain `set` calls without checking each one.
///
/// [`build`]: SparsePatchBuilder::build
#[derive(Debug)]
pub struct SparsePatchBuilder {
    fields: Map<String, Value>,
    error: Option<PatchError>,
}

impl SparsePatchBuilder {
    /// Insert `name` only when the option carries a value.
    ///
    /// A `None` (absent or JSON `null` in the body) leaves the patch
    /// untouched, so the field cannot reach the backend at all.
    pub fn set<T: Serialize>(self, name: &'static str, value: &Option<T>) -> Self {
        match value {
            Some(value) => self.insert(name, value),
            None => self,
        }
    }

    /// Insert `name` unconditionally.
    ///
    /// For fields without an absent/present marker, whose zero value is
    /// indistinguishable from "unset" and is treated as always sent.
    pub fn set_always<T: Serialize>(self, name: &'static str, value: &T) -> Self {
        self.insert(name, value)
    }

    fn insert<T: Serialize>(mut self, name: &'static str, value: &T) -> Self {
        if self.error.is_some() {
            return self;
        }
        match serde_json::to_value(value) {
            Ok(encoded) => {
                self.fields.insert(name.to_string(), encoded);
            }
            Err(source) => {
                self.error = Some(PatchError {
                    field: name,
                    source,
                });
            }
        }
        self
    }

    pub fn build(self) -> Result<SparsePatch, PatchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(SparsePatch {
                fields: self.fields,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct UpdateRequest {
        name: Option<String>,
        detail: Option<String>,
        service_level: Option<i64>,
    }

    fn patch_from(req: &UpdateRequest) -> SparsePatch {
        SparsePatch::builder()
            .set("name", &req.name)
            .set("detail", &req.detail)
            .set("service_level", &req.service_level)
            .build()
            .unwrap()
    }

    #[test]
    fn absent_fields_never_appear() {
        let req: UpdateRequest = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        let patch = patch_from(&req);

        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("name"), Some(&Value::String("x".to_string())));
        assert!(patch.get("detail").is_none());
        assert!(patch.get("service_level").is_none());
    }

    #[test]
    fn null_is_treated_as_absent() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"name": "x", "detail": null}"#).unwrap();
        let patch = patch_from(&req);

        assert_eq!(patch.len(), 1);
        assert!(patch.get("detail").is_none());
    }

    #[test]
    fn explicit_zero_values_are_kept() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"name": "", "service_level": 0}"#).unwrap();
        let patch = patch_from(&req);

        assert_eq!(patch.get("name"), Some(&Value::String(String::new())));
        assert_eq!(patch.get("service_level"), Some(&Value::from(0)));
    }

    #[test]
    fn building_twice_yields_the_same_map() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"detail": "d", "service_level": 3}"#).unwrap();
        assert_eq!(patch_from(&req), patch_from(&req));
    }

    #[test]
    fn set_always_includes_unmarked_fields() {
        let patch = SparsePatch::builder()
            .set("name", &None::<String>)
            .set_always("deleted", &false)
            .build()
            .unwrap();

        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("deleted"), Some(&Value::Bool(false)));
    }

    #[test]
    fn empty_body_yields_empty_patch() {
        let req: UpdateRequest = serde_json::from_str("{}").unwrap();
        let patch = patch_from(&req);
        assert!(patch.is_empty());
    }
}
