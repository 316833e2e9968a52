//! Timeline event wire models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single event on a resource's timeline.
///
/// Timeline listings are the one place the backend computes the next page
/// token itself, so the event carries no cursor of its own; the handler
/// wraps the pair with [`ListResponse::new`].
///
/// [`ListResponse::new`]: crate::pagination::ListResponse::new
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub timestamp: String,
    pub event_type: String,

    #[serde(default)]
    pub data: Value,
}

/// Resource types a timeline can be requested for.
pub const TIMELINE_RESOURCE_TYPES: [&str; 3] = ["calls", "conferences", "campaigns"];

/// Whether `resource_type` names a resource with a timeline.
pub fn is_timeline_resource(resource_type: &str) -> bool {
    TIMELINE_RESOURCE_TYPES.contains(&resource_type)
}
