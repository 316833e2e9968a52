//! Authenticated caller identity
//!
//! The `Agent` is attached to request extensions by the authentication
//! middleware; handlers treat its absence as a malformed request (400),
//! never as an authorization failure, because authentication itself is
//! owned by the upstream middleware.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission bit: administrator of the owning customer.
pub const PERMISSION_CUSTOMER_ADMIN: u64 = 1 << 4;

/// Permission bit: project-wide super administrator.
pub const PERMISSION_PROJECT_SUPER_ADMIN: u64 = 1 << 16;

/// The authenticated caller's identity and permission record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: Uuid,
    pub customer_id: Uuid,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub permission: u64,
}

impl Agent {
    pub fn has_permission(&self, permission: u64) -> bool {
        self.permission & permission != 0
    }
}
