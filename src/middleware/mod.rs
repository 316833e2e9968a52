//! Middleware module
//!
//! Contains HTTP middleware for authentication and request logging.

pub mod auth;
pub mod logging;

// Re-export commonly used items
pub use auth::{authenticate, AuthError, AuthState};
pub use logging::{log_request, TraceId, REQUEST_ID_HEADER, TRACE_ID_HEADER};
