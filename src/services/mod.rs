//! Services module
//!
//! The backend facade: the `ServiceHandler` trait every handler calls
//! through, its RPC client implementation, and the canned mock the handler
//! tests use.

pub mod client;
pub mod service_handler;

#[cfg(test)]
pub mod mock;

pub use client::RpcServiceHandler;
pub use service_handler::{ServiceError, ServiceHandler};
