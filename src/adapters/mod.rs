//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `backend` - Advisory backend clients (HTTP, mock)

pub mod backend;

pub use backend::{BackendCall, HttpAdvisoryBackend, HttpBackendConfig, MockAdvisoryBackend};
