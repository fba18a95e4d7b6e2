//! Advisory Backend Adapters.
//!
//! Implementations of the AdvisoryBackend port.
//!
//! ## Available Adapters
//!
//! - `HttpAdvisoryBackend` - JSON over HTTP against the advisory REST API
//! - `MockAdvisoryBackend` - Scriptable mock for testing

mod http_backend;
mod mock_backend;

pub use http_backend::{HttpAdvisoryBackend, HttpBackendConfig};
pub use mock_backend::{BackendCall, MockAdvisoryBackend};
