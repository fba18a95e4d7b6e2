//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `AdvisoryBackend` - the remote advisory service (sessions, answers,
//!   advice status, health)

mod advisory_backend;

pub use advisory_backend::{
    AdviceResponse, AdviceStatus, AdvisoryBackend, CreateSessionRequest, CreateSessionResponse,
    ServiceStatus, SubmitAnswersRequest, SubmitAnswersResponse, TransportError,
};
