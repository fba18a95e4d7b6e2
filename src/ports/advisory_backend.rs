//! Advisory Backend Port - Interface to the remote advisory service.
//!
//! This port abstracts the four calls the client makes against the backend,
//! letting the advisory client run against HTTP in production and a scripted
//! mock in tests.
//!
//! # Design
//!
//! - Transport-agnostic request/response types mirroring the wire contract
//! - Errors carry raw transport signals (`TransportError`); classifying them
//!   into the user-facing taxonomy is the advisory client's job
//! - "Still processing" is a successful answer of `get_advice`, not an error
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct AlwaysBusy;
//!
//! #[async_trait]
//! impl AdvisoryBackend for AlwaysBusy {
//!     async fn get_advice(&self, _id: &SessionId) -> Result<AdviceStatus, TransportError> {
//!         Ok(AdviceStatus::Processing)
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::advice::AdviceItem;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::ProbingAnswers;

/// Port for the remote advisory service.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// Create a session and receive its probing questions.
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, TransportError>;

    /// Submit the complete answer set and start advice generation.
    async fn submit_answers(
        &self,
        session_id: &SessionId,
        answers: &ProbingAnswers,
    ) -> Result<SubmitAnswersResponse, TransportError>;

    /// Ask for the advice status of a session (single request, no retry).
    async fn get_advice(&self, session_id: &SessionId) -> Result<AdviceStatus, TransportError>;

    /// No-argument connectivity probe.
    async fn health(&self) -> Result<ServiceStatus, TransportError>;
}

/// Request body for session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub user_question: String,
}

impl CreateSessionRequest {
    pub fn new(user_question: impl Into<String>) -> Self {
        Self {
            user_question: user_question.into(),
        }
    }
}

/// Response body for session creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub probing_questions: Vec<String>,
    /// Parallel to `probing_questions`; may be shorter.
    #[serde(default)]
    pub probing_options: Vec<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// Request body for answer submission.
#[derive(Debug, Serialize)]
pub struct SubmitAnswersRequest<'a> {
    pub answers: &'a ProbingAnswers,
}

/// Acknowledgement of answer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub session_id: String,
    #[serde(default = "default_processing")]
    pub processing: bool,
    #[serde(default)]
    pub estimated_completion: Option<Timestamp>,
}

fn default_processing() -> bool {
    true
}

/// Wire shape of the advice status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviceResponse {
    pub status: String,
    #[serde(default)]
    pub advice: Vec<AdviceItem>,
}

impl TryFrom<AdviceResponse> for AdviceStatus {
    type Error = TransportError;

    fn try_from(response: AdviceResponse) -> Result<Self, Self::Error> {
        match response.status.as_str() {
            "completed" => Ok(AdviceStatus::Completed(response.advice)),
            "processing" => Ok(AdviceStatus::Processing),
            other => Err(TransportError::UnexpectedStatus(other.to_string())),
        }
    }
}

/// Outcome of a single advice status request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceStatus {
    /// Generation finished; the advice list is final.
    Completed(Vec<AdviceItem>),
    /// Generation is still running.
    Processing,
}

/// Body of the connectivity probe, passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceStatus {
    pub body: serde_json::Value,
}

/// Raw transport failures reported by backend adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// Server-supplied `detail` message, if any.
        detail: Option<String>,
    },

    /// No response was received (connect failure, request timeout).
    #[error("no response: {0}")]
    NoResponse(String),

    /// A response arrived but its body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The advice endpoint reported a status this client does not know.
    #[error("unexpected advice status: {0}")]
    UnexpectedStatus(String),

    /// The request could not be built or sent for a local reason.
    #[error("client error: {0}")]
    Client(String),
}

impl TransportError {
    pub fn status(status: u16, detail: Option<String>) -> Self {
        Self::Status { status, detail }
    }

    pub fn no_response(message: impl Into<String>) -> Self {
        Self::NoResponse(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }
}
