//! AdvisoryClient - all network interaction with the advisory backend.
//!
//! Translates the logical operations (create session, submit answers, wait for
//! advice, probe connectivity) into backend calls and classifies every failure
//! into [`AdvisoryErrorKind`]. Raw transport errors never leave this module.
//!
//! # Polling
//!
//! ```text
//! attempt 1 ── Processing / NetworkError ──sleep(interval)──> attempt 2 ... attempt N
//!     │                                                                      │
//!     ├── Completed ──────────> Ok(advice)                  Processing ──────┴──> Timeout
//!     └── any other failure ──> Err(kind)   (no further attempts)
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::PollingConfig;
use crate::domain::advice::AdviceItem;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::ProbingAnswers;
use crate::ports::{AdviceStatus, AdvisoryBackend, CreateSessionRequest, ServiceStatus, TransportError};

use super::errors::{AdvisoryError, AdvisoryErrorKind, MSG_INVALID_INPUT};

/// Poll loop bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Maximum number of status requests for one advice retrieval.
    pub max_attempts: u32,
    /// Wait between consecutive attempts.
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_millis(2000),
        }
    }
}

impl From<&PollingConfig> for PollSettings {
    fn from(config: &PollingConfig) -> Self {
        Self::new(config.max_attempts, config.interval())
    }
}

/// Tagged result of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    Success(T),
    StillProcessing,
    Failure(AdvisoryError),
}

/// A freshly created session as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSession {
    pub session_id: SessionId,
    pub probing_questions: Vec<String>,
    pub probing_options: Vec<Vec<String>>,
    pub created_at: Timestamp,
}

/// Acknowledgement that answers were accepted and generation started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitAck {
    pub acknowledged: bool,
    pub estimated_completion: Option<Timestamp>,
}

/// Client for the advisory backend.
pub struct AdvisoryClient {
    backend: Arc<dyn AdvisoryBackend>,
    poll_settings: PollSettings,
}

impl AdvisoryClient {
    /// Creates a client with default poll settings (30 attempts, 2 s apart).
    pub fn new(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self {
            backend,
            poll_settings: PollSettings::default(),
        }
    }

    /// Sets the poll settings used by callers that do not pass their own.
    pub fn with_poll_settings(mut self, settings: PollSettings) -> Self {
        self.poll_settings = settings;
        self
    }

    pub fn poll_settings(&self) -> PollSettings {
        self.poll_settings
    }

    /// Create a session for `question`.
    ///
    /// The question is trimmed and forwarded; length limits are left to the
    /// caller and the backend.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` without a network call if the trimmed question is empty
    /// - any classified backend failure
    pub async fn create_session(&self, question: &str) -> Result<CreatedSession, AdvisoryError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdvisoryError::invalid_input("Question cannot be empty."));
        }

        debug!(chars = question.chars().count(), "Creating advisory session");
        let response = self
            .backend
            .create_session(&CreateSessionRequest::new(question))
            .await
            .map_err(|e| Self::log_and_classify(&e, "Failed to create advisory session"))?;

        let session_id = SessionId::new(response.session_id).map_err(|e| {
            warn!(error = %e, "Backend returned an unusable session id");
            AdvisoryError::unknown("Failed to create advisory session")
        })?;

        info!(
            session_id = %session_id,
            probing_questions = response.probing_questions.len(),
            "Advisory session created"
        );
        Ok(CreatedSession {
            session_id,
            probing_questions: response.probing_questions,
            probing_options: response.probing_options,
            created_at: response.created_at.unwrap_or_else(Timestamp::now),
        })
    }

    /// Submit the complete answer set for a session.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` without a network call if `answers` is incomplete
    /// - any classified backend failure
    pub async fn submit_probing_answers(
        &self,
        session_id: &SessionId,
        answers: &ProbingAnswers,
    ) -> Result<SubmitAck, AdvisoryError> {
        if !answers.is_complete() {
            return Err(AdvisoryError::invalid_input(format!(
                "Expected {} probing answers, got {}.",
                answers.expected(),
                answers.len()
            )));
        }

        debug!(session_id = %session_id, answers = answers.len(), "Submitting probing answers");
        let response = self
            .backend
            .submit_answers(session_id, answers)
            .await
            .map_err(|e| Self::log_and_classify(&e, "Failed to submit probing answers"))?;

        info!(session_id = %session_id, "Advice generation started");
        Ok(SubmitAck {
            acknowledged: response.processing,
            estimated_completion: response.estimated_completion,
        })
    }

    /// Issue one advice status request.
    pub async fn check_advice(&self, session_id: &SessionId) -> RequestOutcome<Vec<AdviceItem>> {
        match self.backend.get_advice(session_id).await {
            Ok(AdviceStatus::Completed(advice)) => RequestOutcome::Success(advice),
            Ok(AdviceStatus::Processing) => RequestOutcome::StillProcessing,
            Err(e) => RequestOutcome::Failure(Self::log_and_classify(&e, "Failed to get advice")),
        }
    }

    /// Wait for advice, polling at most `settings.max_attempts` times.
    ///
    /// "Still processing" and `NetworkError` attempts are retried after
    /// `settings.interval`; every other failure ends the loop at once.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` without a network call if `max_attempts` is zero
    /// - `Timeout` once all attempts are used up
    /// - the first non-network failure reported by the backend
    pub async fn poll_for_advice(
        &self,
        session_id: &SessionId,
        settings: PollSettings,
    ) -> Result<Vec<AdviceItem>, AdvisoryError> {
        if settings.max_attempts == 0 {
            return Err(AdvisoryError::invalid_input("max_attempts must be at least 1"));
        }

        for attempt in 1..=settings.max_attempts {
            debug!(
                session_id = %session_id,
                attempt,
                max_attempts = settings.max_attempts,
                "Polling for advice"
            );

            match self.check_advice(session_id).await {
                RequestOutcome::Success(advice) => {
                    info!(session_id = %session_id, attempt, items = advice.len(), "Advice ready");
                    return Ok(advice);
                }
                RequestOutcome::StillProcessing => {
                    debug!(session_id = %session_id, attempt, "Advice still processing");
                }
                RequestOutcome::Failure(err) if err.kind == AdvisoryErrorKind::NetworkError => {
                    warn!(session_id = %session_id, attempt, "Polling attempt failed, retrying");
                }
                RequestOutcome::Failure(err) => return Err(err),
            }

            if attempt < settings.max_attempts {
                sleep(settings.interval).await;
            }
        }

        warn!(
            session_id = %session_id,
            max_attempts = settings.max_attempts,
            "Advice polling exhausted"
        );
        Err(AdvisoryError::timeout())
    }

    /// Connectivity probe.
    pub async fn test_connection(&self) -> Result<ServiceStatus, AdvisoryError> {
        self.backend
            .health()
            .await
            .map_err(|e| Self::log_and_classify(&e, "Failed to connect to backend"))
    }

    /// Maps a transport failure onto the advisory taxonomy.
    ///
    /// `default_message` is used when neither the status nor the server
    /// supplies anything more specific.
    pub fn handle_error(error: &TransportError, default_message: &str) -> AdvisoryError {
        match error {
            TransportError::Status { status: 404, .. } => AdvisoryError::not_found(),
            TransportError::Status {
                status: 400 | 422,
                detail,
            } => AdvisoryError::invalid_input(
                detail.clone().unwrap_or_else(|| MSG_INVALID_INPUT.to_string()),
            ),
            TransportError::Status {
                status: 500..=599, ..
            } => AdvisoryError::server_error(),
            TransportError::Status { detail, .. } => {
                AdvisoryError::unknown(detail.clone().unwrap_or_else(|| default_message.to_string()))
            }
            TransportError::NoResponse(_) => AdvisoryError::network(),
            TransportError::UnexpectedStatus(status) => {
                AdvisoryError::unknown(format!("Unexpected status: {}", status))
            }
            TransportError::Decode(_) | TransportError::Client(_) => {
                AdvisoryError::unknown(default_message)
            }
        }
    }

    fn log_and_classify(error: &TransportError, default_message: &str) -> AdvisoryError {
        let classified = Self::handle_error(error, default_message);
        warn!(error = %error, kind = %classified.kind, "{}", default_message);
        classified
    }
}
