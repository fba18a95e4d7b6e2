//! Mock advisory backend for testing.
//!
//! Provides a scriptable implementation of the AdvisoryBackend port so the
//! client and controller can be exercised without a running server.
//!
//! # Features
//!
//! - Per-operation response queues (consumed in order)
//! - Sensible defaults once a queue is empty
//! - Simulated latency
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let backend = MockAdvisoryBackend::new()
//!     .with_processing(2)
//!     .with_completed(advice);
//!
//! let client = AdvisoryClient::new(Arc::new(backend));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::advice::{AdviceItem, ROSTER};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::session::ProbingAnswers;
use crate::ports::{
    AdviceStatus, AdvisoryBackend, CreateSessionRequest, CreateSessionResponse, ServiceStatus,
    SubmitAnswersResponse, TransportError,
};

type Queue<T> = Arc<Mutex<VecDeque<Result<T, TransportError>>>>;

/// A recorded call against the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateSession { question: String },
    SubmitAnswers { session_id: SessionId, answers: Vec<String> },
    GetAdvice { session_id: SessionId },
    Health,
}

/// Scriptable advisory backend.
#[derive(Debug, Clone)]
pub struct MockAdvisoryBackend {
    create_responses: Queue<CreateSessionResponse>,
    submit_responses: Queue<SubmitAnswersResponse>,
    advice_responses: Queue<AdviceStatus>,
    health_responses: Queue<ServiceStatus>,
    /// Simulated latency per request.
    delay: Duration,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl Default for MockAdvisoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdvisoryBackend {
    /// Creates a mock that answers every call with its default response.
    pub fn new() -> Self {
        Self {
            create_responses: Arc::new(Mutex::new(VecDeque::new())),
            submit_responses: Arc::new(Mutex::new(VecDeque::new())),
            advice_responses: Arc::new(Mutex::new(VecDeque::new())),
            health_responses: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Builds a creation response from plain string slices.
    pub fn session_response(
        session_id: &str,
        questions: &[&str],
        options: &[&[&str]],
    ) -> CreateSessionResponse {
        CreateSessionResponse {
            session_id: session_id.to_string(),
            probing_questions: questions.iter().map(|q| q.to_string()).collect(),
            probing_options: options
                .iter()
                .map(|set| set.iter().map(|o| o.to_string()).collect())
                .collect(),
            created_at: Some(Timestamp::now()),
        }
    }

    /// Advice the mock returns once its advice queue is empty.
    pub fn default_advice() -> Vec<AdviceItem> {
        ROSTER
            .iter()
            .map(|p| {
                AdviceItem::new(
                    p.name,
                    p.title,
                    p.default_confidence,
                    format!("{} would start from first principles.", p.name),
                )
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scripting
    // ─────────────────────────────────────────────────────────────────────────

    /// Queues a successful session creation.
    pub fn with_session(self, response: CreateSessionResponse) -> Self {
        push(&self.create_responses, Ok(response));
        self
    }

    pub fn with_create_error(self, error: TransportError) -> Self {
        push(&self.create_responses, Err(error));
        self
    }

    pub fn with_submit_error(self, error: TransportError) -> Self {
        push(&self.submit_responses, Err(error));
        self
    }

    /// Queues `times` "still processing" advice responses.
    pub fn with_processing(self, times: usize) -> Self {
        for _ in 0..times {
            push(&self.advice_responses, Ok(AdviceStatus::Processing));
        }
        self
    }

    /// Queues a completed advice response.
    pub fn with_completed(self, advice: Vec<AdviceItem>) -> Self {
        push(&self.advice_responses, Ok(AdviceStatus::Completed(advice)));
        self
    }

    pub fn with_advice_error(self, error: TransportError) -> Self {
        push(&self.advice_responses, Err(error));
        self
    }

    pub fn with_health_error(self, error: TransportError) -> Self {
        push(&self.health_responses, Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns all recorded calls, oldest first.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn submit_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::SubmitAnswers { .. }))
    }

    pub fn advice_request_count(&self) -> usize {
        self.count(|c| matches!(c, BackendCall::GetAdvice { .. }))
    }

    fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    async fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

fn push<T>(queue: &Queue<T>, item: Result<T, TransportError>) {
    queue.lock().unwrap().push_back(item);
}

fn pop<T>(queue: &Queue<T>) -> Option<Result<T, TransportError>> {
    queue.lock().unwrap().pop_front()
}

fn default_session() -> CreateSessionResponse {
    MockAdvisoryBackend::session_response(
        &Uuid::new_v4().to_string(),
        &[
            "What stage is your business or project currently in?",
            "What's your primary goal with this challenge?",
            "What resources or constraints are you working with?",
        ],
        &[
            &[
                "Just an idea - haven't started yet",
                "Early stage - validating concept",
                "Growing business - scaling challenges",
                "Established - looking to innovate",
            ],
            &[
                "Increase revenue and profitability",
                "Enter new markets or segments",
                "Develop better products or services",
            ],
            &[
                "Limited budget, need creative solutions",
                "Small team, need to prioritize",
                "Time-sensitive opportunity",
            ],
        ],
    )
}

#[async_trait]
impl AdvisoryBackend for MockAdvisoryBackend {
    async fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> Result<CreateSessionResponse, TransportError> {
        self.record(BackendCall::CreateSession {
            question: request.user_question.clone(),
        })
        .await;
        pop(&self.create_responses).unwrap_or_else(|| Ok(default_session()))
    }

    async fn submit_answers(
        &self,
        session_id: &SessionId,
        answers: &ProbingAnswers,
    ) -> Result<SubmitAnswersResponse, TransportError> {
        self.record(BackendCall::SubmitAnswers {
            session_id: session_id.clone(),
            answers: answers.iter().map(|(_, a)| a.to_string()).collect(),
        })
        .await;
        pop(&self.submit_responses).unwrap_or_else(|| {
            Ok(SubmitAnswersResponse {
                session_id: session_id.to_string(),
                processing: true,
                estimated_completion: Some(Timestamp::now().plus_secs(30)),
            })
        })
    }

    async fn get_advice(&self, session_id: &SessionId) -> Result<AdviceStatus, TransportError> {
        self.record(BackendCall::GetAdvice {
            session_id: session_id.clone(),
        })
        .await;
        pop(&self.advice_responses)
            .unwrap_or_else(|| Ok(AdviceStatus::Completed(Self::default_advice())))
    }

    async fn health(&self) -> Result<ServiceStatus, TransportError> {
        self.record(BackendCall::Health).await;
        pop(&self.health_responses).unwrap_or_else(|| {
            Ok(ServiceStatus {
                body: serde_json::json!({"message": "Innovation Board API"}),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid() -> SessionId {
        SessionId::new("s-1").unwrap()
    }

    #[tokio::test]
    async fn serves_queued_responses_in_order_then_defaults() {
        let backend = MockAdvisoryBackend::new()
            .with_processing(1)
            .with_advice_error(TransportError::status(404, None));

        assert_eq!(backend.get_advice(&sid()).await, Ok(AdviceStatus::Processing));
        assert_eq!(
            backend.get_advice(&sid()).await,
            Err(TransportError::status(404, None))
        );
        assert!(matches!(
            backend.get_advice(&sid()).await,
            Ok(AdviceStatus::Completed(items)) if items.len() == ROSTER.len()
        ));
    }

    #[tokio::test]
    async fn default_session_has_three_probing_questions() {
        let backend = MockAdvisoryBackend::new();
        let response = backend
            .create_session(&CreateSessionRequest::new("q"))
            .await
            .unwrap();
        assert_eq!(response.probing_questions.len(), 3);
        assert_eq!(response.probing_options.len(), 3);
    }

    #[tokio::test]
    async fn records_calls() {
        let backend = MockAdvisoryBackend::new();
        let mut answers = ProbingAnswers::new(1);
        answers.record(0, "yes").unwrap();

        backend.health().await.unwrap();
        backend.submit_answers(&sid(), &answers).await.unwrap();

        assert_eq!(
            backend.calls(),
            vec![
                BackendCall::Health,
                BackendCall::SubmitAnswers {
                    session_id: sid(),
                    answers: vec!["yes".into()],
                },
            ]
        );
        assert_eq!(backend.submit_count(), 1);
        assert_eq!(backend.advice_request_count(), 0);
    }

    #[tokio::test]
    async fn clones_share_script_and_history() {
        let backend = MockAdvisoryBackend::new().with_processing(1);
        let clone = backend.clone();

        assert_eq!(clone.get_advice(&sid()).await, Ok(AdviceStatus::Processing));
        assert_eq!(backend.advice_request_count(), 1);
    }
}
