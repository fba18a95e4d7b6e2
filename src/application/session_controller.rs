//! SessionController - drives one advisory session through its steps.
//!
//! The controller owns all presentation-facing state: the question draft, the
//! live [`Session`], the current [`SessionStep`] and the last failure. Backend
//! work is split in three so that a reset can cancel it:
//!
//! 1. `begin_*` validates the input, marks an operation outstanding and hands
//!    back a [`PendingOperation`] tagged with the current epoch.
//! 2. [`PendingOperation::execute`] performs the network calls. It borrows only
//!    the [`AdvisoryClient`], never the controller.
//! 3. [`SessionController::apply`] merges the [`Completion`] if its tag is
//!    still the outstanding one. Anything else is stale and discarded.
//!
//! `submit_question` and `choose_option` chain the three steps for callers
//! that simply await.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::advice::AdviceItem;
use crate::domain::foundation::{SessionId, StateMachine, ValidationError};
use crate::domain::session::{
    validate_question, ProbingAnswers, Session, SessionStep, MAX_QUESTION_LENGTH,
};

use super::advisory_client::{AdvisoryClient, CreatedSession};
use super::errors::AdvisoryError;

/// Identifies one backend operation.
///
/// `epoch` increases on every reset, so a tag issued before a reset never
/// matches afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTag {
    pub epoch: u64,
    pub session_id: Option<SessionId>,
}

/// Backend work started by the controller but not yet performed.
#[derive(Debug, Clone)]
pub enum PendingOperation {
    CreateSession {
        tag: OperationTag,
        question: String,
    },
    /// Submit the full answer set, then wait for advice.
    RequestAdvice {
        tag: OperationTag,
        session_id: SessionId,
        answers: ProbingAnswers,
    },
}

impl PendingOperation {
    pub fn tag(&self) -> &OperationTag {
        match self {
            PendingOperation::CreateSession { tag, .. } => tag,
            PendingOperation::RequestAdvice { tag, .. } => tag,
        }
    }

    /// Performs the backend calls, strictly in sequence.
    pub async fn execute(self, client: &AdvisoryClient) -> Completion {
        match self {
            PendingOperation::CreateSession { tag, question } => {
                let result = client.create_session(&question).await;
                Completion {
                    tag,
                    outcome: CompletionOutcome::SessionCreated { question, result },
                }
            }
            PendingOperation::RequestAdvice {
                tag,
                session_id,
                answers,
            } => {
                let result = request_advice(client, &session_id, &answers).await;
                Completion {
                    tag,
                    outcome: CompletionOutcome::Advice(result),
                }
            }
        }
    }
}

async fn request_advice(
    client: &AdvisoryClient,
    session_id: &SessionId,
    answers: &ProbingAnswers,
) -> Result<Vec<AdviceItem>, AdvisoryError> {
    client.submit_probing_answers(session_id, answers).await?;
    client
        .poll_for_advice(session_id, client.poll_settings())
        .await
}

/// Result of an executed [`PendingOperation`].
#[derive(Debug, Clone)]
pub struct Completion {
    pub tag: OperationTag,
    pub outcome: CompletionOutcome,
}

#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    SessionCreated {
        question: String,
        result: Result<CreatedSession, AdvisoryError>,
    },
    Advice(Result<Vec<AdviceItem>, AdvisoryError>),
}

/// What `apply` did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    /// Merged; carries the step the controller is now in.
    Applied(SessionStep),
    /// Stale or unexpected; state untouched.
    Discarded,
}

/// Client-side state machine for a single advisory session.
pub struct SessionController {
    client: Arc<AdvisoryClient>,
    draft: String,
    step: SessionStep,
    session: Option<Session>,
    error: Option<AdvisoryError>,
    outstanding: Option<OperationTag>,
    epoch: u64,
}

impl SessionController {
    pub fn new(client: Arc<AdvisoryClient>) -> Self {
        Self {
            client,
            draft: String::new(),
            step: SessionStep::Question,
            session: None,
            error: None,
            outstanding: None,
            epoch: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn client(&self) -> &Arc<AdvisoryClient> {
        &self.client
    }

    pub fn step(&self) -> SessionStep {
        self.step
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Last failure; set only in the `Error` step.
    pub fn error(&self) -> Option<&AdvisoryError> {
        self.error.as_ref()
    }

    /// Advice of the live session, empty until the `Advice` step.
    pub fn advice(&self) -> &[AdviceItem] {
        self.session.as_ref().map(Session::advice).unwrap_or(&[])
    }

    /// True while a backend operation is outstanding.
    pub fn is_busy(&self) -> bool {
        self.outstanding.is_some()
    }

    /// True when `submit_question` would reach the backend.
    pub fn can_submit(&self) -> bool {
        self.step == SessionStep::Question
            && !self.is_busy()
            && validate_question(&self.draft).is_ok()
    }

    /// Characters left before the question limit.
    pub fn remaining_chars(&self) -> usize {
        MAX_QUESTION_LENGTH.saturating_sub(self.draft.chars().count())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the question draft. Ignored outside an idle `Question` step.
    pub fn edit_question(&mut self, text: impl Into<String>) -> bool {
        if self.step != SessionStep::Question || self.is_busy() {
            return false;
        }
        self.draft = text.into();
        true
    }

    /// Start session creation for the current draft.
    ///
    /// Returns `None`, changing nothing, when [`can_submit`](Self::can_submit)
    /// is false.
    pub fn begin_submit(&mut self) -> Option<PendingOperation> {
        if !self.can_submit() {
            debug!(step = %self.step, busy = self.is_busy(), "Question submit ignored");
            return None;
        }

        let tag = OperationTag {
            epoch: self.epoch,
            session_id: None,
        };
        self.outstanding = Some(tag.clone());
        Some(PendingOperation::CreateSession {
            tag,
            question: self.draft.trim().to_string(),
        })
    }

    /// Record `answer` for the probing question currently shown.
    ///
    /// Returns the advice request once the last question is answered, and
    /// `None` (no network work) for every earlier one.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if no probing question is awaiting an answer
    /// - `InvalidTransition` if the step machine refuses `AwaitingAdvice`
    pub fn begin_answer(
        &mut self,
        answer: impl Into<String>,
    ) -> Result<Option<PendingOperation>, ValidationError> {
        if self.step != SessionStep::Probing || self.is_busy() {
            return Err(ValidationError::invalid_format(
                "answer",
                format!("no probing question is awaiting an answer in step {}", self.step),
            ));
        }
        let next = self.step.transition_to(SessionStep::AwaitingAdvice)?;
        let session = self.session.as_mut().ok_or_else(|| {
            ValidationError::invalid_format("answer", "no live session")
        })?;

        let index = session.current_index();
        if !session.answer_current(answer)? {
            debug!(session_id = %session.id(), index, "Probing answer recorded");
            return Ok(None);
        }

        let session_id = session.id().clone();
        let answers = session.answers().clone();
        info!(session_id = %session_id, from = %self.step, to = %next, "Session step changed");
        self.step = next;

        let tag = OperationTag {
            epoch: self.epoch,
            session_id: Some(session_id.clone()),
        };
        self.outstanding = Some(tag.clone());
        Ok(Some(PendingOperation::RequestAdvice {
            tag,
            session_id,
            answers,
        }))
    }

    /// Merge an executed operation into the controller.
    pub fn apply(&mut self, completion: Completion) -> ApplyResult {
        if self.outstanding.as_ref() != Some(&completion.tag) {
            warn!(
                epoch = completion.tag.epoch,
                current_epoch = self.epoch,
                "Discarding stale operation result"
            );
            return ApplyResult::Discarded;
        }
        self.outstanding = None;

        match completion.outcome {
            CompletionOutcome::SessionCreated {
                question,
                result: Ok(created),
            } => match build_session(&question, created) {
                Ok(session) => {
                    self.session = Some(session);
                    self.move_to(SessionStep::Probing);
                }
                Err(e) => {
                    warn!(error = %e, "Backend returned an unusable session");
                    self.fail(AdvisoryError::unknown(format!(
                        "Failed to create advisory session: {}",
                        e
                    )));
                }
            },
            CompletionOutcome::SessionCreated { result: Err(e), .. } => self.fail(e),
            CompletionOutcome::Advice(Ok(advice)) => match self.session.as_mut() {
                Some(session) => {
                    session.complete_with(advice);
                    self.move_to(SessionStep::Advice);
                }
                None => {
                    error!("Advice arrived without a live session");
                    return ApplyResult::Discarded;
                }
            },
            CompletionOutcome::Advice(Err(e)) => self.fail(e),
        }

        ApplyResult::Applied(self.step)
    }

    /// Abandon the session and return to an empty `Question` step.
    ///
    /// Any outstanding operation becomes stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.outstanding = None;
        self.session = None;
        self.error = None;
        self.draft.clear();
        if self.step != SessionStep::Question {
            self.move_to(SessionStep::Question);
        }
    }

    /// Submit the draft and wait for the session to be created.
    pub async fn submit_question(&mut self) -> SessionStep {
        if let Some(operation) = self.begin_submit() {
            let completion = operation.execute(&self.client).await;
            self.apply(completion);
        }
        self.step
    }

    /// Answer the current probing question; on the last one, wait for advice.
    ///
    /// # Errors
    ///
    /// See [`begin_answer`](Self::begin_answer).
    pub async fn choose_option(
        &mut self,
        answer: impl Into<String>,
    ) -> Result<SessionStep, ValidationError> {
        if let Some(operation) = self.begin_answer(answer)? {
            let completion = operation.execute(&self.client).await;
            self.apply(completion);
        }
        Ok(self.step)
    }

    /// Startup connectivity probe.
    ///
    /// Returns a warning to show the user when the backend is unreachable.
    /// The step never changes.
    pub async fn check_connectivity(&self) -> Option<String> {
        match self.client.test_connection().await {
            Ok(_) => None,
            Err(e) => {
                warn!(kind = %e.kind, "Advisory backend unreachable");
                Some(format!("Cannot connect to the advisory backend. {}", e.message))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn fail(&mut self, err: AdvisoryError) {
        warn!(kind = %err.kind, message = %err.message, "Advisory operation failed");
        self.error = Some(err);
        self.move_to(SessionStep::Error);
    }

    fn move_to(&mut self, target: SessionStep) {
        match self.step.transition_to(target) {
            Ok(next) => {
                info!(from = %self.step, to = %next, "Session step changed");
                self.step = next;
            }
            Err(e) => error!(error = %e, "Refused session step change"),
        }
    }
}

fn build_session(question: &str, created: CreatedSession) -> Result<Session, ValidationError> {
    Session::new(
        created.session_id,
        question,
        created.probing_questions,
        created.probing_options,
        created.created_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::backend::{BackendCall, MockAdvisoryBackend};
    use crate::application::advisory_client::PollSettings;
    use crate::application::errors::{AdvisoryErrorKind, MSG_NOT_FOUND};
    use crate::ports::{CreateSessionResponse, TransportError};
    use proptest::prelude::*;
    use std::time::Duration;

    fn controller(backend: &Arc<MockAdvisoryBackend>) -> SessionController {
        let client = AdvisoryClient::new(backend.clone())
            .with_poll_settings(PollSettings::new(5, Duration::from_millis(10)));
        SessionController::new(Arc::new(client))
    }

    fn saas_session() -> CreateSessionResponse {
        MockAdvisoryBackend::session_response(
            "saas-1",
            &[
                "Who are your customers?",
                "What do competitors charge?",
                "How fast do you need revenue?",
            ],
            &[
                &["SMBs", "Enterprises"],
                &["Under $20/month", "Over $100/month"],
                &["This quarter", "Within a year"],
            ],
        )
    }

    fn saas_advice() -> Vec<AdviceItem> {
        vec![
            AdviceItem::new("Jeff Bezos", "Amazon Founder", "94.7%", "Price for the long term."),
            AdviceItem::new("Steve Jobs", "Apple Co-founder", "96.2%", "Charge for the experience."),
        ]
    }

    async fn probing(backend: &Arc<MockAdvisoryBackend>) -> SessionController {
        let mut controller = controller(backend);
        controller.edit_question("How should I price my SaaS product?");
        assert_eq!(controller.submit_question().await, SessionStep::Probing);
        controller
    }

    #[tokio::test]
    async fn blank_question_never_reaches_backend() {
        let backend = Arc::new(MockAdvisoryBackend::new());
        let mut controller = controller(&backend);

        controller.edit_question("   \n ");
        assert!(!controller.can_submit());
        assert!(controller.begin_submit().is_none());
        assert_eq!(controller.submit_question().await, SessionStep::Question);

        assert_eq!(backend.call_count(), 0);
        assert!(controller.session().is_none());
        assert!(!controller.is_busy());
    }

    #[test]
    fn overlong_question_cannot_be_submitted() {
        let backend = Arc::new(MockAdvisoryBackend::new());
        let mut controller = controller(&backend);

        controller.edit_question("a".repeat(MAX_QUESTION_LENGTH + 1));
        assert!(!controller.can_submit());
        assert_eq!(controller.remaining_chars(), 0);

        controller.edit_question("a".repeat(MAX_QUESTION_LENGTH));
        assert!(controller.can_submit());
    }

    #[test]
    fn remaining_chars_counts_down() {
        let backend = Arc::new(MockAdvisoryBackend::new());
        let mut controller = controller(&backend);
        assert_eq!(controller.remaining_chars(), 500);
        controller.edit_question("héllo");
        assert_eq!(controller.remaining_chars(), 495);
    }

    #[tokio::test(start_paused = true)]
    async fn saas_pricing_scenario_reaches_advice() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(saas_session())
                .with_processing(1)
                .with_completed(saas_advice()),
        );
        let mut controller = probing(&backend).await;

        let session = controller.session().unwrap();
        assert_eq!(session.question(), "How should I price my SaaS product?");
        assert_eq!(session.current_question(), "Who are your customers?");
        assert_eq!(session.current_options(), ["SMBs", "Enterprises"]);

        assert_eq!(controller.choose_option("SMBs").await, Ok(SessionStep::Probing));
        assert_eq!(
            controller.choose_option("Under $20/month").await,
            Ok(SessionStep::Probing)
        );
        assert_eq!(backend.call_count(), 1);

        assert_eq!(
            controller.choose_option("This quarter").await,
            Ok(SessionStep::Advice)
        );
        assert_eq!(controller.advice(), saas_advice().as_slice());
        assert!(controller.error().is_none());
        assert!(!controller.is_busy());

        let calls = backend.calls();
        assert_eq!(
            calls[1],
            BackendCall::SubmitAnswers {
                session_id: SessionId::new("saas-1").unwrap(),
                answers: vec![
                    "SMBs".into(),
                    "Under $20/month".into(),
                    "This quarter".into()
                ],
            }
        );
        assert_eq!(backend.advice_request_count(), 2);
    }

    #[tokio::test]
    async fn not_found_on_submit_asks_user_to_start_over() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(saas_session())
                .with_submit_error(TransportError::status(404, Some("Session not found".into()))),
        );
        let mut controller = probing(&backend).await;

        controller.choose_option("SMBs").await.unwrap();
        controller.choose_option("Under $20/month").await.unwrap();
        let step = controller.choose_option("This quarter").await.unwrap();

        assert_eq!(step, SessionStep::Error);
        let err = controller.error().unwrap();
        assert_eq!(err.kind, AdvisoryErrorKind::NotFound);
        assert_eq!(err.message, MSG_NOT_FOUND);
        assert_eq!(backend.advice_request_count(), 0);
    }

    #[tokio::test]
    async fn create_failure_moves_to_error() {
        let backend = Arc::new(
            MockAdvisoryBackend::new().with_create_error(TransportError::status(503, None)),
        );
        let mut controller = controller(&backend);

        controller.edit_question("Should I open a second store?");
        assert_eq!(controller.submit_question().await, SessionStep::Error);
        assert_eq!(controller.error().unwrap().kind, AdvisoryErrorKind::ServerError);
        assert!(controller.session().is_none());
    }

    #[tokio::test]
    async fn session_without_probing_questions_is_an_error() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(MockAdvisoryBackend::session_response("empty", &[], &[])),
        );
        let mut controller = controller(&backend);

        controller.edit_question("Anything?");
        assert_eq!(controller.submit_question().await, SessionStep::Error);
        assert_eq!(controller.error().unwrap().kind, AdvisoryErrorKind::Unknown);
    }

    #[tokio::test]
    async fn short_option_list_shows_no_options() {
        let backend = Arc::new(MockAdvisoryBackend::new().with_session(
            MockAdvisoryBackend::session_response("s-2", &["First?", "Second?"], &[&["Yes", "No"]]),
        ));
        let mut controller = probing(&backend).await;

        controller.choose_option("Yes").await.unwrap();
        let session = controller.session().unwrap();
        assert_eq!(session.current_question(), "Second?");
        assert!(session.current_options().is_empty());
    }

    #[tokio::test]
    async fn no_input_accepted_while_awaiting_advice() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(MockAdvisoryBackend::session_response("s-3", &["Only?"], &[&["A"]])),
        );
        let mut controller = probing(&backend).await;

        let operation = controller.begin_answer("A").unwrap().unwrap();
        assert_eq!(controller.step(), SessionStep::AwaitingAdvice);
        assert!(controller.is_busy());
        assert!(!controller.step().accepts_input());

        assert!(controller.begin_answer("A").is_err());
        assert!(controller.begin_submit().is_none());
        assert!(!controller.edit_question("new question"));

        let completion = operation.execute(controller.client()).await;
        assert_eq!(
            controller.apply(completion),
            ApplyResult::Applied(SessionStep::Advice)
        );
    }

    #[tokio::test]
    async fn stale_create_result_is_discarded_after_reset() {
        let backend = Arc::new(MockAdvisoryBackend::new());
        let mut controller = controller(&backend);

        controller.edit_question("Should I raise prices?");
        let operation = controller.begin_submit().unwrap();
        controller.reset();

        let completion = operation.execute(controller.client()).await;
        assert_eq!(controller.apply(completion), ApplyResult::Discarded);
        assert_eq!(controller.step(), SessionStep::Question);
        assert!(controller.session().is_none());
        assert_eq!(controller.draft(), "");
    }

    #[tokio::test]
    async fn stale_poll_result_is_discarded_after_reset() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(MockAdvisoryBackend::session_response("s-4", &["Only?"], &[&["A"]])),
        );
        let mut controller = probing(&backend).await;

        let operation = controller.begin_answer("A").unwrap().unwrap();
        controller.reset();
        assert_eq!(controller.step(), SessionStep::Question);

        let completion = operation.execute(controller.client()).await;
        assert_eq!(controller.apply(completion), ApplyResult::Discarded);
        assert_eq!(controller.step(), SessionStep::Question);
        assert!(controller.advice().is_empty());
    }

    #[tokio::test]
    async fn reset_after_advice_clears_everything() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_session(MockAdvisoryBackend::session_response("s-5", &["Only?"], &[&["A"]])),
        );
        let mut controller = probing(&backend).await;
        assert_eq!(controller.choose_option("A").await, Ok(SessionStep::Advice));

        controller.reset();
        assert_eq!(controller.step(), SessionStep::Question);
        assert!(controller.session().is_none());
        assert!(controller.error().is_none());
        assert!(controller.advice().is_empty());
        assert!(!controller.can_submit());
    }

    #[tokio::test]
    async fn connectivity_warning_does_not_change_step() {
        let backend = Arc::new(
            MockAdvisoryBackend::new()
                .with_health_error(TransportError::no_response("connection refused")),
        );
        let controller = controller(&backend);

        let warning = controller.check_connectivity().await;
        assert!(warning.unwrap().contains("Network error"));
        assert_eq!(controller.step(), SessionStep::Question);
        assert_eq!(controller.check_connectivity().await, None);
    }

    proptest! {
        #[test]
        fn only_last_answer_triggers_network_calls(count in 1usize..6) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let questions: Vec<String> = (0..count).map(|i| format!("Q{}?", i)).collect();
                let refs: Vec<&str> = questions.iter().map(String::as_str).collect();
                let backend = Arc::new(
                    MockAdvisoryBackend::new()
                        .with_session(MockAdvisoryBackend::session_response("p-1", &refs, &[])),
                );
                let mut controller = probing(&backend).await;

                for i in 0..count - 1 {
                    let pending = controller.begin_answer(format!("A{}", i)).unwrap();
                    assert!(pending.is_none());
                    assert_eq!(backend.call_count(), 1);
                }
                let pending = controller.begin_answer("last").unwrap();
                assert!(pending.is_some());
                assert_eq!(controller.step(), SessionStep::AwaitingAdvice);
            });
        }
    }
}
