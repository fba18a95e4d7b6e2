//! Session aggregate entity.
//!
//! A session is one end-to-end advisory interaction: the user's question, the
//! backend's probing questions with their option-sets, the user's answers and,
//! eventually, the advice. It lives only in memory and is owned by the
//! session controller.

use crate::domain::advice::AdviceItem;
use crate::domain::foundation::{SessionId, Timestamp, ValidationError};

use super::ProbingAnswers;

/// Maximum length for the user's question, in characters.
pub const MAX_QUESTION_LENGTH: usize = 500;

/// Validates a user question and returns it trimmed.
///
/// # Errors
///
/// - `EmptyField` if the question is empty after trimming
/// - `TooLong` if the trimmed question exceeds [`MAX_QUESTION_LENGTH`]
pub fn validate_question(question: &str) -> Result<&str, ValidationError> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("user_question"));
    }
    let length = trimmed.chars().count();
    if length > MAX_QUESTION_LENGTH {
        return Err(ValidationError::too_long(
            "user_question",
            MAX_QUESTION_LENGTH,
            length,
        ));
    }
    Ok(trimmed)
}

/// Session aggregate.
///
/// # Invariants
///
/// - `question` is 1-500 characters, trimmed
/// - there is at least one probing question
/// - `answers` expects exactly one answer per probing question
/// - `advice` is empty until the backend completes the computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    question: String,
    probing_questions: Vec<String>,
    /// Parallel to `probing_questions`; may be shorter.
    probing_options: Vec<Vec<String>>,
    answers: ProbingAnswers,
    advice: Vec<AdviceItem>,
    created_at: Timestamp,
}

impl Session {
    /// Create a session from the backend's creation response.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `TooLong` if the question is invalid
    /// - `EmptyField` if the backend supplied no probing questions
    pub fn new(
        id: SessionId,
        question: &str,
        probing_questions: Vec<String>,
        probing_options: Vec<Vec<String>>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let question = validate_question(question)?.to_string();
        if probing_questions.is_empty() {
            return Err(ValidationError::empty_field("probing_questions"));
        }

        let answers = ProbingAnswers::new(probing_questions.len());
        Ok(Self {
            id,
            question,
            probing_questions,
            probing_options,
            answers,
            advice: Vec::new(),
            created_at,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn probing_questions(&self) -> &[String] {
        &self.probing_questions
    }

    pub fn question_count(&self) -> usize {
        self.probing_questions.len()
    }

    /// Options for the probing question at `index`.
    ///
    /// Empty when the backend sent fewer option-sets than questions.
    pub fn options_for(&self, index: usize) -> &[String] {
        self.probing_options
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Index of the probing question currently shown.
    ///
    /// Stays on the last index once every question is answered.
    pub fn current_index(&self) -> usize {
        self.answers
            .next_index()
            .min(self.question_count().saturating_sub(1))
    }

    /// The probing question currently shown.
    pub fn current_question(&self) -> &str {
        &self.probing_questions[self.current_index()]
    }

    /// Options for the probing question currently shown.
    pub fn current_options(&self) -> &[String] {
        self.options_for(self.current_index())
    }

    pub fn answers(&self) -> &ProbingAnswers {
        &self.answers
    }

    pub fn advice(&self) -> &[AdviceItem] {
        &self.advice
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Record an answer for the current probing question.
    ///
    /// Returns `true` when this was the last unanswered question.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if every question is already answered
    pub fn answer_current(&mut self, answer: impl Into<String>) -> Result<bool, ValidationError> {
        let index = self.answers.next_index();
        self.answers.record(index, answer)
    }

    /// Attach the advice returned by the backend.
    pub fn complete_with(&mut self, advice: Vec<AdviceItem>) {
        self.advice = advice;
    }
}
