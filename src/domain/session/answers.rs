//! Probing answers collected one question at a time.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::domain::foundation::ValidationError;

/// The user's selections for a session's probing questions.
///
/// # Invariants
///
/// - answers are recorded in index order starting at 0, one per index
/// - at most `expected` answers are ever recorded
/// - once complete, no further answers are accepted
///
/// Serializes as a JSON object keyed by the decimal index:
/// `{"0": "...", "1": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbingAnswers {
    expected: usize,
    answers: Vec<String>,
}

impl ProbingAnswers {
    /// Creates an empty answer set for `expected` probing questions.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            answers: Vec::with_capacity(expected),
        }
    }

    /// Records `answer` under `index`.
    ///
    /// Returns `true` when this answer completed the set.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the set is already complete or `index` is not
    ///   the next unanswered index
    pub fn record(&mut self, index: usize, answer: impl Into<String>) -> Result<bool, ValidationError> {
        if self.is_complete() {
            return Err(ValidationError::invalid_format(
                "probing_answers",
                "all probing questions are already answered",
            ));
        }
        if index != self.answers.len() {
            return Err(ValidationError::invalid_format(
                "answer_index",
                format!("expected {}, got {}", self.answers.len(), index),
            ));
        }
        self.answers.push(answer.into());
        Ok(self.is_complete())
    }

    /// Index of the next question awaiting an answer.
    pub fn next_index(&self) -> usize {
        self.answers.len()
    }

    /// Number of probing questions this set answers.
    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True once every probing question has an answer.
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.expected
    }

    /// Returns the answer recorded for `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    /// Iterates `(index, answer)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.answers.iter().enumerate().map(|(i, a)| (i, a.as_str()))
    }
}

impl Serialize for ProbingAnswers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.answers.len()))?;
        for (index, answer) in self.iter() {
            map.serialize_entry(&index.to_string(), answer)?;
        }
        map.end()
    }
}
