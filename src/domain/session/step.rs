//! SessionStep enum for tracking where the user is in the advisory flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Step of the advisory flow.
///
/// ```text
/// Question --> Probing --> AwaitingAdvice --> Advice
///     \           \              \
///      +-----------+--------------+--> Error
///
/// Advice | Error | Probing | AwaitingAdvice --[reset]--> Question
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    #[default]
    Question,
    Probing,
    AwaitingAdvice,
    Advice,
    Error,
}

impl SessionStep {
    /// Returns true if the user may edit or select anything in this step.
    pub fn accepts_input(&self) -> bool {
        matches!(self, SessionStep::Question | SessionStep::Probing)
    }
}

impl StateMachine for SessionStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStep::*;
        matches!(
            (self, target),
            (Question, Probing)
                | (Question, Error)
                | (Probing, AwaitingAdvice)
                | (Probing, Error)
                | (Probing, Question)
                | (AwaitingAdvice, Advice)
                | (AwaitingAdvice, Error)
                | (AwaitingAdvice, Question)
                | (Advice, Question)
                | (Error, Question)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStep::*;
        match self {
            Question => vec![Probing, Error],
            Probing => vec![AwaitingAdvice, Error, Question],
            AwaitingAdvice => vec![Advice, Error, Question],
            Advice => vec![Question],
            Error => vec![Question],
        }
    }
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStep::Question => "Question",
            SessionStep::Probing => "Probing",
            SessionStep::AwaitingAdvice => "AwaitingAdvice",
            SessionStep::Advice => "Advice",
            SessionStep::Error => "Error",
        };
        write!(f, "{}", s)
    }
}
