//! Session domain module.
//!
//! Holds the in-memory advisory session and the step machine the
//! controller drives it through.

mod aggregate;
mod answers;
mod step;

pub use aggregate::{validate_question, Session, MAX_QUESTION_LENGTH};
pub use answers::ProbingAnswers;
pub use step::SessionStep;
