//! Application layer - advisory client and session controller.
//!
//! Coordinates the domain with the advisory backend port. The client owns
//! every network concern; the controller owns every step transition.

pub mod advisory_client;
pub mod errors;
pub mod session_controller;

pub use advisory_client::{AdvisoryClient, CreatedSession, PollSettings, RequestOutcome, SubmitAck};
pub use errors::{AdvisoryError, AdvisoryErrorKind};
pub use session_controller::{
    ApplyResult, Completion, CompletionOutcome, OperationTag, PendingOperation, SessionController,
};
