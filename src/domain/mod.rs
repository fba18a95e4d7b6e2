//! Domain layer containing the advisory session model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, errors, state machine)
//! - `session` - Advisory session aggregate, probing answers and flow steps
//! - `advice` - Advice items and the persona roster

pub mod advice;
pub mod foundation;
pub mod session;
