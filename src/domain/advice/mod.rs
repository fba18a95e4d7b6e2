//! Advice domain module.
//!
//! Advice items produced by the backend and the fixed persona roster they
//! are attributed to.

mod item;
mod persona;

pub use item::AdviceItem;
pub use persona::{attribute, match_persona, Persona, PersonaMatch, ROSTER};
