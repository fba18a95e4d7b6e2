//! Fixed persona roster and advice attribution.

use super::AdviceItem;

/// A fixed advisory voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    /// Confidence shown before the backend reports one.
    pub default_confidence: &'static str,
}

/// The advisory board, in display order.
pub static ROSTER: [Persona; 3] = [
    Persona {
        id: "jeff_bezos",
        name: "Jeff Bezos",
        title: "Amazon Founder",
        default_confidence: "94.7%",
    },
    Persona {
        id: "steve_jobs",
        name: "Steve Jobs",
        title: "Apple Co-founder",
        default_confidence: "96.2%",
    },
    Persona {
        id: "elon_musk",
        name: "Elon Musk",
        title: "Tesla & SpaceX CEO",
        default_confidence: "92.8%",
    },
];

/// Result of resolving a backend persona name against the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaMatch {
    Known(&'static Persona),
    /// Name not on the roster. Never guessed by position.
    Unknown(String),
}

impl PersonaMatch {
    pub fn is_known(&self) -> bool {
        matches!(self, PersonaMatch::Known(_))
    }
}

/// Matches `name` to a roster persona by display name or id, ignoring case
/// and surrounding whitespace.
pub fn match_persona(name: &str) -> PersonaMatch {
    let needle = name.trim();
    ROSTER
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(needle) || p.id.eq_ignore_ascii_case(needle))
        .map(PersonaMatch::Known)
        .unwrap_or_else(|| PersonaMatch::Unknown(needle.to_string()))
}

/// Pairs every advice item with its persona, preserving backend order.
pub fn attribute(advice: &[AdviceItem]) -> Vec<(PersonaMatch, &AdviceItem)> {
    advice.iter().map(|item| (item.persona_match(), item)).collect()
}
