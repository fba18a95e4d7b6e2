//! A single persona's advice.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{match_persona, PersonaMatch};

/// Advice attributed to one persona.
///
/// Produced only by the backend; read-only to the client. `confidence` is an
/// opaque display string such as `"94.7%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceItem {
    /// Persona identifier as sent by the backend (usually the display name).
    #[serde(rename = "innovator")]
    pub persona: String,
    /// Persona display title.
    pub title: String,
    pub confidence: String,
    #[serde(rename = "advice_text")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<Timestamp>,
}

impl AdviceItem {
    pub fn new(
        persona: impl Into<String>,
        title: impl Into<String>,
        confidence: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            persona: persona.into(),
            title: title.into(),
            confidence: confidence.into(),
            text: text.into(),
            generated_at: None,
        }
    }

    /// Resolves this item against the persona roster.
    pub fn persona_match(&self) -> PersonaMatch {
        match_persona(&self.persona)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_backend_shape() {
        let item: AdviceItem = serde_json::from_value(json!({
            "innovator": "Steve Jobs",
            "title": "Apple Co-founder",
            "confidence": "96.2%",
            "advice_text": "Make something people love.",
            "generated_at": "2024-05-01T12:00:00.5"
        }))
        .unwrap();

        assert_eq!(item.persona, "Steve Jobs");
        assert_eq!(item.text, "Make something people love.");
        assert!(item.generated_at.is_some());
    }

    #[test]
    fn generated_at_is_optional() {
        let item: AdviceItem = serde_json::from_value(json!({
            "innovator": "X",
            "title": "Y",
            "confidence": "n/a",
            "advice_text": "Z"
        }))
        .unwrap();
        assert_eq!(item.generated_at, None);
    }

    #[test]
    fn confidence_is_kept_verbatim() {
        let item = AdviceItem::new("Elon Musk", "CEO", "92.80 %", "Go to Mars.");
        assert_eq!(item.confidence, "92.80 %");
    }
}
