//! Gesture glyph interpretation.
//!
//! Unlike the text classifiers, glyph tokens match by exact equality: a
//! glyph is a whole token picked from a palette, not a phrase inside text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphContext {
    Positive,
    Help,
    Communication,
    Neutral,
}

impl std::fmt::Display for GlyphContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Positive => "positive",
            Self::Help => "help",
            Self::Communication => "communication",
            Self::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

const GLYPHS: &[(GlyphContext, &[&str])] = &[
    (GlyphContext::Positive, &["👍", "✅", "🌟"]),
    (GlyphContext::Help, &["🆘", "🤲", "🤝"]),
    (GlyphContext::Communication, &["🗣️", "💬", "👋"]),
];

/// Interpret a single glyph token. Surrounding whitespace is ignored.
pub fn interpret(token: &str) -> GlyphContext {
    let token = token.trim();
    GLYPHS
        .iter()
        .find(|(_, glyphs)| glyphs.contains(&token))
        .map(|(context, _)| *context)
        .unwrap_or(GlyphContext::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_glyphs() {
        assert_eq!(interpret("👍"), GlyphContext::Positive);
        assert_eq!(interpret(" 🆘 "), GlyphContext::Help);
        assert_eq!(interpret("👋"), GlyphContext::Communication);
    }

    #[test]
    fn test_exact_match_only() {
        // A glyph embedded in text is not a token
        assert_eq!(interpret("👍 ok"), GlyphContext::Neutral);
        assert_eq!(interpret(""), GlyphContext::Neutral);
    }
}
