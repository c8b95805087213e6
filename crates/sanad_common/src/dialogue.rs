//! Dialogue strategy selection and the multimodal assistant.
//!
//! Combines intent, mood and glyph context into one canned reply. The
//! policy is a fixed priority list, evaluated top to bottom:
//! 1. stressed mood -> supportive
//! 2. motivation intent -> motivational
//! 3. anything else -> informative

use crate::glyph::{self, GlyphContext};
use crate::intent::{Intent, IntentClassifier};
use crate::mood::{Mood, MoodClassifier};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Response template identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Supportive,
    Motivational,
    Informative,
}

impl Strategy {
    /// The fixed response for this template
    pub fn response(&self) -> &'static str {
        match self {
            Strategy::Supportive => "أنا هنا لمساعدتك في كل شيء",
            Strategy::Motivational => "أنت قوي وقادر على تحقيق أهدافك",
            Strategy::Informative => "دعني أساعدك في فهم المزيد",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Supportive => "supportive",
            Self::Motivational => "motivational",
            Self::Informative => "informative",
        };
        write!(f, "{}", s)
    }
}

pub fn select_strategy(intent: Intent, mood: Mood) -> Strategy {
    if mood == Mood::Stressed {
        return Strategy::Supportive;
    }
    if intent == Intent::Motivation {
        return Strategy::Motivational;
    }
    Strategy::Informative
}

/// Everything the assistant inferred for one interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub intent: Intent,
    pub mood: Mood,
    pub glyph_context: GlyphContext,
    pub strategy: Strategy,
    pub text: String,
}

/// Text + glyph in, canned empathetic reply out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Assistant {
    intents: IntentClassifier,
    moods: MoodClassifier,
}

impl Assistant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interact(&self, text: &str, glyph_token: Option<&str>) -> AssistantReply {
        let intent = self.intents.classify(text);
        let mood = self.moods.assess(text);
        self.reply_for(intent, mood, glyph_token)
    }

    /// Build a reply from already known labels. Used when the caller
    /// supplies an intent the keyword table cannot produce.
    pub fn reply_for(&self, intent: Intent, mood: Mood, glyph_token: Option<&str>) -> AssistantReply {
        let glyph_context = glyph_token.map(glyph::interpret).unwrap_or(GlyphContext::Neutral);
        let strategy = select_strategy(intent, mood);
        debug!(
            "Assistant: intent={} mood={} glyph={} -> {}",
            intent, mood, glyph_context, strategy
        );

        AssistantReply {
            intent,
            mood,
            glyph_context,
            strategy,
            text: strategy.response().to_string(),
        }
    }
}
