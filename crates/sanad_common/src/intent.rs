//! Intent classification - free text to what the user wants.
//!
//! Keyword substring matching over a fixed, ordered table. No scoring.

use crate::keywords::{KeywordEntry, KeywordTable};
use serde::{Deserialize, Serialize};

/// User intent inferred from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Asking for assistance
    Help,
    /// Wants to go somewhere or open something
    Navigation,
    /// Wants something explained
    Information,
    /// Wants to operate a feature or device
    Control,
    /// Expresses frustration, fatigue or sadness
    EmotionalSupport,
    /// Asks to be encouraged. Not produced by the built-in keyword table,
    /// only reachable when a caller supplies the intent directly.
    Motivation,
    /// Nothing matched
    General,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Help => "help",
            Self::Navigation => "navigation",
            Self::Information => "information",
            Self::Control => "control",
            Self::EmotionalSupport => "emotional_support",
            Self::Motivation => "motivation",
            Self::General => "general",
        };
        write!(f, "{}", s)
    }
}

impl Intent {
    /// Parse from the label string used on the CLI
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "help" => Some(Self::Help),
            "navigation" => Some(Self::Navigation),
            "information" => Some(Self::Information),
            "control" => Some(Self::Control),
            "emotional_support" => Some(Self::EmotionalSupport),
            "motivation" => Some(Self::Motivation),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

const INTENT_KEYWORDS: &[KeywordEntry<Intent>] = &[
    (Intent::Help, &["مساعدة", "أريد مساعدة", "ممكن", "هل يمكنك"]),
    (Intent::Navigation, &["اذهب", "انتقل", "افتح", "تحرك"]),
    (Intent::Information, &["أخبرني", "اشرح", "معلومات", "تفسير"]),
    (Intent::Control, &["تحكم", "شغل", "أوقف", "تفعيل"]),
    (Intent::EmotionalSupport, &["محبط", "متعب", "مرهق", "حزين"]),
];

/// Built-in intent table, fallback `General`
pub const INTENT_TABLE: KeywordTable<Intent> = KeywordTable::new(INTENT_KEYWORDS, Intent::General);

/// Maps free text to an [`Intent`].
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    table: KeywordTable<Intent>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self { table: INTENT_TABLE }
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify(&self, input: &str) -> Intent {
        self.table.classify(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_label_reachable() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("هل يمكنك أن تساعدني"), Intent::Help);
        assert_eq!(c.classify("افتح الصفحة"), Intent::Navigation);
        assert_eq!(c.classify("أخبرني عن الطقس"), Intent::Information);
        assert_eq!(c.classify("شغل الضوء"), Intent::Control);
        assert_eq!(c.classify("أنا حزين اليوم"), Intent::EmotionalSupport);
    }

    #[test]
    fn test_help_beats_later_labels() {
        // "مساعدة" (help) and "اشرح" (information) both present
        let c = IntentClassifier::new();
        assert_eq!(c.classify("اشرح لي كيف أطلب مساعدة"), Intent::Help);
    }

    #[test]
    fn test_general_fallback() {
        let c = IntentClassifier::new();
        assert_eq!(c.classify("السلام عليكم"), Intent::General);
        assert_eq!(c.classify(""), Intent::General);
        assert_eq!(c.classify("hello there"), Intent::General);
    }

    #[test]
    fn test_motivation_never_from_table() {
        assert!(INTENT_TABLE
            .entries()
            .iter()
            .all(|(label, _)| *label != Intent::Motivation));
    }

    #[test]
    fn test_label_roundtrip() {
        for intent in [Intent::Help, Intent::EmotionalSupport, Intent::Motivation] {
            assert_eq!(Intent::from_label(&intent.to_string()), Some(intent));
        }
        assert_eq!(Intent::from_label("dance"), None);
    }
}
