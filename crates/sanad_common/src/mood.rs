//! Mood classification used to pick a response tone.

use crate::keywords::{KeywordEntry, KeywordTable};
use serde::{Deserialize, Serialize};

/// Inferred emotional state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Stressed,
    Motivated,
    Neutral,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Stressed => "stressed",
            Self::Motivated => "motivated",
            Self::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

impl Mood {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stressed" => Some(Self::Stressed),
            "motivated" => Some(Self::Motivated),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

const MOOD_KEYWORDS: &[KeywordEntry<Mood>] = &[
    (Mood::Stressed, &["صعب", "مرهق", "متعب"]),
    (Mood::Motivated, &["أريد", "سأحاول", "طموح"]),
    (Mood::Neutral, &["عادي", "بخير"]),
];

pub const MOOD_TABLE: KeywordTable<Mood> = KeywordTable::new(MOOD_KEYWORDS, Mood::Neutral);

#[derive(Debug, Clone, Copy)]
pub struct MoodClassifier {
    table: KeywordTable<Mood>,
}

impl Default for MoodClassifier {
    fn default() -> Self {
        Self { table: MOOD_TABLE }
    }
}

impl MoodClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assess(&self, input: &str) -> Mood {
        self.table.classify(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stressed_wins_over_motivated() {
        let m = MoodClassifier::new();
        assert_eq!(m.assess("أريد أن أرتاح، اليوم صعب"), Mood::Stressed);
    }

    #[test]
    fn test_motivated() {
        let m = MoodClassifier::new();
        assert_eq!(m.assess("سأحاول مرة أخرى"), Mood::Motivated);
    }

    #[test]
    fn test_neutral_by_keyword_and_fallback() {
        let m = MoodClassifier::new();
        assert_eq!(m.assess("أنا بخير"), Mood::Neutral);
        assert_eq!(m.assess("الجو جميل"), Mood::Neutral);
        assert_eq!(m.assess(""), Mood::Neutral);
    }
}
