//! Ordered keyword tables.
//!
//! Every classifier in Sanad is the same first-match substring scan over an
//! explicitly ordered list of `(label, keywords)` pairs. Table order is part
//! of the contract: when a text contains keywords of two labels, the label
//! listed first wins.

/// One row of a keyword table.
pub type KeywordEntry<L> = (L, &'static [&'static str]);

/// Normalize free text before matching.
///
/// Lower-casing is a no-op for Arabic script but keeps Latin input from
/// mixed-script transcripts comparable to the tables.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Return the first label (in table order) whose keyword list has a
/// substring match in `normalized`, together with the matching keyword.
pub fn first_match<L: Copy>(
    entries: &[KeywordEntry<L>],
    normalized: &str,
) -> Option<(L, &'static str)> {
    entries.iter().find_map(|(label, keywords)| {
        keywords
            .iter()
            .find(|keyword| normalized.contains(*keyword))
            .map(|keyword| (*label, *keyword))
    })
}

/// An ordered keyword table with a reserved fallback label.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable<L: 'static> {
    entries: &'static [KeywordEntry<L>],
    fallback: L,
}

impl<L: Copy> KeywordTable<L> {
    pub const fn new(entries: &'static [KeywordEntry<L>], fallback: L) -> Self {
        Self { entries, fallback }
    }

    /// Classify `text` into exactly one label.
    pub fn classify(&self, text: &str) -> L {
        self.lookup(text)
            .map(|(label, _)| label)
            .unwrap_or(self.fallback)
    }

    /// Like [`classify`](Self::classify) but reports the keyword that matched,
    /// or `None` when the fallback applies.
    pub fn lookup(&self, text: &str) -> Option<(L, &'static str)> {
        first_match(self.entries, &normalize(text))
    }

    pub fn entries(&self) -> &'static [KeywordEntry<L>] {
        self.entries
    }

    pub fn fallback(&self) -> L {
        self.fallback
    }
}
