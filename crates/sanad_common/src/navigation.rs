//! Voice navigation between the support pages.

use crate::keywords::{self, KeywordEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    Hearing,
    Visual,
    Motor,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "index.html",
            Page::Hearing => "hearing.html",
            Page::Visual => "visual.html",
            Page::Motor => "motor.html",
        }
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

const NAVIGATION_COMMANDS: &[KeywordEntry<Page>] = &[
    (Page::Hearing, &["الإعاقة السمعية"]),
    (Page::Visual, &["الإعاقة البصرية"]),
    (Page::Motor, &["الإعاقة الحركية"]),
];

/// Page named by a recognized transcript, if any
pub fn route_navigation(transcript: &str) -> Option<Page> {
    let normalized = keywords::normalize(transcript.trim());
    keywords::first_match(NAVIGATION_COMMANDS, &normalized).map(|(page, _)| page)
}
