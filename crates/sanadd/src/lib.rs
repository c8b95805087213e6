//! Sanad daemon library - the page runtime, exposed for testing.

pub mod app;
pub mod input;
pub mod platform;
pub mod speech;
