//! Terminal output helpers.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Label line: `[LABEL] detail`
pub fn label(name: &str, value: impl std::fmt::Display, detail: Option<&str>) {
    match detail {
        Some(detail) => println!("{} {} {}", format!("[{}]", name).cyan(), value.bold(), detail.dimmed()),
        None => println!("{} {}", format!("[{}]", name).cyan(), value.bold()),
    }
}

pub fn message(text: &str) {
    println!("{}", text.green());
}

pub fn detail(text: impl std::fmt::Display) {
    println!("  {}", text.dimmed());
}

pub fn warning(text: &str) {
    println!("[WARNING] {}", text.yellow());
}

pub fn json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
