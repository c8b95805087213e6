//! Input surfaces - one stdin line per page event.
//!
//! Format: `<surface> [args]`. Indices are 1-based here and converted to
//! positions before they reach the registries.

use sanad_common::safety::Feature;
use sanad_common::{DeviceKind, SanadError};
use std::str::FromStr;

/// Where a single-shot recognition result goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenTarget {
    /// Plain voice control, echoes the command
    VoiceControl,
    Gesture,
    Device,
}

/// Profile map addressed by `profile set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSection {
    Preferences,
    Needs,
    Progress,
}

impl FromStr for ProfileSection {
    type Err = SanadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preferences" => Ok(Self::Preferences),
            "needs" => Ok(Self::Needs),
            "progress" => Ok(Self::Progress),
            other => Err(SanadError::UnknownSurface(format!("profile set {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Utterance heard by the continuous navigation listener
    Say(String),
    Listen { target: ListenTarget, text: String },
    Gesture(String),
    Device(String),
    Register { id: String, kind: DeviceKind },
    Unregister(usize),
    Safety(bool),
    Watch { feature: Feature, on: bool },
    AddContact { name: String, phone: String },
    RemoveContact(usize),
    Ask { text: String, glyph: Option<String> },
    Read(String),
    Sign(String),
    Translate,
    Describe,
    Emergency,
    ShareLocation,
    Contrast(bool),
    LargeText(bool),
    Help(Option<String>),
    Back,
    ProfileCreate(String),
    ProfileSet {
        user_id: String,
        section: ProfileSection,
        key: String,
        value: String,
    },
    Status,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<PageEvent>, SanadError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (surface, rest) = match line.split_once(char::is_whitespace) {
        Some((surface, rest)) => (surface, rest.trim()),
        None => (line, ""),
    };

    let event = match surface {
        "say" => PageEvent::Say(rest.to_string()),
        "listen" => parse_listen(rest),
        "gesture" => PageEvent::Gesture(rest.to_string()),
        "device" => PageEvent::Device(rest.to_string()),
        "register" => parse_register(rest)?,
        "unregister" => PageEvent::Unregister(parse_index(rest)?),
        "safety" => PageEvent::Safety(parse_switch(line, rest)?),
        "obstacle" => watch(Feature::Obstacle, line, rest)?,
        "fall" => watch(Feature::Fall, line, rest)?,
        "location" => watch(Feature::Location, line, rest)?,
        "contact" => parse_contact(line, rest)?,
        "ask" => parse_ask(rest),
        "read" => PageEvent::Read(rest.to_string()),
        "sign" => PageEvent::Sign(rest.to_string()),
        "translate" => PageEvent::Translate,
        "describe" => PageEvent::Describe,
        "emergency" => PageEvent::Emergency,
        "share-location" => PageEvent::ShareLocation,
        "contrast" => PageEvent::Contrast(parse_switch(line, rest)?),
        "large-text" => PageEvent::LargeText(parse_switch(line, rest)?),
        "help" => PageEvent::Help((!rest.is_empty()).then(|| rest.to_string())),
        "back" => PageEvent::Back,
        "profile" => parse_profile(line, rest)?,
        "status" => PageEvent::Status,
        "quit" | "exit" => PageEvent::Quit,
        _ => return Err(SanadError::UnknownSurface(surface.to_string())),
    };
    Ok(Some(event))
}

fn parse_switch(line: &str, arg: &str) -> Result<bool, SanadError> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(SanadError::UnknownSurface(line.to_string())),
    }
}

fn watch(feature: Feature, line: &str, arg: &str) -> Result<PageEvent, SanadError> {
    Ok(PageEvent::Watch {
        feature,
        on: parse_switch(line, arg)?,
    })
}

/// 1-based surface index to a position
fn parse_index(arg: &str) -> Result<usize, SanadError> {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or(SanadError::EmptyInput("index"))
}

fn parse_listen(rest: &str) -> PageEvent {
    let (target, text) = match rest.split_once(char::is_whitespace) {
        Some(("gesture", text)) => (ListenTarget::Gesture, text),
        Some(("device", text)) => (ListenTarget::Device, text),
        _ if rest == "gesture" => (ListenTarget::Gesture, ""),
        _ if rest == "device" => (ListenTarget::Device, ""),
        _ => (ListenTarget::VoiceControl, rest),
    };
    PageEvent::Listen {
        target,
        text: text.trim().to_string(),
    }
}

fn parse_register(rest: &str) -> Result<PageEvent, SanadError> {
    let mut parts = rest.split_whitespace();
    let id = parts.next().ok_or(SanadError::EmptyInput("device_id"))?;
    let kind = parts
        .next()
        .ok_or_else(|| SanadError::UnknownDeviceType(String::new()))?
        .parse::<DeviceKind>()?;
    Ok(PageEvent::Register {
        id: id.to_string(),
        kind,
    })
}

fn parse_contact(line: &str, rest: &str) -> Result<PageEvent, SanadError> {
    let (action, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let args = args.trim();
    match action {
        "add" => {
            // phone is the last word, the name may contain spaces
            let (name, phone) = args
                .rsplit_once(char::is_whitespace)
                .ok_or(SanadError::EmptyInput("contact_phone"))?;
            Ok(PageEvent::AddContact {
                name: name.trim().to_string(),
                phone: phone.trim().to_string(),
            })
        }
        "remove" => Ok(PageEvent::RemoveContact(parse_index(args)?)),
        _ => Err(SanadError::UnknownSurface(line.to_string())),
    }
}

fn parse_ask(rest: &str) -> PageEvent {
    match rest.split_once('|') {
        Some((text, glyph)) => PageEvent::Ask {
            text: text.trim().to_string(),
            glyph: Some(glyph.trim().to_string()).filter(|g| !g.is_empty()),
        },
        None => PageEvent::Ask {
            text: rest.to_string(),
            glyph: None,
        },
    }
}

fn parse_profile(line: &str, rest: &str) -> Result<PageEvent, SanadError> {
    let parts: Vec<&str> = rest.split_whitespace().collect();
    match parts.as_slice() {
        ["create", user_id] => Ok(PageEvent::ProfileCreate(user_id.to_string())),
        ["set", user_id, section, key, value @ ..] if !value.is_empty() => {
            Ok(PageEvent::ProfileSet {
                user_id: user_id.to_string(),
                section: section.parse()?,
                key: key.to_string(),
                value: value.join(" "),
            })
        }
        _ => Err(SanadError::UnknownSurface(line.to_string())),
    }
}
