//! Sanad Control - one-shot CLI over the assistant logic
//!
//! Classifies text, renders gestures and replays device command scripts
//! without starting the page runtime.

mod output;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use sanad_common::assistance;
use sanad_common::glyph;
use sanad_common::intent::INTENT_TABLE;
use sanad_common::mood::MOOD_TABLE;
use sanad_common::{
    Assistant, DeviceCommandRouter, DeviceKind, DeviceRegistry, GestureResolver, Intent, Mood,
};
use serde_json::json;

#[derive(Parser)]
#[command(name = "sanadctl")]
#[command(about = "Sanad - accessibility assistant tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Machine-readable JSON output
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify the intent of a text
    Classify { text: String },

    /// Assess the mood of a text
    Mood { text: String },

    /// Assistant reply for a text and optional glyph
    Respond {
        text: String,

        /// Gesture glyph token, e.g. 🆘
        #[arg(long)]
        glyph: Option<String>,

        /// Override the classified intent (e.g. motivation)
        #[arg(long)]
        intent: Option<String>,

        /// Override the assessed mood
        #[arg(long)]
        mood: Option<String>,
    },

    /// Translate a command into a gesture animation
    Gesture { text: String },

    /// Interpret a single glyph token
    Glyph { token: String },

    /// Replay device commands against a fresh registry
    Device {
        /// Register a device first, as id:type (repeatable)
        #[arg(long = "register", value_name = "ID:TYPE")]
        registrations: Vec<String>,

        /// Voice commands, applied in order
        commands: Vec<String>,
    },

    /// Contextual help tip (motor, hearing, visual)
    HelpTopic { context: String },

    /// Convert text to a sign-language message
    Sign { text: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { text } => classify(&text, cli.json),
        Commands::Mood { text } => mood(&text, cli.json),
        Commands::Respond {
            text,
            glyph,
            intent,
            mood,
        } => respond(&text, glyph.as_deref(), intent.as_deref(), mood.as_deref(), cli.json),
        Commands::Gesture { text } => gesture(&text, cli.json),
        Commands::Glyph { token } => glyph_context(&token, cli.json),
        Commands::Device {
            registrations,
            commands,
        } => device(&registrations, &commands, cli.json),
        Commands::HelpTopic { context } => {
            let tip = assistance::help_for(&context);
            if cli.json {
                return output::json(&json!({ "context": context, "help": tip }));
            }
            output::message(tip);
            Ok(())
        }
        Commands::Sign { text } => {
            let message = match assistance::text_to_sign(&text) {
                Ok(message) => message,
                Err(e) => bail!(e.user_message()),
            };
            if cli.json {
                return output::json(&json!({ "text": text, "message": message }));
            }
            output::message(&message);
            Ok(())
        }
    }
}

fn classify(text: &str, json: bool) -> Result<()> {
    let matched = INTENT_TABLE.lookup(text);
    let intent = matched.map(|(i, _)| i).unwrap_or(INTENT_TABLE.fallback());
    let keyword = matched.map(|(_, k)| k);

    if json {
        return output::json(&json!({ "input": text, "intent": intent, "keyword": keyword }));
    }
    output::label("INTENT", intent, keyword.map(|k| format!("(matched \"{}\")", k)).as_deref());
    Ok(())
}

fn mood(text: &str, json: bool) -> Result<()> {
    let matched = MOOD_TABLE.lookup(text);
    let mood = matched.map(|(m, _)| m).unwrap_or(MOOD_TABLE.fallback());
    let keyword = matched.map(|(_, k)| k);

    if json {
        return output::json(&json!({ "input": text, "mood": mood, "keyword": keyword }));
    }
    output::label("MOOD", mood, keyword.map(|k| format!("(matched \"{}\")", k)).as_deref());
    Ok(())
}

fn respond(
    text: &str,
    glyph: Option<&str>,
    intent: Option<&str>,
    mood: Option<&str>,
    json: bool,
) -> Result<()> {
    let intent = match intent {
        Some(label) => match Intent::from_label(label) {
            Some(intent) => intent,
            None => bail!("Unknown intent: {}", label),
        },
        None => INTENT_TABLE.classify(text),
    };
    let mood = match mood {
        Some(label) => match Mood::from_label(label) {
            Some(mood) => mood,
            None => bail!("Unknown mood: {}", label),
        },
        None => MOOD_TABLE.classify(text),
    };

    let reply = Assistant::new().reply_for(intent, mood, glyph);
    if json {
        return output::json(&serde_json::to_value(&reply)?);
    }
    output::label("INTENT", reply.intent, None);
    output::label("MOOD", reply.mood, None);
    output::label("GLYPH", reply.glyph_context, None);
    output::label("STRATEGY", reply.strategy, None);
    output::message(&reply.text);
    Ok(())
}

fn gesture(text: &str, json: bool) -> Result<()> {
    let response = GestureResolver::new().translate(text);
    if json {
        return output::json(&serde_json::to_value(&response)?);
    }
    output::label("GESTURE", response.label, None);
    output::message(&response.message);
    for directive in &response.directives {
        output::detail(directive);
    }
    Ok(())
}

fn glyph_context(token: &str, json: bool) -> Result<()> {
    let context = glyph::interpret(token);
    if json {
        return output::json(&json!({ "glyph": token, "context": context }));
    }
    output::label("GLYPH", context, None);
    Ok(())
}

/// Split `id:type` on the last colon so ids may contain colons
fn parse_registration(spec: &str) -> Result<(&str, DeviceKind)> {
    let Some((id, kind)) = spec.rsplit_once(':') else {
        bail!("Expected ID:TYPE, got {}", spec);
    };
    match kind.parse::<DeviceKind>() {
        Ok(kind) => Ok((id, kind)),
        Err(e) => bail!("{}: {}", e, e.user_message()),
    }
}

fn device(registrations: &[String], commands: &[String], json: bool) -> Result<()> {
    let mut registry = DeviceRegistry::new();
    let router = DeviceCommandRouter::new();
    let mut messages = Vec::new();

    for spec in registrations {
        let (id, kind) = parse_registration(spec)?;
        if let Err(e) = registry.register(id, kind) {
            if !json {
                output::warning(&e.user_message());
            }
            messages.push(e.user_message());
        }
    }

    for command in commands {
        let message = router.process(&mut registry, command);
        if !json {
            output::message(&message);
        }
        messages.push(message);
    }

    if json {
        return output::json(&json!({
            "devices": registry.devices(),
            "messages": messages,
            "state": registry.states(),
        }));
    }

    for (i, d) in registry.devices().iter().enumerate() {
        output::detail(format!("{}. {} ({})", i + 1, d.id, d.kind));
    }
    let states = registry.states();
    output::detail(format!(
        "tv: power={} volume={} channel={}",
        states.tv.power, states.tv.volume, states.tv.channel
    ));
    output::detail(format!(
        "ac: power={} temperature={} mode={}",
        states.ac.power, states.ac.temperature, states.ac.mode
    ));
    output::detail(format!(
        "washing-machine: power={} running={} program={}",
        states.washing_machine.power, states.washing_machine.running, states.washing_machine.program
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registration() {
        assert_eq!(parse_registration("tv1:tv").unwrap(), ("tv1", DeviceKind::Tv));
        assert_eq!(
            parse_registration("room:2:washing-machine").unwrap(),
            ("room:2", DeviceKind::WashingMachine)
        );
        assert!(parse_registration("tv1").is_err());
        assert!(parse_registration("tv1:fridge").is_err());
    }

    #[test]
    fn test_cli_parses_device_script() {
        let cli = Cli::try_parse_from([
            "sanadctl",
            "device",
            "--register",
            "tv1:tv",
            "رفع صوت التلفاز",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Device {
                registrations,
                commands,
            } => {
                assert_eq!(registrations, vec!["tv1:tv"]);
                assert_eq!(commands, vec!["رفع صوت التلفاز"]);
            }
            _ => panic!("expected device command"),
        }
    }

    #[test]
    fn test_cli_respond_overrides() {
        let cli = Cli::try_parse_from(["sanadctl", "respond", "نص", "--intent", "motivation"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Respond { intent: Some(ref i), .. } if i == "motivation"
        ));
    }
}
