//! Sanad Common - Shared logic for the Sanad accessibility assistant
//!
//! Keyword classification, dialogue strategy, gesture animation, device
//! control and the navigation safety monitor. No I/O beyond config loading;
//! platform services are traits implemented by the daemon.

pub mod assistance;
pub mod config;
pub mod device_router;
pub mod devices;
pub mod dialogue;
pub mod error;
pub mod gesture;
pub mod glyph;
pub mod intent;
pub mod keywords;
pub mod location;
pub mod mood;
pub mod navigation;
pub mod profiles;
pub mod safety;

pub use config::{Config, CONFIG_PATH, DEFAULT_CONFIG_PATH};
pub use device_router::{DeviceAction, DeviceCommandRouter};
pub use devices::{Device, DeviceKind, DeviceRegistry};
pub use dialogue::{Assistant, AssistantReply, Strategy};
pub use error::{Platform, SanadError};
pub use gesture::{AnimationDirective, GestureLabel, GestureResolver, GestureResponse};
pub use glyph::GlyphContext;
pub use intent::{Intent, IntentClassifier};
pub use location::{Position, PositionSource, WatchOptions};
pub use mood::{Mood, MoodClassifier};
pub use navigation::Page;
pub use safety::{Feature, Hazard, SafetyMonitor, SafetyOutputs, ToggleOutcome, WatchToken};
