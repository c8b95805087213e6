//! Platform collaborators.
//!
//! Audio, contact notification, geolocation and the on-screen surface are
//! all stand-ins: they log what a browser would have done and never fail
//! unless the capability is switched off in `[platform]`.

use sanad_common::assistance::SpeechRequest;
use sanad_common::config::{Config, PlatformConfig};
use sanad_common::error::Platform;
use sanad_common::safety::EmergencyContact;
use sanad_common::{Position, PositionSource, SafetyOutputs, SanadError, WatchOptions};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Services detected once at setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub speech_recognition: bool,
    pub speech_synthesis: bool,
    pub geolocation: bool,
    pub audio: bool,
}

impl Capabilities {
    pub fn detect(platform: &PlatformConfig) -> Self {
        let caps = Self {
            speech_recognition: platform.speech_recognition,
            speech_synthesis: platform.speech_synthesis,
            geolocation: platform.geolocation,
            audio: platform.audio,
        };
        for (available, service) in [
            (caps.speech_recognition, Platform::SpeechRecognition),
            (caps.speech_synthesis, Platform::SpeechSynthesis),
            (caps.geolocation, Platform::Geolocation),
            (caps.audio, Platform::Audio),
        ] {
            if !available {
                warn!("Platform service unavailable: {}", service);
            }
        }
        caps
    }
}

/// Alert sound and contact notification stand-ins
#[derive(Debug, Clone, Default)]
pub struct AlertOutputs {
    audio: bool,
    pub sounds_played: usize,
    pub notifications_sent: usize,
}

impl AlertOutputs {
    pub fn new(audio: bool) -> Self {
        Self {
            audio,
            ..Self::default()
        }
    }
}

impl SafetyOutputs for AlertOutputs {
    fn play_alert_sound(&mut self, sound: &str) -> Result<(), SanadError> {
        if !self.audio {
            return Err(SanadError::PlatformUnavailable(Platform::Audio));
        }
        info!("Playing alert sound {}", sound);
        self.sounds_played += 1;
        Ok(())
    }

    fn notify_contact(&mut self, contact: &EmergencyContact, message: &str) -> Result<(), SanadError> {
        info!("Notifying {} at {}: {}", contact.name, contact.phone, message);
        self.notifications_sent += 1;
        Ok(())
    }
}

/// Fixed position from `[geolocation]`
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPosition {
    position: Position,
    available: bool,
}

impl SimulatedPosition {
    pub fn from_config(config: &Config) -> Self {
        Self {
            position: Position {
                latitude: config.geolocation.latitude,
                longitude: config.geolocation.longitude,
            },
            available: config.platform.geolocation,
        }
    }
}

impl PositionSource for SimulatedPosition {
    fn current_position(&mut self, options: &WatchOptions) -> Result<Position, SanadError> {
        if !self.available {
            return Err(SanadError::PlatformUnavailable(Platform::Geolocation));
        }
        debug!(
            "Position request (high_accuracy={}, max_age={}ms, timeout={}ms)",
            options.high_accuracy,
            options.maximum_age_ms,
            options.timeout_ms
        );
        Ok(self.position)
    }
}

/// Where on-screen messages and speech requests end up
pub trait OutputSink: Send {
    fn show(&mut self, message: &str);
    fn speak(&mut self, request: &SpeechRequest);
}

/// Page surface on stdout
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn show(&mut self, message: &str) {
        println!("{}", message);
    }

    fn speak(&mut self, request: &SpeechRequest) {
        info!("Speaking ({}): {}", request.language, request.text);
        println!("🔊 {}", request.text);
    }
}

/// Collects output in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
    speech: Arc<Mutex<Vec<SpeechRequest>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn spoken(&self) -> Vec<SpeechRequest> {
        self.speech.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl OutputSink for MemorySink {
    fn show(&mut self, message: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(message.to_string());
        }
    }

    fn speak(&mut self, request: &SpeechRequest) {
        if let Ok(mut speech) = self.speech.lock() {
            speech.push(request.clone());
        }
    }
}
