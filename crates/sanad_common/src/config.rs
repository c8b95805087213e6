//! Configuration management.
//!
//! Loads settings from /etc/sanad/config.toml or uses defaults. Every field
//! has a default so partial files are fine.

use crate::error::SanadError;
use crate::location::WatchOptions;
use crate::safety::SafetySettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/sanad/config.toml";

/// Fallback config file path
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/sanad/config.toml";

/// Speech settings shared by recognition and synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// BCP-47 language tag
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "ar-SA".to_string()
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

/// Which platform services exist on this host. Read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_true")]
    pub speech_recognition: bool,

    #[serde(default = "default_true")]
    pub speech_synthesis: bool,

    #[serde(default = "default_true")]
    pub geolocation: bool,

    #[serde(default = "default_true")]
    pub audio: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            speech_recognition: true,
            speech_synthesis: true,
            geolocation: true,
            audio: true,
        }
    }
}

/// Simulated hazard detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    #[serde(default = "default_obstacle_period")]
    pub obstacle_period_ms: u64,

    /// Chance of an obstacle per tick
    #[serde(default = "default_obstacle_probability")]
    pub obstacle_probability: f64,

    #[serde(default = "default_fall_period")]
    pub fall_period_ms: u64,

    /// Chance of a fall per tick
    #[serde(default = "default_fall_probability")]
    pub fall_probability: f64,

    #[serde(default = "default_alert_sound")]
    pub alert_sound: String,

    /// Fixed RNG seed for reproducible sessions
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_obstacle_period() -> u64 {
    5_000
}

fn default_obstacle_probability() -> f64 {
    0.1
}

fn default_fall_period() -> u64 {
    7_000
}

fn default_fall_probability() -> f64 {
    0.05
}

fn default_alert_sound() -> String {
    "obstacle-alert.mp3".to_string()
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            obstacle_period_ms: default_obstacle_period(),
            obstacle_probability: default_obstacle_probability(),
            fall_period_ms: default_fall_period(),
            fall_probability: default_fall_probability(),
            alert_sound: default_alert_sound(),
            seed: None,
        }
    }
}

/// Position watch settings. max-age and timeout are passed to the provider
/// as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_true")]
    pub high_accuracy: bool,

    #[serde(default = "default_maximum_age")]
    pub maximum_age_ms: u64,

    #[serde(default = "default_geo_timeout")]
    pub timeout_ms: u64,

    /// How often the simulated watch reports
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Simulated position
    #[serde(default = "default_latitude")]
    pub latitude: f64,

    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

fn default_maximum_age() -> u64 {
    30_000
}

fn default_geo_timeout() -> u64 {
    27_000
}

fn default_poll_interval() -> u64 {
    10_000
}

fn default_latitude() -> f64 {
    24.7136
}

fn default_longitude() -> f64 {
    46.6753
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age_ms: default_maximum_age(),
            timeout_ms: default_geo_timeout(),
            poll_interval_ms: default_poll_interval(),
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

/// Delays for the simulated sign translation / environment description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_response_delay")]
    pub response_delay_ms: u64,
}

fn default_response_delay() -> u64 {
    2_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: default_response_delay(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub platform: PlatformConfig,

    #[serde(default)]
    pub safety: SafetyConfig,

    #[serde(default)]
    pub geolocation: GeolocationConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load config from the standard locations, or defaults
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            })
    }

    /// Load config from a specific path
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SanadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config.validate())
    }

    /// Save default config to path (for init)
    pub fn save_default(path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }

    /// Clamp probabilities into [0, 1] and replace zero periods with defaults
    pub fn validate(mut self) -> Self {
        for (name, p) in [
            ("obstacle_probability", &mut self.safety.obstacle_probability),
            ("fall_probability", &mut self.safety.fall_probability),
        ] {
            if !(0.0..=1.0).contains(p) || p.is_nan() {
                warn!("{} = {} out of range, clamping", name, p);
                *p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
            }
        }

        if self.safety.obstacle_period_ms == 0 {
            warn!("obstacle_period_ms = 0, using default");
            self.safety.obstacle_period_ms = default_obstacle_period();
        }
        if self.safety.fall_period_ms == 0 {
            warn!("fall_period_ms = 0, using default");
            self.safety.fall_period_ms = default_fall_period();
        }
        if self.geolocation.poll_interval_ms == 0 {
            warn!("poll_interval_ms = 0, using default");
            self.geolocation.poll_interval_ms = default_poll_interval();
        }
        self
    }

    pub fn safety_settings(&self) -> SafetySettings {
        SafetySettings {
            obstacle_probability: self.safety.obstacle_probability,
            fall_probability: self.safety.fall_probability,
            alert_sound: self.safety.alert_sound.clone(),
            geolocation_available: self.platform.geolocation,
        }
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            high_accuracy: self.geolocation.high_accuracy,
            maximum_age_ms: self.geolocation.maximum_age_ms,
            timeout_ms: self.geolocation.timeout_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.speech.language, "ar-SA");
        assert_eq!(config.safety.obstacle_period_ms, 5_000);
        assert_eq!(config.safety.fall_period_ms, 7_000);
        assert!((config.safety.obstacle_probability - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.watch_options(), WatchOptions::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
[safety]
obstacle_probability = 0.5

[platform]
geolocation = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.safety.obstacle_probability - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.safety.fall_period_ms, 7_000);
        assert!(!config.platform.geolocation);
        assert!(config.platform.speech_recognition);
        assert!(!config.safety_settings().geolocation_available);
    }

    #[test]
    fn test_validate_clamps() {
        let toml_str = r#"
[safety]
obstacle_probability = 3.0
fall_probability = -1.0
obstacle_period_ms = 0
"#;
        let config: Config = toml::from_str::<Config>(toml_str).unwrap().validate();
        assert_eq!(config.safety.obstacle_probability, 1.0);
        assert_eq!(config.safety.fall_probability, 0.0);
        assert_eq!(config.safety.obstacle_period_ms, 5_000);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[speech]\nlanguage = \"en-US\"").unwrap();
        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.speech.language, "en-US");
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(matches!(
            Config::load_from_path("/nonexistent/sanad.toml"),
            Err(SanadError::Io(_))
        ));
    }

    #[test]
    fn test_save_default_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::save_default(&path).unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.simulation.response_delay_ms, 2_000);
    }
}
