//! Navigation safety monitor.
//!
//! A master switch plus three independent watches layered on top of it:
//! obstacle and fall detection (periodic Bernoulli trials) and location
//! tracking (an external position subscription). The monitor itself owns no
//! timers. Starting a watch hands out a [`WatchToken`]; the runtime schedules
//! ticks carrying that token and the monitor drops any tick whose token is no
//! longer current, so a callback racing a cancellation is a no-op.

use crate::error::SanadError;
use crate::location::Position;
use chrono::{DateTime, Local};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Hard cap on displayed alert lines
pub const ALERT_LOG_CAP: usize = 10;

/// One line in the on-screen alert log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertLogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl std::fmt::Display for AlertLogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Newest-first log, oldest entries evicted silently past the cap
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    entries: VecDeque<AlertLogEntry>,
    recorded: u64,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) -> &AlertLogEntry {
        self.entries.push_front(AlertLogEntry {
            timestamp: Local::now(),
            message: message.into(),
        });
        self.entries.truncate(ALERT_LOG_CAP);
        self.recorded += 1;
        &self.entries[0]
    }

    /// Entries ever pushed, including evicted ones
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Entries pushed after the log had seen `seen` entries, oldest first.
    /// Anything already evicted is skipped.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &AlertLogEntry> {
        let fresh = self.recorded.saturating_sub(seen).min(self.entries.len() as u64) as usize;
        self.entries.iter().take(fresh).rev()
    }

    pub fn entries(&self) -> impl Iterator<Item = &AlertLogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&AlertLogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub phone: String,
}

/// Independently togglable watches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Obstacle,
    Fall,
    Location,
}

impl Feature {
    pub const ALL: [Feature; 3] = [Feature::Obstacle, Feature::Fall, Feature::Location];

    fn index(&self) -> usize {
        match self {
            Feature::Obstacle => 0,
            Feature::Fall => 1,
            Feature::Location => 2,
        }
    }

    fn started_message(&self) -> &'static str {
        match self {
            Feature::Obstacle => "تم تفعيل كشف العوائق",
            Feature::Fall => "تم تفعيل كشف السقوط",
            Feature::Location => "تم تفعيل تتبع الموقع",
        }
    }

    fn stopped_message(&self) -> &'static str {
        match self {
            Feature::Obstacle => "تم إيقاف كشف العوائق",
            Feature::Fall => "تم إيقاف كشف السقوط",
            Feature::Location => "تم إيقاف تتبع الموقع",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Feature::Obstacle => "obstacle",
            Feature::Fall => "fall",
            Feature::Location => "location",
        };
        write!(f, "{}", s)
    }
}

/// Simulated hazards raised by a successful trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Obstacle,
    Fall,
}

impl Hazard {
    pub fn log_message(&self) -> &'static str {
        match self {
            Hazard::Obstacle => "تحذير: عائق تم اكتشافه!",
            Hazard::Fall => "تحذير: سقوط محتمل تم اكتشافه!",
        }
    }

    pub fn contact_message(&self) -> &'static str {
        match self {
            Hazard::Obstacle => "تم اكتشاف عائق أثناء التنقل",
            Hazard::Fall => "تم اكتشاف سقوط محتمل",
        }
    }
}

/// Identifies one activation of one watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchToken {
    pub feature: Feature,
    pub epoch: u64,
}

/// What a toggle request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Watch started; schedule ticks/updates carrying this token
    Started(WatchToken),
    /// Watch stopped; cancel whatever carries the old token
    Stopped(Feature),
    /// Requested state already in effect
    Unchanged,
    /// Master switch is off, sub-feature toggles have no effect
    Ignored,
    /// Platform service missing (location only)
    Unavailable,
}

/// Side effects of an alert, provided by the runtime.
///
/// Both are best effort: failures are logged by the monitor and never
/// propagated or retried.
pub trait SafetyOutputs {
    fn play_alert_sound(&mut self, sound: &str) -> Result<(), SanadError>;
    fn notify_contact(&mut self, contact: &EmergencyContact, message: &str) -> Result<(), SanadError>;
}

/// Tunables, usually built from the `[safety]` config section
#[derive(Debug, Clone, PartialEq)]
pub struct SafetySettings {
    pub obstacle_probability: f64,
    pub fall_probability: f64,
    pub alert_sound: String,
    pub geolocation_available: bool,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            obstacle_probability: 0.1,
            fall_probability: 0.05,
            alert_sound: "obstacle-alert.mp3".to_string(),
            geolocation_available: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Watch {
    active: bool,
    epoch: u64,
}

/// Snapshot for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyStatus {
    pub enabled: bool,
    pub active: Vec<Feature>,
    pub contacts: usize,
    pub log_entries: usize,
}

pub struct SafetyMonitor {
    settings: SafetySettings,
    enabled: bool,
    watches: [Watch; 3],
    next_epoch: u64,
    log: AlertLog,
    contacts: Vec<EmergencyContact>,
}

impl SafetyMonitor {
    pub fn new(settings: SafetySettings) -> Self {
        Self {
            settings,
            enabled: false,
            watches: [Watch::default(); 3],
            next_epoch: 1,
            log: AlertLog::new(),
            contacts: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self, feature: Feature) -> bool {
        self.watches[feature.index()].active
    }

    pub fn log(&self) -> &AlertLog {
        &self.log
    }

    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.contacts
    }

    /// Append a free-form status line to the alert log
    pub fn record(&mut self, message: impl Into<String>) {
        let entry = self.log.push(message);
        debug!("Alert log: {}", entry);
    }

    /// Flip the master switch.
    ///
    /// Turning it off stops every active watch first; the returned features
    /// are the ones whose timers/subscriptions must be cancelled.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<Feature> {
        let mut stopped = Vec::new();
        if !enabled {
            for feature in Feature::ALL {
                if self.is_active(feature) {
                    self.stop(feature);
                    stopped.push(feature);
                }
            }
        }

        self.enabled = enabled;
        info!("Safety system {}", if enabled { "enabled" } else { "disabled" });
        self.record(if enabled {
            "نظام السلامة مفعل"
        } else {
            "نظام السلامة معطل"
        });
        stopped
    }

    /// Turn one watch on or off. Only effective while the master switch is on.
    pub fn toggle(&mut self, feature: Feature, on: bool) -> ToggleOutcome {
        if !self.enabled {
            debug!("Safety disabled, ignoring {} toggle", feature);
            return ToggleOutcome::Ignored;
        }
        if self.is_active(feature) == on {
            return ToggleOutcome::Unchanged;
        }

        if on {
            if feature == Feature::Location && !self.settings.geolocation_available {
                warn!("Location tracking requested but geolocation is unavailable");
                self.record("خدمة تحديد الموقع غير متاحة");
                return ToggleOutcome::Unavailable;
            }
            ToggleOutcome::Started(self.start(feature))
        } else {
            self.stop(feature);
            ToggleOutcome::Stopped(feature)
        }
    }

    fn start(&mut self, feature: Feature) -> WatchToken {
        let epoch = self.next_epoch;
        self.next_epoch += 1;
        self.watches[feature.index()] = Watch {
            active: true,
            epoch,
        };
        info!("Started {} watch (epoch {})", feature, epoch);
        self.record(feature.started_message());
        WatchToken { feature, epoch }
    }

    fn stop(&mut self, feature: Feature) {
        let watch = &mut self.watches[feature.index()];
        watch.active = false;
        // the old epoch never becomes current again
        watch.epoch = 0;
        info!("Stopped {} watch", feature);
        self.record(feature.stopped_message());
    }

    /// Whether callbacks carrying `token` should still be honoured
    pub fn is_current(&self, token: WatchToken) -> bool {
        let watch = self.watches[token.feature.index()];
        self.enabled && watch.active && watch.epoch == token.epoch
    }

    /// Handle one timer tick: run the Bernoulli trial for the watch and raise
    /// the alert on success. Stale tokens are ignored.
    pub fn tick<R: Rng>(
        &mut self,
        token: WatchToken,
        rng: &mut R,
        outputs: &mut dyn SafetyOutputs,
    ) -> Option<Hazard> {
        if !self.is_current(token) {
            debug!("Ignoring stale {} tick (epoch {})", token.feature, token.epoch);
            return None;
        }

        let (hazard, probability) = match token.feature {
            Feature::Obstacle => (Hazard::Obstacle, self.settings.obstacle_probability),
            Feature::Fall => (Hazard::Fall, self.settings.fall_probability),
            Feature::Location => return None,
        };

        if rng.gen_bool(probability.clamp(0.0, 1.0)) {
            self.trigger_alert(hazard, outputs);
            Some(hazard)
        } else {
            None
        }
    }

    /// Sound, log and notify for `hazard`
    pub fn trigger_alert(&mut self, hazard: Hazard, outputs: &mut dyn SafetyOutputs) {
        warn!("Hazard detected: {:?}", hazard);

        if let Err(e) = outputs.play_alert_sound(&self.settings.alert_sound) {
            warn!("Error playing alert sound: {}", e);
        }

        self.record(hazard.log_message());

        for contact in &self.contacts {
            if let Err(e) = outputs.notify_contact(contact, hazard.contact_message()) {
                warn!("Failed to notify {}: {}", contact.name, e);
            }
        }
    }

    /// Position update from the location watch
    pub fn on_position(&mut self, token: WatchToken, position: Position) -> bool {
        if !self.is_current(token) {
            debug!("Ignoring stale position update (epoch {})", token.epoch);
            return false;
        }
        self.record(format!("الموقع الحالي: {}", position));
        true
    }

    /// Error from the location watch. Logged, never retried.
    pub fn on_position_error(&mut self, token: WatchToken, reason: &str) -> bool {
        if !self.is_current(token) {
            return false;
        }
        warn!("Geolocation error: {}", reason);
        self.record("خطأ في تحديد الموقع");
        true
    }

    pub fn add_contact(&mut self, name: &str, phone: &str) -> Result<&EmergencyContact, SanadError> {
        let name = name.trim();
        let phone = phone.trim();
        if name.is_empty() {
            return Err(SanadError::EmptyInput("contact_name"));
        }
        if phone.is_empty() {
            return Err(SanadError::EmptyInput("contact_phone"));
        }

        self.contacts.push(EmergencyContact {
            name: name.to_string(),
            phone: phone.to_string(),
        });
        self.record(format!("تمت إضافة جهة اتصال طارئة: {}", name));
        Ok(&self.contacts[self.contacts.len() - 1])
    }

    pub fn remove_contact(&mut self, index: usize) -> Result<EmergencyContact, SanadError> {
        if index >= self.contacts.len() {
            return Err(SanadError::IndexOutOfRange {
                index,
                len: self.contacts.len(),
            });
        }
        let contact = self.contacts.remove(index);
        self.record("تمت إزالة جهة اتصال طارئة");
        Ok(contact)
    }

    pub fn status(&self) -> SafetyStatus {
        SafetyStatus {
            enabled: self.enabled,
            active: Feature::ALL
                .into_iter()
                .filter(|f| self.is_active(*f))
                .collect(),
            contacts: self.contacts.len(),
            log_entries: self.log.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct Recorder {
        sounds: usize,
        notified: Vec<(String, String)>,
        fail_sound: bool,
    }

    impl SafetyOutputs for Recorder {
        fn play_alert_sound(&mut self, _sound: &str) -> Result<(), SanadError> {
            self.sounds += 1;
            if self.fail_sound {
                return Err(SanadError::External("no audio device".into()));
            }
            Ok(())
        }

        fn notify_contact(&mut self, contact: &EmergencyContact, message: &str) -> Result<(), SanadError> {
            self.notified.push((contact.name.clone(), message.to_string()));
            Ok(())
        }
    }

    fn always() -> SafetySettings {
        SafetySettings {
            obstacle_probability: 1.0,
            fall_probability: 1.0,
            ..SafetySettings::default()
        }
    }

    #[test]
    fn test_log_cap_and_order() {
        let mut log = AlertLog::new();
        for i in 0..11 {
            log.push(format!("m{}", i));
        }
        assert_eq!(log.len(), ALERT_LOG_CAP);
        assert_eq!(log.latest().unwrap().message, "m10");
        // m0 was evicted
        assert!(log.entries().all(|e| e.message != "m0"));
        assert_eq!(log.entries().last().unwrap().message, "m1");
    }

    #[test]
    fn test_log_since_skips_evicted() {
        let mut log = AlertLog::new();
        log.push("a");
        let seen = log.recorded();
        log.push("b");
        log.push("c");
        let fresh: Vec<_> = log.since(seen).map(|e| e.message.as_str()).collect();
        assert_eq!(fresh, vec!["b", "c"]);

        for i in 0..15 {
            log.push(format!("x{}", i));
        }
        assert_eq!(log.since(seen).count(), ALERT_LOG_CAP);
        assert_eq!(log.since(log.recorded()).count(), 0);
    }

    #[test]
    fn test_toggle_ignored_while_disabled() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        assert_eq!(m.toggle(Feature::Obstacle, true), ToggleOutcome::Ignored);
        assert!(!m.is_active(Feature::Obstacle));
        assert!(m.log().is_empty());
    }

    #[test]
    fn test_enable_logs_status() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        m.set_enabled(true);
        assert_eq!(m.log().latest().unwrap().message, "نظام السلامة مفعل");
    }

    #[test]
    fn test_tick_raises_alert_and_notifies() {
        let mut m = SafetyMonitor::new(always());
        m.set_enabled(true);
        m.add_contact("أمي", "0500000000").unwrap();
        let token = match m.toggle(Feature::Obstacle, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };

        let mut rng = StdRng::seed_from_u64(7);
        let mut out = Recorder::default();
        assert_eq!(m.tick(token, &mut rng, &mut out), Some(Hazard::Obstacle));
        assert_eq!(out.sounds, 1);
        assert_eq!(
            out.notified,
            vec![("أمي".to_string(), "تم اكتشاف عائق أثناء التنقل".to_string())]
        );
        assert_eq!(m.log().latest().unwrap().message, "تحذير: عائق تم اكتشافه!");
    }

    #[test]
    fn test_zero_probability_never_fires() {
        let mut m = SafetyMonitor::new(SafetySettings {
            fall_probability: 0.0,
            ..SafetySettings::default()
        });
        m.set_enabled(true);
        let token = match m.toggle(Feature::Fall, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Recorder::default();
        for _ in 0..100 {
            assert_eq!(m.tick(token, &mut rng, &mut out), None);
        }
        assert_eq!(out.sounds, 0);
    }

    #[test]
    fn test_stale_tick_after_disable_is_noop() {
        let mut m = SafetyMonitor::new(always());
        m.set_enabled(true);
        let token = match m.toggle(Feature::Obstacle, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(m.toggle(Feature::Obstacle, false), ToggleOutcome::Stopped(Feature::Obstacle));
        let len = m.log().len();

        let mut rng = StdRng::seed_from_u64(3);
        let mut out = Recorder::default();
        assert_eq!(m.tick(token, &mut rng, &mut out), None);
        assert_eq!(m.log().len(), len);
        assert_eq!(out.sounds, 0);
    }

    #[test]
    fn test_reenable_issues_new_epoch() {
        let mut m = SafetyMonitor::new(always());
        m.set_enabled(true);
        let first = match m.toggle(Feature::Fall, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        m.toggle(Feature::Fall, false);
        let second = match m.toggle(Feature::Fall, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        assert_ne!(first.epoch, second.epoch);
        assert!(!m.is_current(first));
        assert!(m.is_current(second));
    }

    #[test]
    fn test_master_off_stops_watches() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        m.set_enabled(true);
        m.toggle(Feature::Obstacle, true);
        m.toggle(Feature::Location, true);
        let stopped = m.set_enabled(false);
        assert_eq!(stopped, vec![Feature::Obstacle, Feature::Location]);
        assert!(m.status().active.is_empty());
        assert_eq!(m.log().latest().unwrap().message, "نظام السلامة معطل");
    }

    #[test]
    fn test_double_enable_unchanged() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        m.set_enabled(true);
        assert!(matches!(m.toggle(Feature::Obstacle, true), ToggleOutcome::Started(_)));
        assert_eq!(m.toggle(Feature::Obstacle, true), ToggleOutcome::Unchanged);
    }

    #[test]
    fn test_sound_failure_is_not_fatal() {
        let mut m = SafetyMonitor::new(always());
        m.set_enabled(true);
        m.add_contact("سارة", "0511111111").unwrap();
        let mut out = Recorder {
            fail_sound: true,
            ..Recorder::default()
        };
        m.trigger_alert(Hazard::Fall, &mut out);
        assert_eq!(out.notified.len(), 1);
        assert_eq!(m.log().latest().unwrap().message, "تحذير: سقوط محتمل تم اكتشافه!");
    }

    #[test]
    fn test_location_unavailable() {
        let mut m = SafetyMonitor::new(SafetySettings {
            geolocation_available: false,
            ..SafetySettings::default()
        });
        m.set_enabled(true);
        assert_eq!(m.toggle(Feature::Location, true), ToggleOutcome::Unavailable);
        assert!(!m.is_active(Feature::Location));
    }

    #[test]
    fn test_position_updates() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        m.set_enabled(true);
        let token = match m.toggle(Feature::Location, true) {
            ToggleOutcome::Started(t) => t,
            other => panic!("unexpected {:?}", other),
        };
        let pos = Position {
            latitude: 21.5,
            longitude: 39.2,
        };
        assert!(m.on_position(token, pos));
        assert_eq!(m.log().latest().unwrap().message, "الموقع الحالي: 21.5, 39.2");

        assert!(m.on_position_error(token, "timeout"));
        assert_eq!(m.log().latest().unwrap().message, "خطأ في تحديد الموقع");

        m.toggle(Feature::Location, false);
        assert!(!m.on_position(token, pos));
    }

    #[test]
    fn test_contacts_add_remove() {
        let mut m = SafetyMonitor::new(SafetySettings::default());
        assert!(matches!(
            m.add_contact("", "123"),
            Err(SanadError::EmptyInput("contact_name"))
        ));
        m.add_contact("علي", "0522222222").unwrap();
        m.add_contact("منى", "0533333333").unwrap();
        assert_eq!(
            m.log().latest().unwrap().message,
            "تمت إضافة جهة اتصال طارئة: منى"
        );

        let removed = m.remove_contact(0).unwrap();
        assert_eq!(removed.name, "علي");
        assert_eq!(m.contacts().len(), 1);
        assert!(matches!(
            m.remove_contact(3),
            Err(SanadError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }
}
