//! Device command router - voice phrase to appliance action.
//!
//! Phrases are matched with the same ordered substring scan as the
//! classifiers. Longer phrases that mention a device name come before the
//! bare device name, otherwise "رفع صوت التلفاز" would toggle power.

use crate::devices::{
    AcState, DeviceKind, DeviceRegistry, TvState, WasherState, TEMPERATURE_MAX, TEMPERATURE_MIN,
    TEMPERATURE_STEP, VOLUME_MAX, VOLUME_MIN, VOLUME_STEP,
};
use crate::keywords::{self, KeywordEntry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceAction {
    Power,
    VolumeUp,
    VolumeDown,
    TempUp,
    TempDown,
    Start,
    Stop,
}

impl std::fmt::Display for DeviceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Power => "power",
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
            Self::TempUp => "temp-up",
            Self::TempDown => "temp-down",
            Self::Start => "start",
            Self::Stop => "stop",
        };
        write!(f, "{}", s)
    }
}

/// Target of a matched phrase
pub type DeviceRoute = (DeviceKind, DeviceAction);

const COMMANDS: &[KeywordEntry<DeviceRoute>] = &[
    ((DeviceKind::Tv, DeviceAction::VolumeUp), &["رفع صوت التلفاز"]),
    ((DeviceKind::Tv, DeviceAction::VolumeDown), &["خفض صوت التلفاز"]),
    ((DeviceKind::Ac, DeviceAction::TempUp), &["رفع درجة الحرارة"]),
    ((DeviceKind::Ac, DeviceAction::TempDown), &["خفض درجة الحرارة"]),
    ((DeviceKind::WashingMachine, DeviceAction::Start), &["بدء الغسيل"]),
    ((DeviceKind::WashingMachine, DeviceAction::Stop), &["إيقاف الغسيل"]),
    ((DeviceKind::Tv, DeviceAction::Power), &["التلفاز"]),
    ((DeviceKind::Ac, DeviceAction::Power), &["التكييف"]),
    ((DeviceKind::WashingMachine, DeviceAction::Power), &["الغسالة"]),
];

/// Match a command to a route without touching any state
pub fn route(command: &str) -> Option<DeviceRoute> {
    keywords::first_match(COMMANDS, &keywords::normalize(command)).map(|(route, _)| route)
}

/// Turns free-text commands into device state changes and status lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceCommandRouter;

impl DeviceCommandRouter {
    pub fn new() -> Self {
        Self
    }

    /// Process one command against `registry`, returning the status message.
    pub fn process(&self, registry: &mut DeviceRegistry, command: &str) -> String {
        let command = command.trim();
        match route(command) {
            Some((kind, action)) => self.control(registry, kind, action),
            None => {
                debug!("Device command not understood: {}", command);
                format!("أمر غير مفهوم: {}", command)
            }
        }
    }

    /// Apply `action` to the shared state of `kind`, if a device of that
    /// type is registered.
    pub fn control(&self, registry: &mut DeviceRegistry, kind: DeviceKind, action: DeviceAction) -> String {
        let device_id = match registry.find(kind) {
            Some(device) => device.id.clone(),
            None => return format!("الجهاز {} غير مسجل", kind),
        };

        let states = registry.states_mut();
        let message = match kind {
            DeviceKind::Tv => control_tv(&mut states.tv, action),
            DeviceKind::Ac => control_ac(&mut states.ac, action),
            DeviceKind::WashingMachine => control_washer(&mut states.washing_machine, action),
        };
        info!("Device {} ({}): {} -> {}", device_id, kind, action, message);
        message
    }
}

fn on_off(power: bool) -> &'static str {
    if power {
        "تشغيل"
    } else {
        "إيقاف"
    }
}

fn control_tv(tv: &mut TvState, action: DeviceAction) -> String {
    match action {
        DeviceAction::Power => {
            tv.power = !tv.power;
            format!("تم {} التلفاز", on_off(tv.power))
        }
        DeviceAction::VolumeUp => {
            tv.volume = tv.volume.saturating_add(VOLUME_STEP).min(VOLUME_MAX);
            format!("تم رفع الصوت إلى {}", tv.volume)
        }
        DeviceAction::VolumeDown => {
            tv.volume = tv.volume.saturating_sub(VOLUME_STEP).max(VOLUME_MIN);
            format!("تم خفض الصوت إلى {}", tv.volume)
        }
        _ => "أمر غير معروف للتلفاز".to_string(),
    }
}

fn control_ac(ac: &mut AcState, action: DeviceAction) -> String {
    match action {
        DeviceAction::Power => {
            ac.power = !ac.power;
            format!("تم {} المكيف", on_off(ac.power))
        }
        DeviceAction::TempUp => {
            ac.temperature = ac
                .temperature
                .saturating_add(TEMPERATURE_STEP)
                .min(TEMPERATURE_MAX);
            format!("تم رفع درجة الحرارة إلى {}", ac.temperature)
        }
        DeviceAction::TempDown => {
            ac.temperature = ac
                .temperature
                .saturating_sub(TEMPERATURE_STEP)
                .max(TEMPERATURE_MIN);
            format!("تم خفض درجة الحرارة إلى {}", ac.temperature)
        }
        _ => "أمر غير معروف للمكيف".to_string(),
    }
}

fn control_washer(washer: &mut WasherState, action: DeviceAction) -> String {
    match action {
        DeviceAction::Power => {
            washer.power = !washer.power;
            format!("تم {} الغسالة", on_off(washer.power))
        }
        DeviceAction::Start => {
            if washer.power {
                washer.running = true;
                "بدأ برنامج الغسيل".to_string()
            } else {
                "يرجى تشغيل الغسالة أولاً".to_string()
            }
        }
        DeviceAction::Stop => {
            washer.running = false;
            "تم إيقاف الغسيل".to_string()
        }
        _ => "أمر غير معروف للغسالة".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(kinds: &[DeviceKind]) -> DeviceRegistry {
        let mut reg = DeviceRegistry::new();
        for (i, kind) in kinds.iter().enumerate() {
            reg.register(&format!("dev{}", i), *kind).unwrap();
        }
        reg
    }

    #[test]
    fn test_volume_phrase_beats_power_phrase() {
        assert_eq!(
            route("رفع صوت التلفاز"),
            Some((DeviceKind::Tv, DeviceAction::VolumeUp))
        );
        assert_eq!(
            route("شغل التلفاز"),
            Some((DeviceKind::Tv, DeviceAction::Power))
        );
    }

    #[test]
    fn test_unknown_command() {
        let mut reg = registry_with(&[DeviceKind::Tv]);
        let msg = DeviceCommandRouter::new().process(&mut reg, "افتح النافذة");
        assert_eq!(msg, "أمر غير مفهوم: افتح النافذة");
    }

    #[test]
    fn test_unregistered_device_no_mutation() {
        let mut reg = registry_with(&[DeviceKind::Ac]);
        let before = reg.states().clone();
        let msg = DeviceCommandRouter::new().process(&mut reg, "شغل التلفاز");
        assert_eq!(msg, "الجهاز tv غير مسجل");
        assert_eq!(reg.states(), &before);
    }

    #[test]
    fn test_tv_power_toggle() {
        let mut reg = registry_with(&[DeviceKind::Tv]);
        let router = DeviceCommandRouter::new();
        assert_eq!(router.process(&mut reg, "التلفاز"), "تم تشغيل التلفاز");
        assert!(reg.states().tv.power);
        assert_eq!(router.process(&mut reg, "التلفاز"), "تم إيقاف التلفاز");
        assert!(!reg.states().tv.power);
    }

    #[test]
    fn test_volume_clamps() {
        let mut reg = registry_with(&[DeviceKind::Tv]);
        let router = DeviceCommandRouter::new();
        for _ in 0..20 {
            router.process(&mut reg, "رفع صوت التلفاز");
        }
        assert_eq!(reg.states().tv.volume, 100);
        for _ in 0..20 {
            router.process(&mut reg, "خفض صوت التلفاز");
        }
        assert_eq!(reg.states().tv.volume, 0);
    }

    #[test]
    fn test_temperature_clamps() {
        let mut reg = registry_with(&[DeviceKind::Ac]);
        let router = DeviceCommandRouter::new();
        for _ in 0..20 {
            router.process(&mut reg, "رفع درجة الحرارة");
        }
        assert_eq!(reg.states().ac.temperature, 30);
        let msg = router.process(&mut reg, "خفض درجة الحرارة");
        assert_eq!(msg, "تم خفض درجة الحرارة إلى 29");
        for _ in 0..30 {
            router.process(&mut reg, "خفض درجة الحرارة");
        }
        assert_eq!(reg.states().ac.temperature, 16);
    }

    #[test]
    fn test_washer_requires_power() {
        let mut reg = registry_with(&[DeviceKind::WashingMachine]);
        let router = DeviceCommandRouter::new();

        assert_eq!(router.process(&mut reg, "بدء الغسيل"), "يرجى تشغيل الغسالة أولاً");
        assert!(!reg.states().washing_machine.running);

        assert_eq!(router.process(&mut reg, "الغسالة"), "تم تشغيل الغسالة");
        assert_eq!(router.process(&mut reg, "بدء الغسيل"), "بدأ برنامج الغسيل");
        assert!(reg.states().washing_machine.running);

        assert_eq!(router.process(&mut reg, "إيقاف الغسيل"), "تم إيقاف الغسيل");
        assert!(!reg.states().washing_machine.running);
    }

    #[test]
    fn test_unknown_action_per_type() {
        let mut reg = registry_with(&[DeviceKind::Tv, DeviceKind::Ac, DeviceKind::WashingMachine]);
        let router = DeviceCommandRouter::new();
        assert_eq!(
            router.control(&mut reg, DeviceKind::Tv, DeviceAction::Start),
            "أمر غير معروف للتلفاز"
        );
        assert_eq!(
            router.control(&mut reg, DeviceKind::Ac, DeviceAction::VolumeUp),
            "أمر غير معروف للمكيف"
        );
        assert_eq!(
            router.control(&mut reg, DeviceKind::WashingMachine, DeviceAction::TempUp),
            "أمر غير معروف للغسالة"
        );
    }

    #[test]
    fn test_shared_state_across_ids() {
        let mut reg = registry_with(&[DeviceKind::Tv, DeviceKind::Tv]);
        let router = DeviceCommandRouter::new();
        router.process(&mut reg, "رفع صوت التلفاز");
        reg.remove(0).unwrap();
        // the remaining tv sees the same record
        assert_eq!(reg.states().tv.volume, 60);
    }
}
