//! Device registry - simulated home appliances.
//!
//! Registration is per id, but state is per type: every registered `tv`
//! drives the same power/volume record. This mirrors how the page always
//! behaved and is kept on purpose until per-instance state is designed.

use crate::error::SanadError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

pub const VOLUME_MIN: u8 = 0;
pub const VOLUME_MAX: u8 = 100;
pub const VOLUME_STEP: u8 = 10;

pub const TEMPERATURE_MIN: u8 = 16;
pub const TEMPERATURE_MAX: u8 = 30;
pub const TEMPERATURE_STEP: u8 = 1;

/// Closed set of supported appliance types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    Tv,
    Ac,
    WashingMachine,
}

impl DeviceKind {
    pub const ALL: [DeviceKind; 3] = [DeviceKind::Tv, DeviceKind::Ac, DeviceKind::WashingMachine];

    /// Wire name, as typed by the user and shown in "not registered" messages
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Tv => "tv",
            DeviceKind::Ac => "ac",
            DeviceKind::WashingMachine => "washing-machine",
        }
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = SanadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tv" => Ok(DeviceKind::Tv),
            "ac" => Ok(DeviceKind::Ac),
            "washing-machine" | "washing_machine" => Ok(DeviceKind::WashingMachine),
            other => Err(SanadError::UnknownDeviceType(other.to_string())),
        }
    }
}

/// A registered appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub kind: DeviceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvState {
    pub power: bool,
    /// 0..=100
    pub volume: u8,
    pub channel: u16,
}

impl Default for TvState {
    fn default() -> Self {
        Self {
            power: false,
            volume: 50,
            channel: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcState {
    pub power: bool,
    /// 16..=30 degrees
    pub temperature: u8,
    pub mode: String,
}

impl Default for AcState {
    fn default() -> Self {
        Self {
            power: false,
            temperature: 22,
            mode: "cool".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WasherState {
    pub power: bool,
    pub running: bool,
    pub program: String,
}

impl Default for WasherState {
    fn default() -> Self {
        Self {
            power: false,
            running: false,
            program: "normal".to_string(),
        }
    }
}

/// Shared per-type state, independent of which ids are registered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStates {
    pub tv: TvState,
    pub ac: AcState,
    pub washing_machine: WasherState,
}

/// Registered devices in registration order, plus the shared state
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    states: DeviceStates,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` as a device of `kind`.
    ///
    /// The id is trimmed; an empty id is an input error. Duplicate ids are
    /// rejected and leave the registry untouched. Shared state is never
    /// reset by registration.
    pub fn register(&mut self, id: &str, kind: DeviceKind) -> Result<&Device, SanadError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(SanadError::EmptyInput("device_id"));
        }
        if self.devices.iter().any(|d| d.id == id) {
            return Err(SanadError::DuplicateDevice(id.to_string()));
        }

        info!("Registered device {} as {}", id, kind);
        self.devices.push(Device {
            id: id.to_string(),
            kind,
        });
        Ok(&self.devices[self.devices.len() - 1])
    }

    /// Remove the device at `index` in registration order.
    pub fn remove(&mut self, index: usize) -> Result<Device, SanadError> {
        if index >= self.devices.len() {
            return Err(SanadError::IndexOutOfRange {
                index,
                len: self.devices.len(),
            });
        }
        let device = self.devices.remove(index);
        info!("Removed device {} ({})", device.id, device.kind);
        Ok(device)
    }

    /// First registered device of `kind`
    pub fn find(&self, kind: DeviceKind) -> Option<&Device> {
        self.devices.iter().find(|d| d.kind == kind)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn states(&self) -> &DeviceStates {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut DeviceStates {
        &mut self.states
    }
}
