use std::time::SystemTime;

use crate::config::types::DeviceSeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationPhase {
    Idle,
    Calibrating,
    // the success indicator is on display; clears itself after the success window
    Succeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Scanning,
    Connected,
}

/// Point-in-time copy of the clip's state, as handed out to views.
///
/// Snapshots are never written back: the only way to change the state is through the
/// commands on [`crate::device::controller::DeviceController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub(crate) is_connected: bool,
    pub(crate) is_scanning: bool,
    pub(crate) is_syncing: bool,
    pub(crate) battery_level: u8,
    pub(crate) last_synced_at: Option<SystemTime>,
    pub(crate) calibration: CalibrationPhase,
}

impl DeviceSnapshot {
    pub fn from_seed(seed: &DeviceSeed, started_at: SystemTime) -> Self {
        DeviceSnapshot {
            is_connected: seed.connected,
            is_scanning: false,
            is_syncing: false,
            battery_level: seed.battery_level,
            last_synced_at: Some(started_at),
            calibration: CalibrationPhase::Idle,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_scanning(&self) -> bool {
        self.is_scanning
    }

    pub fn is_syncing(&self) -> bool {
        self.is_syncing
    }

    /// Meaningless while disconnected; views should hide it.
    pub fn battery_level(&self) -> u8 {
        self.battery_level
    }

    pub fn last_synced_at(&self) -> Option<SystemTime> {
        self.last_synced_at
    }

    pub fn calibration(&self) -> CalibrationPhase {
        self.calibration
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration == CalibrationPhase::Calibrating
    }

    pub fn calibration_succeeded(&self) -> bool {
        self.calibration == CalibrationPhase::Succeeded
    }

    /// A scan in flight wins over the connected flag, `connect()` may land while a scan is
    /// still running.
    pub fn connection_phase(&self) -> ConnectionPhase {
        if self.is_scanning {
            ConnectionPhase::Scanning
        } else if self.is_connected {
            ConnectionPhase::Connected
        } else {
            ConnectionPhase::Disconnected
        }
    }
}

#[derive(Debug, Clone)]
pub enum DeviceEvent {
    StateChange(DeviceSnapshot),
}
