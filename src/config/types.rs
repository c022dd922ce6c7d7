use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::device::constants::{
    CALIBRATION_DELAY, CALIBRATION_SUCCESS_WINDOW, DEFAULT_BATTERY_LEVEL, MAX_BATTERY_LEVEL, SCAN_DELAY, SYNC_DELAY,
};
use crate::error::ConfigError;
use crate::sim::constants::{AQI_INITIAL, AQI_MAX, AQI_MIN, AQI_TICK};

/// The state the clip is in when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceSeed {
    pub connected: bool,
    pub battery_level: u8,
}

impl Default for DeviceSeed {
    fn default() -> Self {
        DeviceSeed {
            connected: true,
            battery_level: DEFAULT_BATTERY_LEVEL,
        }
    }
}

/// Fixed delays (milliseconds) of the simulated device operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    pub scan_ms: u64,
    pub sync_ms: u64,
    pub calibration_ms: u64,
    pub calibration_success_ms: u64,
}

impl Timings {
    pub fn scan(&self) -> Duration {
        Duration::from_millis(self.scan_ms)
    }

    pub fn sync(&self) -> Duration {
        Duration::from_millis(self.sync_ms)
    }

    pub fn calibration(&self) -> Duration {
        Duration::from_millis(self.calibration_ms)
    }

    pub fn calibration_success(&self) -> Duration {
        Duration::from_millis(self.calibration_success_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            scan_ms: SCAN_DELAY,
            sync_ms: SYNC_DELAY,
            calibration_ms: CALIBRATION_DELAY,
            calibration_success_ms: CALIBRATION_SUCCESS_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AirQualityConfig {
    pub initial: u16,
    pub min: u16,
    pub max: u16,
    pub tick_ms: u64,
}

impl AirQualityConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        AirQualityConfig {
            initial: AQI_INITIAL,
            min: AQI_MIN,
            max: AQI_MAX,
            tick_ms: AQI_TICK,
        }
    }
}

/// Switches on the device page. They only live for the session, the file provides the
/// starting position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub bluetooth: bool,
    pub auto_sync: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            bluetooth: true,
            auto_sync: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub device: DeviceSeed,
    pub timings: Timings,
    pub air_quality: AirQualityConfig,
    pub preferences: Preferences,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.battery_level > MAX_BATTERY_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "device.batteryLevel",
                reason: format!("{} is not a percentage", self.device.battery_level),
            });
        }

        let aqi = &self.air_quality;
        if aqi.min > aqi.max {
            return Err(ConfigError::InvalidValue {
                field: "airQuality.min",
                reason: format!("lower bound {} exceeds upper bound {}", aqi.min, aqi.max),
            });
        }
        if aqi.initial < aqi.min || aqi.initial > aqi.max {
            return Err(ConfigError::InvalidValue {
                field: "airQuality.initial",
                reason: format!("{} is outside [{}, {}]", aqi.initial, aqi.min, aqi.max),
            });
        }
        if aqi.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "airQuality.tickMs",
                reason: "tick must be longer than 0ms".to_string(),
            });
        }

        Ok(())
    }
}
