use crate::device::types::{CalibrationPhase, DeviceSnapshot};
use crate::view::aqi::{AqiCategory, AqiRing};
use crate::view::{Badge, Tone};

/**
 * Fixed readings on the dashboard tiles.
 */
pub const PM25_UG_PER_M3: u16 = 12;
pub const HUMIDITY_PERCENT: u8 = 78;

pub const FORECAST_STATION: &str = "KLCC Station";

/// One column of the hourly forecast strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastSlot {
    pub label: &'static str,
    pub aqi: u16,
    pub tone: Tone,
    // drawn at full strength, the other slots are faded
    pub highlighted: bool,
}

/**
 * Fixed forecast, the readings are not derived from the live AQI.
 */
pub const HOURLY_FORECAST: [ForecastSlot; 4] = [
    ForecastSlot { label: "Now", aqi: 12, tone: Tone::Positive, highlighted: true },
    ForecastSlot { label: "10 AM", aqi: 15, tone: Tone::Positive, highlighted: false },
    ForecastSlot { label: "11 AM", aqi: 45, tone: Tone::Warning, highlighted: true },
    ForecastSlot { label: "12 PM", aqi: 12, tone: Tone::Positive, highlighted: false },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrateButton {
    Ready,
    Running,
    Succeeded,
}

impl CalibrateButton {
    pub fn enabled(&self) -> bool {
        *self == CalibrateButton::Ready
    }
}

/// The dashboard, combining the device state with the latest AQI reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub badge: Badge,
    pub sync_spinning: bool,
    pub calibrate: CalibrateButton,
    pub aqi: u16,
    pub category: AqiCategory,
    pub ring: AqiRing,
    pub pm25: u16,
    pub humidity: u8,
    pub last_synced: String,
    pub forecast: &'static [ForecastSlot],
}

impl DashboardView {
    pub fn new(snapshot: &DeviceSnapshot, aqi: u16) -> Self {
        let calibrate = match snapshot.calibration() {
            CalibrationPhase::Idle => CalibrateButton::Ready,
            CalibrationPhase::Calibrating => CalibrateButton::Running,
            CalibrationPhase::Succeeded => CalibrateButton::Succeeded,
        };

        let last_synced = match snapshot.last_synced_at() {
            Some(time) => humantime::format_rfc3339_seconds(time).to_string(),
            None => "Never".to_string(),
        };

        DashboardView {
            badge: Badge::connection(snapshot.is_connected()),
            sync_spinning: snapshot.is_syncing(),
            calibrate,
            aqi,
            category: AqiCategory::from_aqi(aqi),
            ring: AqiRing::new(aqi),
            pm25: PM25_UG_PER_M3,
            humidity: HUMIDITY_PERCENT,
            last_synced,
            forecast: &HOURLY_FORECAST,
        }
    }

    pub fn headline(&self) -> String {
        format!("{} Air Quality", self.category)
    }

    pub fn sync_label(&self) -> &'static str {
        if self.sync_spinning { "Syncing…" } else { "Sync" }
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::config::types::DeviceSeed;

    fn snapshot(connected: bool) -> DeviceSnapshot {
        DeviceSnapshot::from_seed(&DeviceSeed { connected, battery_level: 84 }, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn online_and_idle() {
        let view = DashboardView::new(&snapshot(true), 42);

        assert_eq!(view.badge, Badge { label: "Online", tone: Tone::Positive });
        assert!(!view.sync_spinning);
        assert_eq!(view.calibrate, CalibrateButton::Ready);
        assert!(view.calibrate.enabled());
        assert_eq!(view.headline(), "Good Air Quality");
        assert_eq!(view.last_synced, "1970-01-01T00:00:00Z");
        assert_eq!((view.pm25, view.humidity), (12, 78));
    }

    #[test]
    fn offline_badge() {
        let view = DashboardView::new(&snapshot(false), 42);
        assert_eq!(view.badge, Badge { label: "Offline", tone: Tone::Danger });
    }

    #[test]
    fn calibrate_button_follows_the_phase() {
        let mut state = snapshot(true);

        state.calibration = CalibrationPhase::Calibrating;
        let view = DashboardView::new(&state, 42);
        assert_eq!(view.calibrate, CalibrateButton::Running);
        assert!(!view.calibrate.enabled());

        state.calibration = CalibrationPhase::Succeeded;
        let view = DashboardView::new(&state, 42);
        assert_eq!(view.calibrate, CalibrateButton::Succeeded);
        assert!(!view.calibrate.enabled());
    }

    #[test]
    fn syncing_and_never_synced() {
        let mut state = snapshot(true);
        state.is_syncing = true;
        state.last_synced_at = None;

        let view = DashboardView::new(&state, 53);
        assert!(view.sync_spinning);
        assert_eq!(view.sync_label(), "Syncing…");
        assert_eq!(view.last_synced, "Never");
        assert_eq!(view.headline(), "Moderate Air Quality");
    }

    #[test]
    fn forecast_strip_is_static() {
        let quiet = DashboardView::new(&snapshot(true), 35);
        let busy = DashboardView::new(&snapshot(false), 55);
        assert_eq!(quiet.forecast, busy.forecast);
        assert_eq!(quiet.sync_label(), "Sync");

        let labels: Vec<_> = quiet.forecast.iter().map(|slot| (slot.label, slot.aqi)).collect();
        assert_eq!(labels, [("Now", 12), ("10 AM", 15), ("11 AM", 45), ("12 PM", 12)]);

        // 45 is still "Good", the 11 AM slot is flagged regardless
        let warning = quiet.forecast[2];
        assert_eq!(warning.tone, Tone::Warning);
        assert_eq!(AqiCategory::from_aqi(warning.aqi), AqiCategory::Good);
        assert!(warning.highlighted);
    }
}
