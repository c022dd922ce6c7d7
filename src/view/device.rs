use crate::config::types::Preferences;
use crate::device::constants::{DEVICE_NAME, HOST_NAME};
use crate::device::types::{ConnectionPhase, DeviceSnapshot};
use crate::view::{Badge, Tone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    Scan { enabled: bool, label: &'static str },
    Disconnect,
}

/// The device page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceView {
    pub title: &'static str,
    pub status_line: String,
    // only shown while connected
    pub badge: Option<Badge>,
    pub battery_level: Option<u8>,
    pub action: DeviceAction,
    // artwork is greyed out while disconnected
    pub dimmed: bool,
    // pulse ring around the artwork while scanning or connected
    pub pulsing: bool,
    pub preferences: Preferences,
}

impl DeviceView {
    /// Colour of the artwork and its pulse ring.
    pub fn artwork_tone(&self) -> Tone {
        if self.dimmed {
            Tone::Neutral
        } else {
            Tone::Positive
        }
    }

    pub fn new(snapshot: &DeviceSnapshot, preferences: Preferences) -> Self {
        let phase = snapshot.connection_phase();

        let status_line = match phase {
            ConnectionPhase::Scanning => "Searching nearby...".to_string(),
            ConnectionPhase::Connected => format!("Connected to {}", HOST_NAME),
            ConnectionPhase::Disconnected => "Not Connected".to_string(),
        };

        let action = if snapshot.is_connected() {
            DeviceAction::Disconnect
        } else if snapshot.is_scanning() {
            DeviceAction::Scan { enabled: false, label: "Scanning..." }
        } else {
            DeviceAction::Scan { enabled: true, label: "Scan for Device" }
        };

        DeviceView {
            title: DEVICE_NAME,
            status_line,
            badge: snapshot.is_connected().then(|| Badge::connection(true)),
            battery_level: snapshot.is_connected().then(|| snapshot.battery_level()),
            action,
            dimmed: !snapshot.is_connected(),
            pulsing: snapshot.is_connected() || snapshot.is_scanning(),
            preferences,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::config::types::DeviceSeed;

    fn snapshot(connected: bool, scanning: bool) -> DeviceSnapshot {
        let mut snapshot = DeviceSnapshot::from_seed(
            &DeviceSeed { connected, battery_level: 84 },
            SystemTime::UNIX_EPOCH,
        );
        snapshot.is_scanning = scanning;
        snapshot
    }

    #[test]
    fn connected() {
        let view = DeviceView::new(&snapshot(true, false), Preferences::default());

        assert_eq!(view.title, "AirSense Clip");
        assert_eq!(view.status_line, "Connected to iPhone 14 Pro");
        assert_eq!(view.badge.as_ref().map(|badge| badge.label), Some("Online"));
        assert_eq!(view.battery_level, Some(84));
        assert_eq!(view.action, DeviceAction::Disconnect);
        assert!(!view.dimmed);
        assert!(view.pulsing);
        assert_eq!(view.artwork_tone(), Tone::Positive);
    }

    #[test]
    fn disconnected() {
        let view = DeviceView::new(&snapshot(false, false), Preferences::default());

        assert_eq!(view.status_line, "Not Connected");
        assert_eq!(view.badge, None);
        assert_eq!(view.battery_level, None);
        assert_eq!(view.action, DeviceAction::Scan { enabled: true, label: "Scan for Device" });
        assert!(view.dimmed);
        assert!(!view.pulsing);
        assert_eq!(view.artwork_tone(), Tone::Neutral);
    }

    #[test]
    fn scanning() {
        let view = DeviceView::new(&snapshot(false, true), Preferences::default());

        assert_eq!(view.status_line, "Searching nearby...");
        assert_eq!(view.action, DeviceAction::Scan { enabled: false, label: "Scanning..." });
        assert!(view.dimmed);
        assert!(view.pulsing);
        assert_eq!(view.artwork_tone(), Tone::Neutral);
    }

    #[test]
    fn connect_while_scanning_offers_disconnect() {
        let view = DeviceView::new(&snapshot(true, true), Preferences::default());

        assert_eq!(view.status_line, "Searching nearby...");
        assert_eq!(view.action, DeviceAction::Disconnect);
    }
}
