//! What the device page and the dashboard show for a given device snapshot.
//!
//! Everything in here is a pure function of its inputs so that the GUI only has to lay
//! things out.

pub mod aqi;
pub mod dashboard;
pub mod device;

/// Colour family of a badge, ring or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Warning,
    Danger,
    Neutral,
}

impl Tone {
    pub fn hex(&self) -> &'static str {
        match self {
            Tone::Positive => "#00E676",
            Tone::Warning => "#FACC15",
            Tone::Danger => "#EF4444",
            Tone::Neutral => "#9CA3AF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: &'static str,
    pub tone: Tone,
}

impl Badge {
    pub fn connection(is_connected: bool) -> Self {
        if is_connected {
            Badge { label: "Online", tone: Tone::Positive }
        } else {
            Badge { label: "Offline", tone: Tone::Danger }
        }
    }
}
