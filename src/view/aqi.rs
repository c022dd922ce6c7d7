use std::f32::consts::PI;

use crate::view::Tone;

pub const RING_RADIUS: f32 = 80.0;
pub const RING_STROKE_WIDTH: f32 = 10.0;
/// Width and height of the square the ring is drawn in.
pub const RING_BOX: f32 = 200.0;

/// Upper end of the ring, readings above this draw a full ring.
pub const RING_SCALE: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiCategory {
    Good,
    Moderate,
    Unhealthy,
}

impl AqiCategory {
    pub fn from_aqi(aqi: u16) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            _ => AqiCategory::Unhealthy,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            AqiCategory::Good => Tone::Positive,
            AqiCategory::Moderate => Tone::Warning,
            AqiCategory::Unhealthy => Tone::Danger,
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::Unhealthy => "Unhealthy",
        };

        write!(f, "{}", result)
    }
}

/// Stroke geometry of the dashboard's progress ring (an SVG circle drawn with a dash).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiRing {
    pub radius: f32,
    pub circumference: f32,
    // [0, 1]
    pub progress: f32,
    pub dash_offset: f32,
    pub tone: Tone,
}

impl AqiRing {
    pub fn new(aqi: u16) -> Self {
        let circumference = 2.0 * PI * RING_RADIUS;
        let progress = f32::from(aqi.min(RING_SCALE)) / f32::from(RING_SCALE);

        AqiRing {
            radius: RING_RADIUS,
            circumference,
            progress,
            dash_offset: circumference - progress * circumference,
            tone: AqiCategory::from_aqi(aqi).tone(),
        }
    }

    /// Share of the circle covered by the stroke, as left over by the dash offset.
    pub fn swept(&self) -> f32 {
        (self.circumference - self.dash_offset) / self.circumference
    }

    /// Points along the stroke relative to the ring centre, starting at 12 o'clock and going
    /// clockwise (y grows downwards). Empty when nothing is swept.
    pub fn arc_points(&self, segments: usize) -> Vec<(f32, f32)> {
        let sweep = self.swept() * 2.0 * PI;
        if segments == 0 || sweep <= 0.0 {
            return Vec::new();
        }

        (0..=segments)
            .map(|i| {
                let angle = -PI / 2.0 + sweep * i as f32 / segments as f32;
                (self.radius * angle.cos(), self.radius * angle.sin())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(100), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(101), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(51).tone().hex(), "#FACC15");
        assert_eq!(AqiCategory::Unhealthy.to_string(), "Unhealthy");
    }

    #[test]
    fn ring_geometry() {
        let ring = AqiRing::new(42);
        assert!(close(ring.circumference, 502.6548));
        assert!(close(ring.progress, 0.42));
        assert!(close(ring.dash_offset, 502.6548 * 0.58));
        assert_eq!(ring.tone, Tone::Positive);
    }

    #[test]
    fn ring_is_full_above_the_scale() {
        let ring = AqiRing::new(180);
        assert!(close(ring.progress, 1.0));
        assert!(close(ring.dash_offset, 0.0));
        assert_eq!(ring.tone, Tone::Danger);

        let empty = AqiRing::new(0);
        assert!(close(empty.dash_offset, empty.circumference));
        assert!(empty.arc_points(32).is_empty());
    }

    #[test]
    fn arc_starts_at_the_top_and_runs_clockwise() {
        let ring = AqiRing::new(25);
        assert!(close(ring.swept(), 0.25));

        let points = ring.arc_points(8);
        assert_eq!(points.len(), 9);

        let (x, y) = points[0];
        assert!(close(x, 0.0) && close(y, -RING_RADIUS));
        let (x, y) = points[8];
        assert!(close(x, RING_RADIUS) && close(y, 0.0));

        let full = AqiRing::new(100).arc_points(4);
        let (x, y) = full[4];
        assert!(close(x, 0.0) && close(y, -RING_RADIUS));
    }
}
