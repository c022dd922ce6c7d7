use iced::{Color, Point, Rectangle, Renderer, Theme, mouse};
use iced::widget::canvas::{Frame, Geometry, LineCap, Path, Program, Stroke};

use crate::gui::style::tone_color;
use crate::view::Tone;
use crate::view::aqi::{AqiRing, RING_STROKE_WIDTH};

const ARC_SEGMENTS: usize = 96;

/// The dashboard's AQI ring: a faint full track with the swept part stroked on top.
pub struct AqiRingProgram(pub AqiRing);

impl<Message> Program<Message> for AqiRingProgram {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let ring = &self.0;

        let track = Path::circle(center, ring.radius);
        frame.stroke(
            &track,
            Stroke::default()
                .with_color(Color { a: 0.05, ..Color::WHITE })
                .with_width(RING_STROKE_WIDTH),
        );

        let points = ring.arc_points(ARC_SEGMENTS);
        if let Some((&(x, y), rest)) = points.split_first() {
            let arc = Path::new(|builder| {
                builder.move_to(Point::new(center.x + x, center.y + y));
                for &(x, y) in rest {
                    builder.line_to(Point::new(center.x + x, center.y + y));
                }
            });

            frame.stroke(
                &arc,
                Stroke::default()
                    .with_color(tone_color(ring.tone))
                    .with_width(RING_STROKE_WIDTH)
                    .with_line_cap(LineCap::Round),
            );
        }

        vec![frame.into_geometry()]
    }
}

/// Device artwork: a dot, surrounded by concentric rings while `pulsing`.
pub struct PulseProgram {
    pub tone: Tone,
    pub pulsing: bool,
}

impl<Message> Program<Message> for PulseProgram {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let center = frame.center();
        let max_radius = bounds.width.min(bounds.height) / 2.0 - 1.0;
        let color = tone_color(self.tone);

        frame.fill(&Path::circle(center, max_radius / 4.0), color);

        if self.pulsing {
            for (i, alpha) in [0.4, 0.2, 0.08].into_iter().enumerate() {
                let radius = max_radius * (2 + i) as f32 / 4.0;
                frame.stroke(
                    &Path::circle(center, radius),
                    Stroke::default()
                        .with_color(Color { a: alpha, ..color })
                        .with_width(1.5),
                );
            }
        }

        vec![frame.into_geometry()]
    }
}
