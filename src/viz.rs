//! Debug drawing hook.
//!
//! Controllers may emit lines and circles describing their decision (target
//! bearing, chosen velocity, span bisector). Primitives are in the agent
//! frame; the renderer places them. Drawing never changes a returned command.

use crate::core::Point2D;

/// RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Red
    pub const RED: Rgb = Rgb(255, 0, 0);
    /// Green
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    /// Blue
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    /// Yellow
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    /// White
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Magenta
    pub const MAGENTA: Rgb = Rgb(255, 0, 127);
}

/// A single debug primitive in the agent frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DebugPrimitive {
    /// Line segment
    Line {
        /// Start point
        from: Point2D,
        /// End point
        to: Point2D,
        /// Colour
        color: Rgb,
    },
    /// Circle outline
    Circle {
        /// Centre
        center: Point2D,
        /// Radius
        radius: f32,
        /// Colour
        color: Rgb,
    },
}

/// Receiver of debug primitives.
pub trait DebugSink {
    /// Record one primitive.
    fn draw(&mut self, primitive: DebugPrimitive);

    /// Whether primitives are kept at all. Callers may skip building them
    /// when this is false.
    fn enabled(&self) -> bool {
        true
    }

    /// Line from the agent centre along `angle` for `length`.
    fn bearing(&mut self, angle: f32, length: f32, color: Rgb) {
        if self.enabled() {
            self.draw(DebugPrimitive::Line {
                from: Point2D::ZERO,
                to: Point2D::from_polar(length, angle),
                color,
            });
        }
    }

    /// Line from the agent centre to `to`.
    fn line_to(&mut self, to: Point2D, color: Rgb) {
        if self.enabled() {
            self.draw(DebugPrimitive::Line {
                from: Point2D::ZERO,
                to,
                color,
            });
        }
    }

    /// Circle centred on `center`.
    fn circle(&mut self, center: Point2D, radius: f32, color: Rgb) {
        if self.enabled() {
            self.draw(DebugPrimitive::Circle {
                center,
                radius,
                color,
            });
        }
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn draw(&mut self, _primitive: DebugPrimitive) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Keeps every primitive, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    primitives: Vec<DebugPrimitive>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded primitives
    pub fn primitives(&self) -> &[DebugPrimitive] {
        &self.primitives
    }

    /// Drop all recorded primitives
    pub fn clear(&mut self) {
        self.primitives.clear();
    }
}

impl DebugSink for RecordingSink {
    fn draw(&mut self, primitive: DebugPrimitive) {
        self.primitives.push(primitive);
    }
}
