//! 2D pose type for agent position and heading.

use serde::{Deserialize, Serialize};

use super::math::normalize_angle;
use super::point::Point2D;

/// A 2D pose: position plus heading.
///
/// Heading is stored normalized to [-π, π), counter-clockwise from +X.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Heading angle in radians [-π, π)
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose. `theta` is normalized to [-π, π).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// Origin, facing +X.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position as a point
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Unit vector along the heading
    #[inline]
    pub fn forward(self) -> Point2D {
        Point2D::from_angle(self.theta)
    }

    /// Transform a point from this pose's local frame to the world frame.
    #[inline]
    pub fn transform_point(self, point: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: self.x + point.x * cos - point.y * sin,
            y: self.y + point.x * sin + point.y * cos,
        }
    }

    /// Transform a point from the world frame to this pose's local frame.
    #[inline]
    pub fn inverse_transform_point(self, point: Point2D) -> Point2D {
        self.inverse_rotate(point - self.position())
    }

    /// Rotate a world-frame vector into this pose's frame (no translation).
    ///
    /// Used for velocities, which are free vectors.
    #[inline]
    pub fn inverse_rotate(self, vector: Point2D) -> Point2D {
        let (sin, cos) = self.theta.sin_cos();
        Point2D {
            x: vector.x * cos + vector.y * sin,
            y: -vector.x * sin + vector.y * cos,
        }
    }
}
