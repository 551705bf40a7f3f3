//! 2D point/vector type shared by sensing, geometry and the planner.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 2D point or free vector in world units.
///
/// The same type is used for world positions, agent-frame hit points and
/// velocities; the frame is always implied by the call site.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate (forward in the agent frame)
    pub x: f32,
    /// Y coordinate (left in the agent frame)
    pub y: f32,
}

impl Point2D {
    /// Origin
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing at `angle`
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin)
    }

    /// Point at polar coordinates (distance, angle) from the origin
    #[inline]
    pub fn from_polar(distance: f32, angle: f32) -> Self {
        Self::from_angle(angle) * distance
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        (*other - *self).length()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        (*other - *self).length_squared()
    }

    /// Angle from this point to another (radians, CCW from +X)
    #[inline]
    pub fn angle_to(&self, other: &Point2D) -> f32 {
        let d = *other - *self;
        d.y.atan2(d.x)
    }

    /// Angle of this vector (radians, CCW from +X)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Rotate around the origin by angle (radians)
    #[inline]
    pub fn rotate(&self, angle: f32) -> Point2D {
        let (sin, cos) = angle.sin_cos();
        Point2D::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Vector length
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared vector length
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or the zero vector unchanged
    #[inline]
    pub fn normalized(&self) -> Point2D {
        let len = self.length();
        if len > 0.0 {
            Point2D::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Counter-clockwise perpendicular (-y, x)
    #[inline]
    pub fn perp(&self) -> Point2D {
        Point2D::new(-self.y, self.x)
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (z-component of the 3D cross product)
    #[inline]
    pub fn cross(&self, other: Point2D) -> f32 {
        self.x * other.y - self.y * other.x
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point2D::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point2D::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Point2D::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Point2D::new(-self.x, -self.y)
    }
}
