//! Line segment and circle primitives used by ray queries.

use serde::{Deserialize, Serialize};

use super::point::Point2D;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment2D {
    /// Start point
    pub start: Point2D,
    /// End point
    pub end: Point2D,
}

impl Segment2D {
    /// Create a new segment
    #[inline]
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Direction vector (end - start), not normalized
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Segment length
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    #[inline]
    pub fn point_at(&self, t: f32) -> Point2D {
        self.start + self.direction() * t
    }

    /// Intersection with another segment as a fraction along `self`.
    ///
    /// Returns `t` in [0, 1] such that `self.point_at(t)` lies on `other`,
    /// or `None` when the segments do not cross or are parallel.
    pub fn intersect_fraction(&self, other: &Segment2D) -> Option<f32> {
        let d1 = self.direction();
        let d2 = other.direction();

        let cross = d1.cross(d2);
        if cross.abs() < f32::EPSILON {
            return None;
        }

        let origin_diff = other.start - self.start;
        let t = origin_diff.cross(d2) / cross;
        let s = origin_diff.cross(d1) / cross;

        if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&s) {
            Some(t)
        } else {
            None
        }
    }

    /// First entry into a circle as a fraction along `self`.
    ///
    /// A segment starting inside (or on) the circle never enters it and
    /// reports `None`, so a ray cast from an agent's own rim skips its body.
    pub fn circle_fraction(&self, center: Point2D, radius: f32) -> Option<f32> {
        let d = self.direction();
        let f = self.start - center;

        let a = d.length_squared();
        let c = f.length_squared() - radius * radius;
        if c <= 0.0 || a <= f32::EPSILON {
            return None;
        }

        let b = 2.0 * f.dot(d);
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()) / (2.0 * a);
        (0.0..=1.0).contains(&t).then_some(t)
    }

    /// Squared distance from a point to this segment
    pub fn distance_squared_to_point(&self, point: Point2D) -> f32 {
        let d = self.direction();
        let len_sq = d.length_squared();
        if len_sq <= f32::EPSILON {
            return point.distance_squared(&self.start);
        }
        let t = ((point - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        point.distance_squared(&self.point_at(t))
    }
}
