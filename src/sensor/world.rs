//! World query contract and a static in-memory world.
//!
//! The physics engine that owns object geometry lives outside this crate.
//! Sensors only need two questions answered, captured by [`WorldQuery`].
//! [`StaticWorld`] answers them for a fixed set of segments and circles; it
//! is what tests and benches sense against.

use serde::{Deserialize, Serialize};

use crate::core::{Category, Point2D, Segment2D};

/// First object hit along a query segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentHit {
    /// Position of the hit along the segment, in [0, 1]
    pub fraction: f32,
    /// Category of the object hit (always a single flag)
    pub category: Category,
}

/// A landmark known to the world.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRef {
    /// Landmark centre in world frame
    pub position: Point2D,
    /// Landmark category (one of the landmark flags)
    pub category: Category,
}

/// Read-only world snapshot consumed by the sensors.
///
/// Every agent of one tick senses against the same borrowed snapshot.
///
/// # Example
///
/// ```rust,ignore
/// use jhund::sensor::{WorldQuery, StaticWorld};
///
/// let hit = world.first_hit(start, end, Category::WALL | Category::AGENT);
/// if let Some(hit) = hit {
///     println!("{} at {:.2}", hit.category.name(), hit.fraction);
/// }
/// ```
pub trait WorldQuery {
    /// Nearest object along `start -> end` whose category intersects `mask`.
    ///
    /// Objects containing `start` are not reported.
    fn first_hit(&self, start: Point2D, end: Point2D, mask: Category) -> Option<SegmentHit>;

    /// Landmark candidates near `position`.
    ///
    /// Implementations may return more than is actually in range; the
    /// landmark sensor applies the range and angle windows itself.
    fn landmarks_in_range(&self, position: Point2D) -> Vec<LandmarkRef>;
}

/// A wall-like segment obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSegment {
    /// Geometry
    pub segment: Segment2D,
    /// Category flag
    pub category: Category,
}

/// A round object: agent body, puck or landmark.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldCircle {
    /// Centre in world frame
    pub center: Point2D,
    /// Radius
    pub radius: f32,
    /// Category flag
    pub category: Category,
}

/// Fixed collection of segments and circles.
///
/// Nothing moves on its own; callers reposition circles between ticks with
/// [`StaticWorld::set_circle_center`] if they integrate motion elsewhere.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StaticWorld {
    segments: Vec<WorldSegment>,
    circles: Vec<WorldCircle>,
}

impl StaticWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment and return its index.
    pub fn add_segment(&mut self, start: Point2D, end: Point2D, category: Category) -> usize {
        self.segments.push(WorldSegment {
            segment: Segment2D::new(start, end),
            category,
        });
        self.segments.len() - 1
    }

    /// Add a circle and return its index.
    pub fn add_circle(&mut self, center: Point2D, radius: f32, category: Category) -> usize {
        self.circles.push(WorldCircle {
            center,
            radius,
            category,
        });
        self.circles.len() - 1
    }

    /// Add an axis-aligned rectangular enclosure made of four wall segments.
    pub fn add_box(&mut self, min: Point2D, max: Point2D) {
        let corners = [
            min,
            Point2D::new(max.x, min.y),
            max,
            Point2D::new(min.x, max.y),
        ];
        for i in 0..corners.len() {
            self.add_segment(corners[i], corners[(i + 1) % corners.len()], Category::WALL);
        }
    }

    /// Move circle `index`. Returns false if the index is unknown.
    pub fn set_circle_center(&mut self, index: usize, center: Point2D) -> bool {
        match self.circles.get_mut(index) {
            Some(circle) => {
                circle.center = center;
                true
            }
            None => false,
        }
    }

    /// All segments
    pub fn segments(&self) -> &[WorldSegment] {
        &self.segments
    }

    /// All circles
    pub fn circles(&self) -> &[WorldCircle] {
        &self.circles
    }
}

impl WorldQuery for StaticWorld {
    fn first_hit(&self, start: Point2D, end: Point2D, mask: Category) -> Option<SegmentHit> {
        let ray = Segment2D::new(start, end);
        let mut best: Option<SegmentHit> = None;

        let segment_hits = self
            .segments
            .iter()
            .filter(|s| s.category.matches(mask))
            .filter_map(|s| {
                ray.intersect_fraction(&s.segment)
                    .map(|fraction| (fraction, s.category))
            });
        let circle_hits = self
            .circles
            .iter()
            .filter(|c| c.category.matches(mask))
            .filter_map(|c| {
                ray.circle_fraction(c.center, c.radius)
                    .map(|fraction| (fraction, c.category))
            });

        for (fraction, category) in segment_hits.chain(circle_hits) {
            if best.is_none_or(|b| fraction < b.fraction) {
                best = Some(SegmentHit { fraction, category });
            }
        }
        best
    }

    fn landmarks_in_range(&self, _position: Point2D) -> Vec<LandmarkRef> {
        self.circles
            .iter()
            .filter(|c| c.category.is_landmark())
            .map(|c| LandmarkRef {
                position: c.center,
                category: c.category,
            })
            .collect()
    }
}
