//! Local obstacle polygon built from fan end points.
//!
//! All fan end points form one closed polygon with vertices in clockwise
//! order. Seen from the agent at the origin this is a "negative" obstacle:
//! the agent sits inside it and every edge faces inward.

use crate::core::Point2D;
use crate::core::math::sq;

/// One polygon vertex and the edge leaving it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleVertex {
    /// Vertex position (agent frame)
    pub point: Point2D,
    /// Unit direction of the edge towards the next vertex
    pub unit_dir: Point2D,
    /// Whether the polygon is convex at this vertex
    pub is_convex: bool,
    /// Index of the next vertex
    pub next: usize,
    /// Index of the previous vertex
    pub prev: usize,
}

/// Closed obstacle polygon.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstaclePolygon {
    vertices: Vec<ObstacleVertex>,
}

/// Signed area test: positive when `c` is left of the line `a -> b`.
#[inline]
pub(crate) fn left_of(a: Point2D, b: Point2D, c: Point2D) -> f32 {
    (a - c).cross(b - a)
}

/// Squared distance from `c` to segment `a -> b`.
pub(crate) fn dist_sq_point_segment(a: Point2D, b: Point2D, c: Point2D) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (c - a).length_squared();
    }
    let r = (c - a).dot(ab) / len_sq;
    if r < 0.0 {
        (c - a).length_squared()
    } else if r > 1.0 {
        (c - b).length_squared()
    } else {
        (c - (a + ab * r)).length_squared()
    }
}

impl ObstaclePolygon {
    /// Build a polygon from vertices given in order.
    ///
    /// Fewer than two vertices produce an empty polygon.
    pub fn from_vertices(points: &[Point2D]) -> Self {
        let n = points.len();
        if n < 2 {
            return Self::default();
        }

        let vertices = (0..n)
            .map(|i| {
                let prev = (i + n - 1) % n;
                let next = (i + 1) % n;
                let is_convex = n == 2 || left_of(points[prev], points[i], points[next]) >= 0.0;
                ObstacleVertex {
                    point: points[i],
                    unit_dir: (points[next] - points[i]).normalized(),
                    is_convex,
                    next,
                    prev,
                }
            })
            .collect();

        Self { vertices }
    }

    /// Build the polygon from agent-frame end points, sorting them
    /// clockwise (descending bearing). Equal bearings keep input order.
    pub fn from_scan_points(mut points: Vec<Point2D>) -> Self {
        points.sort_by(|a, b| b.angle().total_cmp(&a.angle()));
        Self::from_vertices(&points)
    }

    /// Vertices
    #[inline]
    pub fn vertices(&self) -> &[ObstacleVertex] {
        &self.vertices
    }

    /// Vertex `index`
    #[inline]
    pub fn vertex(&self, index: usize) -> &ObstacleVertex {
        &self.vertices[index]
    }

    /// True when the polygon has no edges
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges (by start vertex index) the agent at `position` can see within
    /// `range`, nearest first.
    ///
    /// An edge is visible when the agent lies strictly to its right.
    pub fn neighbors(&self, position: Point2D, range: f32) -> Vec<(f32, usize)> {
        let range_sq = sq(range);
        let mut found: Vec<(f32, usize)> = self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                let next = self.vertices[v.next].point;
                if left_of(v.point, next, position) >= 0.0 {
                    return None;
                }
                let dist_sq = dist_sq_point_segment(v.point, next, position);
                (dist_sq < range_sq).then_some((dist_sq, i))
            })
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found
    }
}
