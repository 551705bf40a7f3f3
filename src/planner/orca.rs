//! Optimal reciprocal collision avoidance against polygon obstacles.
//!
//! One velocity update for a single agent: build an ORCA half-plane for each
//! visible obstacle edge, then find the velocity inside the max-speed disc
//! and all half-planes closest to the preferred velocity. When the
//! half-planes have no common point, a 3-D program finds the velocity that
//! violates them least.
//!
//! The agent sits at `position` in the polygon's frame. Every half-plane is
//! stored as a directed line; permitted velocities lie to its left.

use crate::core::Point2D;
use crate::core::math::sq;

use super::obstacle::ObstaclePolygon;

/// Numerical tolerance for parallel-line tests.
const EPSILON: f32 = 0.00001;

/// Directed half-plane boundary in velocity space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrcaLine {
    /// A point on the line
    pub point: Point2D,
    /// Unit direction; the permitted side is to the left
    pub direction: Point2D,
}

/// Agent parameters for one velocity update.
#[derive(Clone, Copy, Debug)]
pub struct OrcaAgent {
    /// Position in the obstacle frame
    pub position: Point2D,
    /// Current velocity
    pub velocity: Point2D,
    /// Preferred velocity
    pub preferred: Point2D,
    /// Body radius
    pub radius: f32,
    /// Speed limit
    pub max_speed: f32,
    /// Obstacle look-ahead time
    pub time_horizon: f32,
}

/// ORCA half-planes induced by the visible edges of `polygon`.
pub fn obstacle_lines(polygon: &ObstaclePolygon, agent: &OrcaAgent) -> Vec<OrcaLine> {
    let range = agent.time_horizon * agent.max_speed + agent.radius;
    let neighbors = polygon.neighbors(agent.position, range);

    let inv_time_horizon = 1.0 / agent.time_horizon;
    let radius = agent.radius;
    let radius_sq = sq(radius);
    let velocity = agent.velocity;
    let mut lines: Vec<OrcaLine> = Vec::with_capacity(neighbors.len());

    for &(_, edge) in &neighbors {
        let mut i1 = edge;
        let mut i2 = polygon.vertex(edge).next;
        let v1 = *polygon.vertex(i1);
        let v2 = *polygon.vertex(i2);

        let rel1 = v1.point - agent.position;
        let rel2 = v2.point - agent.position;

        // Skip edges whose velocity obstacle is already excluded
        let already_covered = lines.iter().any(|line| {
            (rel1 * inv_time_horizon - line.point).cross(line.direction) - inv_time_horizon * radius
                >= -EPSILON
                && (rel2 * inv_time_horizon - line.point).cross(line.direction)
                    - inv_time_horizon * radius
                    >= -EPSILON
        });
        if already_covered {
            continue;
        }

        let dist_sq1 = rel1.length_squared();
        let dist_sq2 = rel2.length_squared();
        let obstacle_vector = v2.point - v1.point;
        let s = (-rel1).dot(obstacle_vector) / obstacle_vector.length_squared();
        let dist_sq_line = (-rel1 - obstacle_vector * s).length_squared();

        // Already colliding
        if s < 0.0 && dist_sq1 <= radius_sq {
            if v1.is_convex {
                lines.push(OrcaLine {
                    point: Point2D::ZERO,
                    direction: Point2D::new(-rel1.y, rel1.x).normalized(),
                });
            }
            continue;
        } else if s > 1.0 && dist_sq2 <= radius_sq {
            if v2.is_convex && rel2.cross(v2.unit_dir) >= 0.0 {
                lines.push(OrcaLine {
                    point: Point2D::ZERO,
                    direction: Point2D::new(-rel2.y, rel2.x).normalized(),
                });
            }
            continue;
        } else if (0.0..1.0).contains(&s) && dist_sq_line <= radius_sq {
            lines.push(OrcaLine {
                point: Point2D::ZERO,
                direction: -v1.unit_dir,
            });
            continue;
        }

        // Legs of the truncated cone. Seen obliquely, both legs come from
        // a single vertex; a reflex vertex extends the cut-off line instead.
        let (mut left_leg, mut right_leg) = if s < 0.0 && dist_sq_line <= radius_sq {
            if !v1.is_convex {
                continue;
            }
            i2 = i1;
            tangent_legs(rel1, dist_sq1, radius)
        } else if s > 1.0 && dist_sq_line <= radius_sq {
            if !v2.is_convex {
                continue;
            }
            i1 = i2;
            tangent_legs(rel2, dist_sq2, radius)
        } else {
            let left = if v1.is_convex {
                tangent_legs(rel1, dist_sq1, radius).0
            } else {
                -v1.unit_dir
            };
            let right = if v2.is_convex {
                tangent_legs(rel2, dist_sq2, radius).1
            } else {
                v1.unit_dir
            };
            (left, right)
        };

        let o1 = *polygon.vertex(i1);
        let o2 = *polygon.vertex(i2);
        let single_vertex = i1 == i2;

        // A leg pointing into the neighbouring edge is replaced by that edge
        let left_neighbor = *polygon.vertex(o1.prev);
        let mut left_foreign = false;
        let mut right_foreign = false;
        if o1.is_convex && left_leg.cross(-left_neighbor.unit_dir) >= 0.0 {
            left_leg = -left_neighbor.unit_dir;
            left_foreign = true;
        }
        if o2.is_convex && right_leg.cross(o2.unit_dir) <= 0.0 {
            right_leg = o2.unit_dir;
            right_foreign = true;
        }

        let left_cutoff = (o1.point - agent.position) * inv_time_horizon;
        let right_cutoff = (o2.point - agent.position) * inv_time_horizon;
        let cutoff_vec = right_cutoff - left_cutoff;

        let t = if single_vertex {
            0.5
        } else {
            (velocity - left_cutoff).dot(cutoff_vec) / cutoff_vec.length_squared()
        };
        let t_left = (velocity - left_cutoff).dot(left_leg);
        let t_right = (velocity - right_cutoff).dot(right_leg);

        if (t < 0.0 && t_left < 0.0) || (single_vertex && t_left < 0.0 && t_right < 0.0) {
            let unit_w = (velocity - left_cutoff).normalized();
            lines.push(OrcaLine {
                direction: Point2D::new(unit_w.y, -unit_w.x),
                point: left_cutoff + unit_w * (radius * inv_time_horizon),
            });
            continue;
        } else if t > 1.0 && t_right < 0.0 {
            let unit_w = (velocity - right_cutoff).normalized();
            lines.push(OrcaLine {
                direction: Point2D::new(unit_w.y, -unit_w.x),
                point: right_cutoff + unit_w * (radius * inv_time_horizon),
            });
            continue;
        }

        let dist_sq_cutoff = if !(0.0..=1.0).contains(&t) || single_vertex {
            f32::INFINITY
        } else {
            (velocity - (left_cutoff + cutoff_vec * t)).length_squared()
        };
        let dist_sq_left = if t_left < 0.0 {
            f32::INFINITY
        } else {
            (velocity - (left_cutoff + left_leg * t_left)).length_squared()
        };
        let dist_sq_right = if t_right < 0.0 {
            f32::INFINITY
        } else {
            (velocity - (right_cutoff + right_leg * t_right)).length_squared()
        };

        if dist_sq_cutoff <= dist_sq_left && dist_sq_cutoff <= dist_sq_right {
            let direction = -o1.unit_dir;
            lines.push(OrcaLine {
                direction,
                point: left_cutoff + direction.perp() * (radius * inv_time_horizon),
            });
        } else if dist_sq_left <= dist_sq_right {
            if left_foreign {
                continue;
            }
            lines.push(OrcaLine {
                direction: left_leg,
                point: left_cutoff + left_leg.perp() * (radius * inv_time_horizon),
            });
        } else {
            if right_foreign {
                continue;
            }
            let direction = -right_leg;
            lines.push(OrcaLine {
                direction,
                point: right_cutoff + direction.perp() * (radius * inv_time_horizon),
            });
        }
    }

    lines
}

/// Left and right tangent directions from the agent to a vertex disc.
fn tangent_legs(rel: Point2D, dist_sq: f32, radius: f32) -> (Point2D, Point2D) {
    let leg = (dist_sq - sq(radius)).max(0.0).sqrt();
    let left = Point2D::new(rel.x * leg - rel.y * radius, rel.x * radius + rel.y * leg) * (1.0 / dist_sq);
    let right =
        Point2D::new(rel.x * leg + rel.y * radius, -rel.x * radius + rel.y * leg) * (1.0 / dist_sq);
    (left, right)
}

/// Velocity closest to the preferred one that satisfies every line, or
/// failing that the least-violating one.
pub fn solve(lines: &[OrcaLine], max_speed: f32, preferred: Point2D) -> Point2D {
    let mut result = Point2D::ZERO;
    let failed = linear_program2(lines, max_speed, preferred, false, &mut result);
    if failed < lines.len() {
        linear_program3(lines, lines.len(), failed, max_speed, &mut result);
    }
    result
}

/// One ORCA step: half-planes from `polygon`, then [`solve`].
pub fn compute_new_velocity(polygon: &ObstaclePolygon, agent: &OrcaAgent) -> Point2D {
    let lines = obstacle_lines(polygon, agent);
    solve(&lines, agent.max_speed, agent.preferred)
}

/// Optimize along line `line_no` subject to the earlier lines and the disc.
fn linear_program1(
    lines: &[OrcaLine],
    line_no: usize,
    radius: f32,
    opt_velocity: Point2D,
    direction_opt: bool,
    result: &mut Point2D,
) -> bool {
    let line = lines[line_no];
    let dot_product = line.point.dot(line.direction);
    let discriminant = sq(dot_product) + sq(radius) - line.point.length_squared();

    if discriminant < 0.0 {
        // Max-speed disc misses the line entirely
        return false;
    }

    let sqrt_discriminant = discriminant.sqrt();
    let mut t_left = -dot_product - sqrt_discriminant;
    let mut t_right = -dot_product + sqrt_discriminant;

    for other in &lines[..line_no] {
        let denominator = line.direction.cross(other.direction);
        let numerator = other.direction.cross(line.point - other.point);

        if denominator.abs() <= EPSILON {
            // Parallel lines
            if numerator < 0.0 {
                return false;
            }
            continue;
        }

        let t = numerator / denominator;
        if denominator >= 0.0 {
            t_right = t_right.min(t);
        } else {
            t_left = t_left.max(t);
        }

        if t_left > t_right {
            return false;
        }
    }

    *result = if direction_opt {
        if opt_velocity.dot(line.direction) > 0.0 {
            line.point + line.direction * t_right
        } else {
            line.point + line.direction * t_left
        }
    } else {
        let t = line.direction.dot(opt_velocity - line.point);
        if t < t_left {
            line.point + line.direction * t_left
        } else if t > t_right {
            line.point + line.direction * t_right
        } else {
            line.point + line.direction * t
        }
    };

    true
}

/// Returns the index of the first line that could not be satisfied, or
/// `lines.len()` on success.
fn linear_program2(
    lines: &[OrcaLine],
    radius: f32,
    opt_velocity: Point2D,
    direction_opt: bool,
    result: &mut Point2D,
) -> usize {
    *result = if direction_opt {
        opt_velocity * radius
    } else if opt_velocity.length_squared() > sq(radius) {
        opt_velocity.normalized() * radius
    } else {
        opt_velocity
    };

    for (i, line) in lines.iter().enumerate() {
        if line.direction.cross(line.point - *result) > 0.0 {
            let previous = *result;
            if !linear_program1(lines, i, radius, opt_velocity, direction_opt, result) {
                *result = previous;
                return i;
            }
        }
    }

    lines.len()
}

/// Minimize the maximum violation over lines `begin_line..`, keeping the
/// first `num_obstacle_lines` hard.
fn linear_program3(
    lines: &[OrcaLine],
    num_obstacle_lines: usize,
    begin_line: usize,
    radius: f32,
    result: &mut Point2D,
) {
    let mut distance = 0.0_f32;

    for i in begin_line..lines.len() {
        let line_i = lines[i];
        if line_i.direction.cross(line_i.point - *result) <= distance {
            continue;
        }

        let mut projected: Vec<OrcaLine> = lines[..num_obstacle_lines].to_vec();
        for line_j in lines.iter().take(i).skip(num_obstacle_lines) {
            let determinant = line_i.direction.cross(line_j.direction);
            let point = if determinant.abs() <= EPSILON {
                if line_i.direction.dot(line_j.direction) > 0.0 {
                    // Same direction
                    continue;
                }
                (line_i.point + line_j.point) * 0.5
            } else {
                line_i.point
                    + line_i.direction
                        * (line_j.direction.cross(line_i.point - line_j.point) / determinant)
            };
            projected.push(OrcaLine {
                point,
                direction: (line_j.direction - line_i.direction).normalized(),
            });
        }

        let previous = *result;
        if linear_program2(&projected, radius, line_i.direction.perp(), true, result)
            < projected.len()
        {
            // Can only fail through rounding; keep the previous best
            *result = previous;
        }

        distance = line_i.direction.cross(line_i.point - *result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Signed violation of `line` by `velocity`; positive means outside.
    fn violation(line: &OrcaLine, velocity: Point2D) -> f32 {
        line.direction.cross(line.point - velocity)
    }

    #[test]
    fn test_no_lines_keeps_preferred() {
        let v = solve(&[], 10.0, Point2D::new(3.0, 4.0));
        assert_relative_eq!(v.x, 3.0);
        assert_relative_eq!(v.y, 4.0);
    }

    #[test]
    fn test_preferred_clamped_to_disc() {
        let v = solve(&[], 1.0, Point2D::new(3.0, 4.0));
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_single_half_plane_projection() {
        // Line x = 1 pointing +y: permitted side is x < 1
        let line = OrcaLine {
            point: Point2D::new(1.0, 0.0),
            direction: Point2D::new(0.0, 1.0),
        };
        let v = solve(&[line], 10.0, Point2D::new(5.0, 0.0));
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(v.y, 0.0, epsilon = 1e-5);
        assert!(violation(&line, v) <= 1e-5);
    }

    #[test]
    fn test_infeasible_falls_back_to_least_violation() {
        // x <= -1 and x >= 1 cannot both hold
        let lines = [
            OrcaLine {
                point: Point2D::new(-1.0, 0.0),
                direction: Point2D::new(0.0, 1.0),
            },
            OrcaLine {
                point: Point2D::new(1.0, 0.0),
                direction: Point2D::new(0.0, -1.0),
            },
        ];
        let v = solve(&lines, 10.0, Point2D::new(0.0, 0.0));
        assert!(v.x.is_finite() && v.y.is_finite());
        assert!(v.x.abs() <= 1.0 + 1e-4);
    }

    #[test]
    fn test_wall_ahead_slows_agent() {
        // Large clockwise box, agent near the right wall, wanting to move into it
        let poly = ObstaclePolygon::from_vertices(&[
            Point2D::new(20.0, 100.0),
            Point2D::new(20.0, -100.0),
            Point2D::new(-100.0, -100.0),
            Point2D::new(-100.0, 100.0),
        ]);
        let agent = OrcaAgent {
            position: Point2D::ZERO,
            velocity: Point2D::ZERO,
            preferred: Point2D::new(100.0, 0.0),
            radius: 10.0,
            max_speed: 100.0,
            time_horizon: 1.5,
        };
        let v = compute_new_velocity(&poly, &agent);
        assert!(v.x < 100.0);
        // Never heads through the wall within the horizon
        assert!(v.x * agent.time_horizon <= 20.0 - agent.radius + 1e-2);
    }
}
