//! Fan-shaped virtual range sensor.
//!
//! Casts a discretized fan of rays from the agent's rim and reports, per ray,
//! the distance to the first detected object and that object's category.
//!
//! ```text
//!              angle_max (index N-1, leftmost)
//!                 \
//!                  \   ray from inner to inner + range_max
//!     agent ( o )---+----------------------->  angle 0 (forward)
//!                  /
//!                 /
//!              angle_min (index 0, rightmost)
//! ```
//!
//! `inner = agent_radius + range_min` so rays start outside the body.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_positive};
use crate::core::{Category, Point2D, Pose2D};

use super::world::WorldQuery;

const SECTION: &str = "fan";

/// Fan sensor configuration.
///
/// The detection mask has no default: a fan that detects nothing is almost
/// certainly a configuration mistake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FanSensorConfig {
    /// Number of rays (0 yields empty observations)
    #[serde(default = "defaults::number_of_rays")]
    pub number_of_rays: usize,

    /// Angle of ray 0, agent-relative (radians)
    #[serde(default = "defaults::fan_angle_min")]
    pub angle_min: f32,

    /// Angle of ray N-1, agent-relative (radians)
    #[serde(default = "defaults::fan_angle_max")]
    pub angle_max: f32,

    /// Gap between the agent rim and the start of every ray
    #[serde(default = "defaults::fan_range_min")]
    pub range_min: f32,

    /// Ray length
    #[serde(default = "defaults::fan_range_max")]
    pub range_max: f32,

    /// Objects the rays can hit
    pub detection_mask: Category,

    /// Detected objects outside this mask are reported as WALL
    #[serde(default = "Category::all")]
    pub acceptance_mask: Category,
}

impl FanSensorConfig {
    /// Config with default geometry and the given masks.
    pub fn new(detection_mask: Category, acceptance_mask: Category) -> Self {
        Self {
            number_of_rays: defaults::number_of_rays(),
            angle_min: defaults::fan_angle_min(),
            angle_max: defaults::fan_angle_max(),
            range_min: defaults::fan_range_min(),
            range_max: defaults::fan_range_max(),
            detection_mask,
            acceptance_mask,
        }
    }

    /// Builder: ray count and angular extent.
    pub fn with_fan(mut self, number_of_rays: usize, angle_min: f32, angle_max: f32) -> Self {
        self.number_of_rays = number_of_rays;
        self.angle_min = angle_min;
        self.angle_max = angle_max;
        self
    }

    /// Builder: range window.
    pub fn with_range(mut self, range_min: f32, range_max: f32) -> Self {
        self.range_min = range_min;
        self.range_max = range_max;
        self
    }

    /// Check the geometry and masks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite(SECTION, "angle_min", self.angle_min)?;
        require_finite(SECTION, "angle_max", self.angle_max)?;
        if self.angle_min > self.angle_max {
            return Err(ConfigError::ReversedAngles {
                section: SECTION,
                min: self.angle_min,
                max: self.angle_max,
            });
        }
        require_non_negative(SECTION, "range_min", self.range_min)?;
        require_positive(SECTION, "range_max", self.range_max)?;
        if self.detection_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: SECTION,
                field: "detection_mask",
            });
        }
        Ok(())
    }

    /// Ray angles in index order.
    pub fn ray_angles(&self) -> Vec<f32> {
        match self.number_of_rays {
            0 => Vec::new(),
            1 => vec![self.angle_min],
            n => {
                let step = (self.angle_max - self.angle_min) / (n - 1) as f32;
                (0..n).map(|i| self.angle_min + i as f32 * step).collect()
            }
        }
    }
}

/// One ray of a range observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeRay {
    /// Angle relative to the agent heading (radians)
    pub angle: f32,
    /// Distance from the ray start, in [0, range_max]
    pub distance: f32,
    /// Category of the object hit, `None` on a miss
    pub category: Option<Category>,
}

impl RangeRay {
    /// True when the ray hit something whose category intersects `mask`.
    #[inline]
    pub fn matches(&self, mask: Category) -> bool {
        self.category.is_some_and(|c| c.matches(mask))
    }

    /// True when the ray hit an object tagged exactly `category`.
    #[inline]
    pub fn is(&self, category: Category) -> bool {
        self.category == Some(category)
    }
}

/// Ordered fan of rays from one scan.
///
/// Index 0 is the rightmost ray (`angle_min`), the last index the leftmost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeObservation {
    rays: Vec<RangeRay>,
    range_min: f32,
    range_max: f32,
    inner_radius: f32,
}

impl RangeObservation {
    /// Assemble an observation from already computed rays.
    ///
    /// Used by [`FanSensor::scan`] and by callers replaying recorded data.
    pub fn new(rays: Vec<RangeRay>, range_min: f32, range_max: f32, inner_radius: f32) -> Self {
        Self {
            rays,
            range_min,
            range_max,
            inner_radius,
        }
    }

    /// Rays in index order
    #[inline]
    pub fn rays(&self) -> &[RangeRay] {
        &self.rays
    }

    /// Number of rays
    #[inline]
    pub fn len(&self) -> usize {
        self.rays.len()
    }

    /// True when the fan has no rays
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rays.is_empty()
    }

    /// Sensor range_min
    #[inline]
    pub fn range_min(&self) -> f32 {
        self.range_min
    }

    /// Sensor range_max (the distance reported on a miss)
    #[inline]
    pub fn range_max(&self) -> f32 {
        self.range_max
    }

    /// Agent radius + range_min
    #[inline]
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Ray `index`, if present.
    #[inline]
    pub fn ray(&self, index: usize) -> Option<&RangeRay> {
        self.rays.get(index)
    }

    /// Middle ray (index N/2), the one closest to straight ahead on a
    /// symmetric fan.
    pub fn centre_ray(&self) -> Option<&RangeRay> {
        self.rays.get(self.rays.len() / 2)
    }

    /// End point of ray `index` in the agent frame.
    pub fn hit_point(&self, index: usize) -> Option<Point2D> {
        self.rays
            .get(index)
            .map(|ray| Point2D::from_polar(self.inner_radius + ray.distance, ray.angle))
    }

    /// End points of all rays in the agent frame, in index order.
    pub fn hit_points(&self) -> Vec<Point2D> {
        self.rays
            .iter()
            .map(|ray| Point2D::from_polar(self.inner_radius + ray.distance, ray.angle))
            .collect()
    }

    /// Highest-index (leftmost) ray matching `mask`.
    pub fn leftmost_matching(&self, mask: Category) -> Option<usize> {
        self.rays.iter().rposition(|ray| ray.matches(mask))
    }
}

/// Fan sensor with validated configuration and precomputed ray angles.
#[derive(Clone, Debug)]
pub struct FanSensor {
    config: FanSensorConfig,
    angles: Vec<f32>,
}

impl FanSensor {
    /// Create a sensor, rejecting invalid geometry.
    pub fn new(config: FanSensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let angles = config.ray_angles();
        Ok(Self { config, angles })
    }

    /// Sensor configuration
    pub fn config(&self) -> &FanSensorConfig {
        &self.config
    }

    /// Ray angles in index order
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Scan the world from `pose` for an agent of radius `agent_radius`.
    pub fn scan<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        pose: &Pose2D,
        agent_radius: f32,
    ) -> RangeObservation {
        let range_max = self.config.range_max;
        let inner = agent_radius + self.config.range_min;
        let outer = inner + range_max;
        let origin = pose.position();

        let rays = self
            .angles
            .iter()
            .map(|&angle| {
                let dir = Point2D::from_angle(pose.theta + angle);
                let start = origin + dir * inner;
                let end = origin + dir * outer;

                match world.first_hit(start, end, self.config.detection_mask) {
                    Some(hit) => {
                        let category = if hit.category.matches(self.config.acceptance_mask) {
                            hit.category
                        } else {
                            Category::WALL
                        };
                        trace!(
                            "[Fan] ray {:.3} hit {} at {:.2}",
                            angle,
                            category.name(),
                            hit.fraction * range_max
                        );
                        RangeRay {
                            angle,
                            distance: hit.fraction * range_max,
                            category: Some(category),
                        }
                    }
                    None => RangeRay {
                        angle,
                        distance: range_max,
                        category: None,
                    },
                }
            })
            .collect();

        RangeObservation::new(rays, self.config.range_min, range_max, inner)
    }
}
