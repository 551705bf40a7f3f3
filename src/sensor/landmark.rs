//! Landmark sensor: bearing and distance to landmark objects.
//!
//! No occlusion test is made; a landmark behind a wall is still seen.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative};
use crate::core::{Category, Pose2D, normalize_angle_upper};

use super::world::LandmarkRef;

const SECTION: &str = "landmark_sensor";

/// Landmark sensor range and angle windows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSensorConfig {
    /// Minimum distance (inclusive)
    #[serde(default = "defaults::landmark_min_range")]
    pub min_range: f32,

    /// Maximum distance (inclusive)
    #[serde(default = "defaults::landmark_max_range")]
    pub max_range: f32,

    /// Minimum relative bearing (inclusive, radians)
    #[serde(default = "defaults::landmark_min_angle")]
    pub min_angle: f32,

    /// Maximum relative bearing (inclusive, radians)
    #[serde(default = "defaults::landmark_max_angle")]
    pub max_angle: f32,
}

impl Default for LandmarkSensorConfig {
    fn default() -> Self {
        Self {
            min_range: defaults::landmark_min_range(),
            max_range: defaults::landmark_max_range(),
            min_angle: defaults::landmark_min_angle(),
            max_angle: defaults::landmark_max_angle(),
        }
    }
}

impl LandmarkSensorConfig {
    /// Check the windows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative(SECTION, "min_range", self.min_range)?;
        require_non_negative(SECTION, "max_range", self.max_range)?;
        require_finite(SECTION, "min_angle", self.min_angle)?;
        require_finite(SECTION, "max_angle", self.max_angle)?;
        if self.min_range > self.max_range {
            return Err(ConfigError::InvalidValue {
                section: SECTION,
                field: "max_range",
                value: self.max_range,
                reason: "must not be below min_range",
            });
        }
        if self.min_angle > self.max_angle {
            return Err(ConfigError::ReversedAngles {
                section: SECTION,
                min: self.min_angle,
                max: self.max_angle,
            });
        }
        Ok(())
    }
}

/// One detected landmark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedLandmark {
    /// Centre-to-centre distance
    pub distance: f32,
    /// Bearing relative to the agent heading, in (-π, π]
    pub angle: f32,
    /// Landmark category
    pub category: Category,
}

/// Landmarks seen in one scan, in world enumeration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkObservation {
    landmarks: Vec<DetectedLandmark>,
}

impl LandmarkObservation {
    /// Wrap a list of detections.
    pub fn new(landmarks: Vec<DetectedLandmark>) -> Self {
        Self { landmarks }
    }

    /// Detections
    #[inline]
    pub fn landmarks(&self) -> &[DetectedLandmark] {
        &self.landmarks
    }

    /// Number of detections
    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// True when nothing was detected
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Nearest landmark whose category intersects `mask`.
    ///
    /// On equal distances the first detection wins.
    pub fn closest(&self, mask: Category) -> Option<&DetectedLandmark> {
        self.landmarks
            .iter()
            .filter(|l| l.category.matches(mask))
            .fold(None, |best: Option<&DetectedLandmark>, l| match best {
                Some(b) if b.distance <= l.distance => Some(b),
                _ => Some(l),
            })
    }
}

/// Landmark sensor.
#[derive(Clone, Debug)]
pub struct LandmarkSensor {
    config: LandmarkSensorConfig,
}

impl LandmarkSensor {
    /// Create a sensor, rejecting invalid windows.
    pub fn new(config: LandmarkSensorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Sensor configuration
    pub fn config(&self) -> &LandmarkSensorConfig {
        &self.config
    }

    /// Filter `landmarks` to those inside the range and bearing windows.
    pub fn scan(&self, landmarks: &[LandmarkRef], pose: &Pose2D) -> LandmarkObservation {
        let origin = pose.position();
        let c = &self.config;

        let detected = landmarks
            .iter()
            .filter(|l| l.category.is_landmark())
            .filter_map(|l| {
                let distance = origin.distance(&l.position);
                let angle = normalize_angle_upper(origin.angle_to(&l.position) - pose.theta);
                let in_range = (c.min_range..=c.max_range).contains(&distance);
                let in_view = (c.min_angle..=c.max_angle).contains(&angle);
                (in_range && in_view).then_some(DetectedLandmark {
                    distance,
                    angle,
                    category: l.category,
                })
            })
            .collect();

        LandmarkObservation::new(detected)
    }
}
