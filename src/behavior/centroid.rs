//! Weighted attractant centroid.
//!
//! Every forward ray (angle in [-π/2, π/2)) that sees an attractant adds
//! `(cos θ, sin θ) / (1 + distance)`. The sum is divided by the ray count
//! and its lateral component, times a gain, becomes the turn rate.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative};
use crate::core::{Category, Point2D};
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::sensor::RangeObservation;
use crate::viz::{DebugSink, Rgb};

use super::{AgentState, Controller};

/// Normalized centroid of attractant rays, `None` when no ray qualifies.
pub fn attractant_centroid(range: &RangeObservation, mask: Category) -> Option<Point2D> {
    let mut sum = Point2D::ZERO;
    let mut seen = false;
    for ray in range.rays() {
        if !ray.matches(mask) || !(-FRAC_PI_2..FRAC_PI_2).contains(&ray.angle) {
            continue;
        }
        sum = sum + Point2D::from_angle(ray.angle) * (1.0 / (1.0 + ray.distance));
        seen = true;
    }
    seen.then(|| sum * (1.0 / range.len() as f32))
}

/// Centroid steering with a wander fallback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentroidRule {
    /// Forward speed, always
    pub linear_speed: f32,
    /// Turn rate per unit of lateral centroid
    pub gain: f32,
    /// Fallback turn rate is `wander_span * (u - 0.5)`; 0 drives straight
    pub wander_span: f32,
}

impl CentroidRule {
    /// Command for this tick.
    pub fn command(
        &self,
        range: &RangeObservation,
        mask: Category,
        noise: &mut NoiseGenerator,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        match attractant_centroid(range, mask) {
            Some(centroid) => {
                sink.line_to(centroid * range.range_max(), Rgb::GREEN);
                MotionCommand::new(self.linear_speed, self.gain * centroid.y)
            }
            None => {
                let angular = if self.wander_span > 0.0 {
                    noise.wander(self.wander_span)
                } else {
                    0.0
                };
                MotionCommand::new(self.linear_speed, angular)
            }
        }
    }
}

/// Centroid controller configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentroidConfig {
    /// Categories to steer toward
    pub attractant_mask: Category,

    /// Forward speed
    #[serde(default = "defaults::linear_speed")]
    pub linear_speed: f32,

    /// Turn rate per unit of lateral centroid
    #[serde(default = "defaults::centroid_gain")]
    pub gain: f32,

    /// Random turn span when nothing is seen (0 = straight)
    #[serde(default)]
    pub wander_span: f32,
}

impl CentroidConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attractant_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: "behavior.centroid",
                field: "attractant_mask",
            });
        }
        require_finite("behavior.centroid", "linear_speed", self.linear_speed)?;
        require_finite("behavior.centroid", "gain", self.gain)?;
        require_non_negative("behavior.centroid", "wander_span", self.wander_span)
    }

    /// The steering rule this configuration describes.
    pub fn rule(&self) -> CentroidRule {
        CentroidRule {
            linear_speed: self.linear_speed,
            gain: self.gain,
            wander_span: self.wander_span,
        }
    }
}

/// Steers toward the weighted centroid of attractant rays.
pub struct CentroidController {
    mask: Category,
    rule: CentroidRule,
    noise: NoiseGenerator,
}

impl CentroidController {
    /// Create the controller.
    pub fn new(config: &CentroidConfig, noise: NoiseGenerator) -> Self {
        Self {
            mask: config.attractant_mask,
            rule: config.rule(),
            noise,
        }
    }
}

impl Controller for CentroidController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        self.rule
            .command(bundle.range(), self.mask, &mut self.noise, sink)
    }

    fn name(&self) -> &'static str {
        "centroid"
    }
}
