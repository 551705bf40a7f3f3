//! Local collision-avoidance planner.
//!
//! Builds one non-convex obstacle from the fan's end points and searches a
//! small fixed set of preferred velocities for the fastest one that ORCA
//! (optimal reciprocal collision avoidance) admits.
//!
//! ```text
//! RangeObservation ──► ObstaclePolygon ──► ORCA lines ──► LP ──► velocity
//!                         (clockwise)        per edge      disc      │
//!                                                                    ▼
//!                 PlannerState (last index/speed) ◄── pick fastest candidate
//! ```
//!
//! Units follow the fan: a max speed of 100 means 100 distance units per
//! time unit, and `time_step` is one control tick.

mod obstacle;
mod orca;
mod search;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_positive};

pub use obstacle::{ObstaclePolygon, ObstacleVertex};
pub use orca::{OrcaAgent, OrcaLine, compute_new_velocity, obstacle_lines, solve};
pub use search::{PlanResult, Planner, PlannerState, candidate_velocities, pick_fastest};

const SECTION: &str = "planner";

/// Planner configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Number of preferred velocities (odd, at least 3)
    #[serde(default = "defaults::candidate_count")]
    pub candidate_count: usize,

    /// Magnitude of every preferred velocity and radius of the LP disc
    #[serde(default = "defaults::planner_max_speed")]
    pub max_speed: f32,

    /// Integration step between ORCA updates
    #[serde(default = "defaults::time_step")]
    pub time_step: f32,

    /// Look-ahead time against obstacles
    #[serde(default = "defaults::time_horizon_obst")]
    pub time_horizon_obst: f32,

    /// ORCA updates per candidate
    #[serde(default = "defaults::sim_steps")]
    pub sim_steps: usize,

    /// Last speed below which the next search sweeps every candidate
    #[serde(default = "defaults::stuck_speed_threshold")]
    pub stuck_speed_threshold: f32,

    /// Linear command per unit of forward velocity
    #[serde(default = "defaults::linear_gain")]
    pub linear_gain: f32,

    /// Angular command per unit of lateral velocity
    #[serde(default = "defaults::angular_gain")]
    pub angular_gain: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            candidate_count: defaults::candidate_count(),
            max_speed: defaults::planner_max_speed(),
            time_step: defaults::time_step(),
            time_horizon_obst: defaults::time_horizon_obst(),
            sim_steps: defaults::sim_steps(),
            stuck_speed_threshold: defaults::stuck_speed_threshold(),
            linear_gain: defaults::linear_gain(),
            angular_gain: defaults::angular_gain(),
        }
    }
}

impl PlannerConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.candidate_count < 3 || self.candidate_count % 2 == 0 {
            return Err(ConfigError::InvalidValue {
                section: SECTION,
                field: "candidate_count",
                value: self.candidate_count as f32,
                reason: "must be odd and at least 3",
            });
        }
        if self.sim_steps == 0 {
            return Err(ConfigError::InvalidValue {
                section: SECTION,
                field: "sim_steps",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        require_positive(SECTION, "max_speed", self.max_speed)?;
        require_positive(SECTION, "time_step", self.time_step)?;
        require_positive(SECTION, "time_horizon_obst", self.time_horizon_obst)?;
        require_non_negative(SECTION, "stuck_speed_threshold", self.stuck_speed_threshold)?;
        require_finite(SECTION, "linear_gain", self.linear_gain)?;
        require_finite(SECTION, "angular_gain", self.angular_gain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.candidate_count, 11);
        assert_eq!(config.sim_steps, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_even_candidate_count_rejected() {
        let config = PlannerConfig {
            candidate_count: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_partial() {
        let config: PlannerConfig = serde_yaml::from_str("max_speed: 50.0\nsim_steps: 3\n").unwrap();
        assert_eq!(config.max_speed, 50.0);
        assert_eq!(config.sim_steps, 3);
        assert_eq!(config.candidate_count, 11);
    }
}
