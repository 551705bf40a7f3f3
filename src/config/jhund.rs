//! Root configuration.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorConfig;
use crate::command::SpeedLimits;
use crate::planner::PlannerConfig;
use crate::sensor::{FanSensorConfig, LandmarkSensorConfig};

use super::error::ConfigError;

/// Full configuration for one swarm, loaded from YAML.
///
/// Every agent built from it gets the same sensors, limits and behavior;
/// random behaviors get per-agent streams derived from `seed`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JhundConfig {
    /// Range fan (the detection mask is required)
    pub fan: FanSensorConfig,

    /// Landmark sensor; required by the pushout, landmark_circle and flow
    /// behaviors
    #[serde(default)]
    pub landmark_sensor: Option<LandmarkSensorConfig>,

    /// Command clamping
    #[serde(default)]
    pub limits: SpeedLimits,

    /// Controller selection
    pub behavior: BehaviorConfig,

    /// Planner used by the avoider behavior
    #[serde(default)]
    pub planner: PlannerConfig,

    /// RNG seed (0 = OS entropy)
    #[serde(default)]
    pub seed: u64,
}

impl JhundConfig {
    /// Config with default sections around the given fan and behavior.
    pub fn new(fan: FanSensorConfig, behavior: BehaviorConfig) -> Self {
        Self {
            fan,
            landmark_sensor: None,
            limits: SpeedLimits::default(),
            behavior,
            planner: PlannerConfig::default(),
            seed: 0,
        }
    }

    /// Load and validate a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        info!(
            "[Config] loaded {} ({} behavior, {} rays)",
            path.display(),
            config.behavior.kind(),
            config.fan.number_of_rays
        );
        Ok(config)
    }

    /// Parse and validate a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fan.validate()?;
        if let Some(landmarks) = &self.landmark_sensor {
            landmarks.validate()?;
        }
        self.limits.validate()?;
        self.behavior.validate()?;
        self.validate_behavior_sections()
    }

    /// Check the sections the selected behavior reads besides its own.
    pub(crate) fn validate_behavior_sections(&self) -> Result<(), ConfigError> {
        if self.behavior.needs_landmarks() && self.landmark_sensor.is_none() {
            return Err(ConfigError::MissingSection {
                section: "landmark_sensor",
                required_by: self.behavior.kind(),
            });
        }
        if matches!(self.behavior, BehaviorConfig::Avoider) {
            self.planner.validate()?;
        }
        Ok(())
    }
}
