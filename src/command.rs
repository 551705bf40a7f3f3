//! Motion commands, agent speed limits and the actuation contract.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::require_positive;

/// Linear/angular velocity pair in the agent frame.
///
/// Linear is along the heading, angular is counter-clockwise positive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Forward speed
    pub linear: f32,
    /// Turn rate (radians per time unit)
    pub angular: f32,
}

impl MotionCommand {
    /// Create a command
    #[inline]
    pub const fn new(linear: f32, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Stop
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Clamp both components to the agent limits.
    ///
    /// Non-finite components become zero.
    pub fn clamped(self, limits: &SpeedLimits) -> Self {
        let clamp = |v: f32, max: f32| {
            if v.is_finite() {
                v.clamp(-max, max)
            } else {
                0.0
            }
        };
        Self {
            linear: clamp(self.linear, limits.max_linear),
            angular: clamp(self.angular, limits.max_angular),
        }
    }
}

/// Per-agent speed limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedLimits {
    /// Maximum |linear|
    #[serde(default = "defaults::max_linear_speed")]
    pub max_linear: f32,

    /// Maximum |angular|
    #[serde(default = "defaults::max_angular_speed")]
    pub max_angular: f32,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self {
            max_linear: defaults::max_linear_speed(),
            max_angular: defaults::max_angular_speed(),
        }
    }
}

impl SpeedLimits {
    /// Check the limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("limits", "max_linear", self.max_linear)?;
        require_positive("limits", "max_angular", self.max_angular)
    }
}

/// Receives the clamped command for each agent once per tick.
///
/// Implemented by whatever drives the bodies: a physics engine adapter, a
/// recorder in tests, a robot bridge.
pub trait Actuator {
    /// Apply `command` to agent `agent_id`.
    fn apply(&mut self, agent_id: usize, command: MotionCommand);
}

impl Actuator for Vec<(usize, MotionCommand)> {
    fn apply(&mut self, agent_id: usize, command: MotionCommand) {
        self.push((agent_id, command));
    }
}
