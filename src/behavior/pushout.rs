//! Pushout: clear attractants out of a landmark's neighbourhood.
//!
//! ```text
//!            outside circle_radius
//!  PUSHING ──────────────────────────► HOMING
//!     ▲                                  │
//!     └──── dwell of homing_timeout ─────┘
//! ```
//!
//! PUSHING follows the attractant centroid; HOMING turns back toward the
//! closest landmark until the dwell runs out.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative};
use crate::core::Category;
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::viz::{DebugSink, Rgb};

use super::centroid::CentroidRule;
use super::hysteresis::DwellTimer;
use super::{AgentState, Controller};

const SECTION: &str = "behavior.pushout";

/// Turn toward a bearing at fixed rates; no bearing turns right.
pub fn home_to_angle(angle: Option<f32>, linear_speed: f32, angular_speed: f32) -> MotionCommand {
    match angle {
        Some(a) if a > 0.0 => MotionCommand::new(linear_speed, angular_speed),
        _ => MotionCommand::new(linear_speed, -angular_speed),
    }
}

/// Pushout machine states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PushoutState {
    /// Following attractants
    #[default]
    Pushing,
    /// Returning toward the landmark
    Homing,
}

impl PushoutState {
    /// Label for logging
    pub fn label(self) -> &'static str {
        match self {
            PushoutState::Pushing => "PUSHING",
            PushoutState::Homing => "HOMING",
        }
    }
}

/// PUSHING/HOMING transitions with a fixed homing dwell.
#[derive(Clone, Debug, Default)]
pub struct PushoutMachine {
    state: PushoutState,
    timer: DwellTimer,
}

impl PushoutMachine {
    /// Machine in PUSHING
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> PushoutState {
        self.state
    }

    /// Advance one tick and return the new state.
    pub fn step(&mut self, inside: bool, homing_timeout: u32, tag: &str) -> PushoutState {
        let next = match self.state {
            PushoutState::Pushing if !inside => {
                self.timer.start(homing_timeout);
                PushoutState::Homing
            }
            PushoutState::Homing if !self.timer.tick() => PushoutState::Pushing,
            state => state,
        };
        if next != self.state {
            debug!("[{}] {} -> {}", tag, self.state.label(), next.label());
            self.state = next;
        }
        next
    }
}

/// Pushout configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushoutConfig {
    /// Categories pushed along
    pub attractant_mask: Category,

    /// Landmark distance that counts as inside
    #[serde(default = "defaults::circle_radius")]
    pub circle_radius: f32,

    /// Ticks spent homing once outside
    #[serde(default = "defaults::homing_timeout")]
    pub homing_timeout: u32,

    /// Forward speed
    #[serde(default = "defaults::linear_speed")]
    pub linear_speed: f32,

    /// Turn rate while homing
    #[serde(default = "defaults::angular_speed")]
    pub angular_speed: f32,

    /// Centroid gain while pushing
    #[serde(default = "defaults::centroid_gain")]
    pub gain: f32,

    /// Random turn span when no attractant is seen
    #[serde(default = "defaults::wander_span")]
    pub wander_span: f32,
}

impl PushoutConfig {
    /// Config with defaults.
    pub fn new(attractant_mask: Category) -> Self {
        Self {
            attractant_mask,
            circle_radius: defaults::circle_radius(),
            homing_timeout: defaults::homing_timeout(),
            linear_speed: defaults::linear_speed(),
            angular_speed: defaults::angular_speed(),
            gain: defaults::centroid_gain(),
            wander_span: defaults::wander_span(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attractant_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: SECTION,
                field: "attractant_mask",
            });
        }
        require_non_negative(SECTION, "circle_radius", self.circle_radius)?;
        require_finite(SECTION, "linear_speed", self.linear_speed)?;
        require_finite(SECTION, "angular_speed", self.angular_speed)?;
        require_finite(SECTION, "gain", self.gain)?;
        require_non_negative(SECTION, "wander_span", self.wander_span)
    }

    /// Centroid rule used while pushing.
    pub fn rule(&self) -> CentroidRule {
        CentroidRule {
            linear_speed: self.linear_speed,
            gain: self.gain,
            wander_span: self.wander_span,
        }
    }
}

/// Pushout controller.
pub struct PushoutController {
    config: PushoutConfig,
    machine: PushoutMachine,
    noise: NoiseGenerator,
}

impl PushoutController {
    /// Create the controller in PUSHING.
    pub fn new(config: PushoutConfig, noise: NoiseGenerator) -> Self {
        Self {
            config,
            machine: PushoutMachine::new(),
            noise,
        }
    }

    /// Current state
    pub fn state(&self) -> PushoutState {
        self.machine.state()
    }
}

impl Controller for PushoutController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let closest = bundle.closest_landmark(Category::ANY_LANDMARK).copied();
        let inside = closest.is_none_or(|l| l.distance < self.config.circle_radius);

        match self.machine.step(inside, self.config.homing_timeout, "Pushout") {
            PushoutState::Pushing => self.config.rule().command(
                bundle.range(),
                self.config.attractant_mask,
                &mut self.noise,
                sink,
            ),
            PushoutState::Homing => {
                let angle = closest.map(|l| l.angle);
                if let Some(a) = angle {
                    sink.bearing(a, bundle.range().range_max(), Rgb::BLUE);
                }
                home_to_angle(angle, self.config.linear_speed, self.config.angular_speed)
            }
        }
    }

    fn name(&self) -> &'static str {
        "pushout"
    }

    fn state_label(&self) -> Option<&'static str> {
        Some(self.machine.state().label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{DetectedLandmark, LandmarkObservation, RangeObservation, RangeRay};
    use crate::viz::NullSink;
    use approx::assert_relative_eq;

    fn bundle_with_landmark(distance: f32, angle: f32) -> ObservationBundle {
        let range = RangeObservation::new(
            vec![RangeRay {
                angle: 0.2,
                distance: 10.0,
                category: Some(Category::RED_PUCK),
            }],
            0.0,
            100.0,
            10.0,
        );
        ObservationBundle::with_landmarks(
            range,
            LandmarkObservation::new(vec![DetectedLandmark {
                distance,
                angle,
                category: Category::POLE_LANDMARK,
            }]),
        )
    }

    #[test]
    fn test_home_to_angle() {
        assert_eq!(home_to_angle(Some(0.5), 4.0, 2.0), MotionCommand::new(4.0, 2.0));
        assert_eq!(home_to_angle(Some(0.0), 4.0, 2.0), MotionCommand::new(4.0, -2.0));
        assert_eq!(home_to_angle(None, 4.0, 2.0), MotionCommand::new(4.0, -2.0));
    }

    #[test]
    fn test_pushing_inside_follows_centroid() {
        let mut c = PushoutController::new(PushoutConfig::new(Category::ANY_PUCK), NoiseGenerator::new(5));
        let cmd = c.react(&bundle_with_landmark(100.0, 1.0), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), PushoutState::Pushing);
        assert_relative_eq!(cmd.angular, 1000.0 * 0.2f32.sin() / 11.0, epsilon = 1e-3);
    }

    #[test]
    fn test_homing_dwell() {
        let mut config = PushoutConfig::new(Category::ANY_PUCK);
        config.homing_timeout = 3;
        let mut c = PushoutController::new(config, NoiseGenerator::new(5));
        let outside = bundle_with_landmark(300.0, -1.0);
        let inside = bundle_with_landmark(100.0, -1.0);

        // Tick 0: leaves the circle
        let cmd = c.react(&outside, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), PushoutState::Homing);
        assert_eq!(cmd, MotionCommand::new(4.0, -2.0));

        // Ticks 1..=3 hold even though the agent is back inside
        for _ in 0..3 {
            c.react(&inside, &AgentState::default(), &mut NullSink);
            assert_eq!(c.state(), PushoutState::Homing);
        }
        c.react(&inside, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), PushoutState::Pushing);
        assert_eq!(c.state_label(), Some("PUSHING"));
    }

    #[test]
    fn test_no_landmark_counts_as_inside() {
        let mut c = PushoutController::new(PushoutConfig::new(Category::ANY_PUCK), NoiseGenerator::new(5));
        let bundle = ObservationBundle::new(RangeObservation::default());
        let cmd = c.react(&bundle, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), PushoutState::Pushing);
        assert!(cmd.angular.abs() <= 2.5);
    }
}
