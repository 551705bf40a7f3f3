//! Flow: circulate around a landmark and poke attractants inward.
//!
//! ```text
//!            no landmark / u < wander_prob
//!   FLOW ─────────────────────────────────► WANDER
//!    │ ▲ ◄──────── dwell expired ──────────── ▲
//!    │ │                                      │
//!    │ └── budget spent / not pokable ──┐     │ landmark lost
//!    │                                  │     │
//!    └──── pokable, u < poke_prob ────► POKE ─┘
//! ```
//!
//! A puck is pokable when it lies on the side the agent is circulating
//! toward: the puck bearing has a positive component along the direction
//! 90° counter-clockwise of the landmark bearing.

use std::f32::consts::FRAC_PI_2;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_probability};
use crate::core::{Category, Point2D};
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::viz::{DebugSink, Rgb};

use super::hysteresis::DwellTimer;
use super::{AgentState, Controller};

const SECTION: &str = "behavior.flow";

/// Flow machine states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    /// Circulating around the landmark
    #[default]
    Flow,
    /// Random walk for a sampled dwell
    Wander,
    /// Turning into a pokable puck for a sampled budget
    Poke,
}

impl FlowState {
    /// Label for logging
    pub fn label(self) -> &'static str {
        match self {
            FlowState::Flow => "FLOW",
            FlowState::Wander => "WANDER",
            FlowState::Poke => "POKE",
        }
    }
}

/// Flow configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Categories that can be poked
    pub puck_mask: Category,

    /// Forward speed
    #[serde(default = "defaults::linear_speed")]
    pub linear_speed: f32,

    /// Turn rate magnitude in FLOW and POKE
    #[serde(default = "defaults::angular_speed")]
    pub angular_speed: f32,

    /// Per-tick probability of leaving FLOW for WANDER
    #[serde(default = "defaults::wander_prob")]
    pub wander_prob: f32,

    /// Mean WANDER dwell (ticks)
    #[serde(default = "defaults::wander_mean")]
    pub wander_mean: f32,

    /// WANDER dwell standard deviation
    #[serde(default = "defaults::wander_sigma")]
    pub wander_sigma: f32,

    /// Per-tick probability of poking a pokable puck
    #[serde(default = "defaults::poke_prob")]
    pub poke_prob: f32,

    /// Mean POKE budget (ticks)
    #[serde(default = "defaults::poke_mean")]
    pub poke_mean: f32,

    /// POKE budget standard deviation
    #[serde(default = "defaults::poke_sigma")]
    pub poke_sigma: f32,

    /// Random turn span while wandering
    #[serde(default = "defaults::wander_span")]
    pub wander_span: f32,
}

impl FlowConfig {
    /// Config with defaults.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            linear_speed: defaults::linear_speed(),
            angular_speed: defaults::angular_speed(),
            wander_prob: defaults::wander_prob(),
            wander_mean: defaults::wander_mean(),
            wander_sigma: defaults::wander_sigma(),
            poke_prob: defaults::poke_prob(),
            poke_mean: defaults::poke_mean(),
            poke_sigma: defaults::poke_sigma(),
            wander_span: defaults::wander_span(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.puck_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: SECTION,
                field: "puck_mask",
            });
        }
        require_finite(SECTION, "linear_speed", self.linear_speed)?;
        require_finite(SECTION, "angular_speed", self.angular_speed)?;
        require_probability(SECTION, "wander_prob", self.wander_prob)?;
        require_probability(SECTION, "poke_prob", self.poke_prob)?;
        require_finite(SECTION, "wander_mean", self.wander_mean)?;
        require_non_negative(SECTION, "wander_sigma", self.wander_sigma)?;
        require_finite(SECTION, "poke_mean", self.poke_mean)?;
        require_non_negative(SECTION, "poke_sigma", self.poke_sigma)?;
        require_non_negative(SECTION, "wander_span", self.wander_span)
    }
}

/// True when the puck lies counter-clockwise of the landmark bearing.
pub fn is_pokable(puck_angle: f32, landmark_angle: f32) -> bool {
    Point2D::from_angle(puck_angle).dot(Point2D::from_angle(landmark_angle + FRAC_PI_2)) > 0.0
}

/// FLOW/WANDER/POKE controller.
pub struct FlowController {
    config: FlowConfig,
    state: FlowState,
    timer: DwellTimer,
    noise: NoiseGenerator,
}

impl FlowController {
    /// Create the controller in FLOW.
    pub fn new(config: FlowConfig, noise: NoiseGenerator) -> Self {
        Self {
            config,
            state: FlowState::Flow,
            timer: DwellTimer::idle(),
            noise,
        }
    }

    /// Current state
    pub fn state(&self) -> FlowState {
        self.state
    }

    fn enter(&mut self, next: FlowState) {
        let ticks = match next {
            FlowState::Wander => {
                self.timer
                    .start_normal(&mut self.noise, self.config.wander_mean, self.config.wander_sigma)
            }
            FlowState::Poke => {
                self.timer
                    .start_normal(&mut self.noise, self.config.poke_mean, self.config.poke_sigma)
            }
            FlowState::Flow => 0,
        };
        debug!(
            "[Flow] {} -> {} ({} ticks)",
            self.state.label(),
            next.label(),
            ticks
        );
        self.state = next;
    }

    fn transition(&mut self, landmark: Option<f32>, pokable: bool) {
        match self.state {
            FlowState::Flow => {
                if landmark.is_none() || self.noise.chance(self.config.wander_prob) {
                    self.enter(FlowState::Wander);
                }
                // A poke draw overrides a wander entered on the same tick
                if pokable && self.noise.chance(self.config.poke_prob) {
                    self.enter(FlowState::Poke);
                }
            }
            FlowState::Wander => {
                if !self.timer.tick() {
                    self.enter(FlowState::Flow);
                }
            }
            FlowState::Poke => {
                let spent = !self.timer.tick();
                if landmark.is_none() {
                    self.enter(FlowState::Wander);
                } else if spent || !pokable {
                    self.enter(FlowState::Flow);
                }
            }
        }
    }
}

impl Controller for FlowController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let range = bundle.range();
        let puck = range
            .leftmost_matching(self.config.puck_mask)
            .and_then(|i| range.ray(i))
            .map(|ray| ray.angle);
        let landmark = bundle
            .closest_landmark(Category::ANY_LANDMARK)
            .map(|l| l.angle);
        let pokable = match (puck, landmark) {
            (Some(p), Some(l)) => is_pokable(p, l),
            _ => false,
        };

        self.transition(landmark, pokable);

        let (lin, ang) = (self.config.linear_speed, self.config.angular_speed);
        match self.state {
            FlowState::Flow => match landmark {
                Some(l) if l >= -FRAC_PI_2 => {
                    sink.bearing(l, range.range_max(), Rgb::BLUE);
                    MotionCommand::new(lin, ang)
                }
                _ => MotionCommand::new(lin, -ang),
            },
            FlowState::Wander => MotionCommand::new(lin, self.noise.wander(self.config.wander_span)),
            FlowState::Poke => match puck {
                Some(p) if p >= 0.0 => MotionCommand::new(lin, ang),
                _ => MotionCommand::new(lin, -ang),
            },
        }
    }

    fn name(&self) -> &'static str {
        "flow"
    }

    fn state_label(&self) -> Option<&'static str> {
        Some(self.state.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{DetectedLandmark, LandmarkObservation, RangeObservation, RangeRay};
    use crate::viz::NullSink;

    fn quiet_config() -> FlowConfig {
        let mut config = FlowConfig::new(Category::ANY_PUCK);
        config.wander_prob = 0.0;
        config.poke_prob = 0.0;
        config
    }

    fn bundle(puck: Option<f32>, landmark: Option<f32>) -> ObservationBundle {
        let mut rays = vec![RangeRay {
            angle: -1.5,
            distance: 100.0,
            category: None,
        }];
        if let Some(angle) = puck {
            rays.push(RangeRay {
                angle,
                distance: 20.0,
                category: Some(Category::GREEN_PUCK),
            });
        }
        let range = RangeObservation::new(rays, 0.0, 100.0, 10.0);
        match landmark {
            Some(angle) => ObservationBundle::with_landmarks(
                range,
                LandmarkObservation::new(vec![DetectedLandmark {
                    distance: 150.0,
                    angle,
                    category: Category::ARC_LANDMARK,
                }]),
            ),
            None => ObservationBundle::new(range),
        }
    }

    #[test]
    fn test_pokable() {
        // Landmark to the right, puck ahead: ahead is counter-clockwise of right
        assert!(is_pokable(0.0, -FRAC_PI_2));
        assert!(!is_pokable(0.0, FRAC_PI_2));
    }

    #[test]
    fn test_flow_output_follows_landmark_side() {
        let mut c = FlowController::new(quiet_config(), NoiseGenerator::new(4));
        let cmd = c.react(&bundle(None, Some(-0.5)), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Flow);
        assert_eq!(cmd, MotionCommand::new(4.0, 2.0));

        let cmd = c.react(&bundle(None, Some(-2.0)), &AgentState::default(), &mut NullSink);
        assert_eq!(cmd, MotionCommand::new(4.0, -2.0));
    }

    #[test]
    fn test_lost_landmark_wanders_for_dwell() {
        let mut config = quiet_config();
        config.wander_mean = 3.0;
        config.wander_sigma = 0.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));

        c.react(&bundle(None, None), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Wander);
        for _ in 0..3 {
            c.react(&bundle(None, Some(-0.5)), &AgentState::default(), &mut NullSink);
            assert_eq!(c.state(), FlowState::Wander);
        }
        c.react(&bundle(None, Some(-0.5)), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Flow);
    }

    #[test]
    fn test_poke_and_exit() {
        let mut config = quiet_config();
        config.poke_prob = 1.0;
        config.poke_mean = 10.0;
        config.poke_sigma = 0.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));

        let pokable = bundle(Some(0.3), Some(-FRAC_PI_2));
        let cmd = c.react(&pokable, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Poke);
        assert_eq!(cmd, MotionCommand::new(4.0, 2.0));

        // Puck moves to the landmark side: no longer pokable
        c.react(&bundle(Some(0.3), Some(FRAC_PI_2)), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Flow);
    }

    #[test]
    fn test_poke_overrides_wander_on_same_tick() {
        let mut config = FlowConfig::new(Category::ANY_PUCK);
        config.wander_prob = 1.0;
        config.poke_prob = 1.0;
        config.poke_mean = 10.0;
        config.poke_sigma = 0.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));

        let pokable = bundle(Some(0.3), Some(-FRAC_PI_2));
        let cmd = c.react(&pokable, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Poke);
        assert_eq!(cmd, MotionCommand::new(4.0, 2.0));
    }

    #[test]
    fn test_certain_wander_without_pokable_puck() {
        let mut config = FlowConfig::new(Category::ANY_PUCK);
        config.wander_prob = 1.0;
        config.poke_prob = 1.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));

        // Puck on the landmark side cannot be poked
        c.react(&bundle(Some(0.3), Some(FRAC_PI_2)), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Wander);
    }

    #[test]
    fn test_poke_landmark_lost_wanders() {
        let mut config = quiet_config();
        config.poke_prob = 1.0;
        config.poke_mean = 10.0;
        config.poke_sigma = 0.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));
        c.react(&bundle(Some(0.3), Some(-FRAC_PI_2)), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Poke);

        c.react(&bundle(Some(0.3), None), &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Wander);
        assert_eq!(c.state_label(), Some("WANDER"));
    }

    #[test]
    fn test_poke_budget_runs_out() {
        let mut config = quiet_config();
        config.poke_prob = 1.0;
        config.poke_mean = 2.0;
        config.poke_sigma = 0.0;
        let mut c = FlowController::new(config, NoiseGenerator::new(4));
        let pokable = bundle(Some(0.3), Some(-FRAC_PI_2));

        c.react(&pokable, &AgentState::default(), &mut NullSink);
        c.react(&pokable, &AgentState::default(), &mut NullSink);
        c.react(&pokable, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Poke);
        c.react(&pokable, &AgentState::default(), &mut NullSink);
        assert_eq!(c.state(), FlowState::Flow);
    }

    #[test]
    fn test_seeded_runs_match() {
        let config = FlowConfig::new(Category::ANY_PUCK);
        let mut a = FlowController::new(config.clone(), NoiseGenerator::new(99));
        let mut b = FlowController::new(config, NoiseGenerator::new(99));
        let obs = bundle(Some(0.3), Some(-FRAC_PI_2));
        for _ in 0..200 {
            let ca = a.react(&obs, &AgentState::default(), &mut NullSink);
            let cb = b.react(&obs, &AgentState::default(), &mut NullSink);
            assert_eq!(ca, cb);
            assert_eq!(a.state(), b.state());
        }
    }
}
