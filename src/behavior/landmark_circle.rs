//! Landmark circling: gather attractants into a ring around an arc landmark.
//!
//! Each agent is either an *outie*, which works the outside of the ring and
//! clusters attractants against it, or an *innie*, which pushes attractants
//! out from the centre. The role is drawn at construction and flips at
//! random with a small per-tick probability.

use std::f32::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_probability};
use crate::core::{Category, normalize_angle};
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::sensor::DetectedLandmark;
use crate::viz::{DebugSink, Rgb};

use super::centroid::CentroidRule;
use super::pushout::{PushoutMachine, PushoutState, home_to_angle};
use super::reactive::{Reaction, ReactiveSpeeds, frontal_reaction, gauci_rule};
use super::{AgentState, Controller};

const SECTION: &str = "behavior.landmark_circle";

/// Landmark circling configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkCircleConfig {
    /// Categories treated as attractants
    pub puck_mask: Category,

    /// Speeds and frontal cone of the clustering rule
    #[serde(flatten)]
    pub speeds: ReactiveSpeeds,

    /// Innie: arc distance that counts as inside
    #[serde(default = "defaults::inside_radius")]
    pub inside_radius: f32,

    /// Outie: arc distance below which the agent turns away
    #[serde(default = "defaults::outside_radius")]
    pub outside_radius: f32,

    /// Innie: ticks spent homing once outside
    #[serde(default = "defaults::homing_timeout")]
    pub homing_timeout: u32,

    /// Turn rate when homing toward or away from a landmark
    #[serde(default = "defaults::angular_speed")]
    pub homing_angular_speed: f32,

    /// Per-tick probability of swapping roles
    #[serde(default = "defaults::outie_trans_prob")]
    pub outie_trans_prob: f32,

    /// Centroid gain of the pushout rule
    #[serde(default = "defaults::centroid_gain")]
    pub gain: f32,

    /// Random turn span of the pushout rule and of pole wandering
    #[serde(default = "defaults::wander_span")]
    pub wander_span: f32,
}

impl LandmarkCircleConfig {
    /// Config with defaults.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            speeds: ReactiveSpeeds::default(),
            inside_radius: defaults::inside_radius(),
            outside_radius: defaults::outside_radius(),
            homing_timeout: defaults::homing_timeout(),
            homing_angular_speed: defaults::angular_speed(),
            outie_trans_prob: defaults::outie_trans_prob(),
            gain: defaults::centroid_gain(),
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
        require_finite(SECTION, "linear_speed", self.speeds.linear_speed)?;
        require_finite(SECTION, "angular_speed", self.speeds.angular_speed)?;
        require_non_negative(SECTION, "front_angle_threshold", self.speeds.front_angle_threshold)?;
        require_non_negative(SECTION, "inside_radius", self.inside_radius)?;
        require_non_negative(SECTION, "outside_radius", self.outside_radius)?;
        require_finite(SECTION, "homing_angular_speed", self.homing_angular_speed)?;
        require_probability(SECTION, "outie_trans_prob", self.outie_trans_prob)?;
        require_finite(SECTION, "gain", self.gain)?;
        require_non_negative(SECTION, "wander_span", self.wander_span)
    }
}

/// Outie/innie landmark circling controller.
pub struct LandmarkCircleController {
    config: LandmarkCircleConfig,
    rule: CentroidRule,
    outie: bool,
    machine: PushoutMachine,
    noise: NoiseGenerator,
}

impl LandmarkCircleController {
    /// Create the controller; the initial role is a fair coin flip.
    pub fn new(config: LandmarkCircleConfig, mut noise: NoiseGenerator) -> Self {
        let outie = noise.chance(0.5);
        Self::with_role(config, noise, outie)
    }

    /// Create the controller with a fixed initial role.
    pub fn with_role(config: LandmarkCircleConfig, noise: NoiseGenerator, outie: bool) -> Self {
        let rule = CentroidRule {
            linear_speed: config.speeds.linear_speed,
            gain: config.gain,
            wander_span: config.wander_span,
        };
        Self {
            config,
            rule,
            outie,
            machine: PushoutMachine::new(),
            noise,
        }
    }

    /// True while working the outside of the ring
    pub fn is_outie(&self) -> bool {
        self.outie
    }

    /// Innie PUSHING/HOMING state
    pub fn innie_state(&self) -> PushoutState {
        self.machine.state()
    }

    fn pushout(&mut self, bundle: &ObservationBundle, sink: &mut dyn DebugSink) -> MotionCommand {
        self.rule
            .command(bundle.range(), self.config.puck_mask, &mut self.noise, sink)
    }

    fn outie_command(
        &mut self,
        bundle: &ObservationBundle,
        closest: Option<DetectedLandmark>,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        match closest {
            Some(l) if l.category == Category::ARC_LANDMARK && l.distance < self.config.outside_radius => {
                let away = normalize_angle(l.angle + PI);
                sink.bearing(away, bundle.range().range_max(), Rgb::BLUE);
                home_to_angle(
                    Some(away),
                    self.config.speeds.linear_speed,
                    self.config.homing_angular_speed,
                )
            }
            None => self.pushout(bundle, sink),
            Some(l) if l.category == Category::BLAST_LANDMARK => self.pushout(bundle, sink),
            Some(l) => {
                let threshold = self.config.speeds.front_angle_threshold;
                let mut reaction = frontal_reaction(bundle.range(), self.config.puck_mask, threshold, 0.0);
                let pole_ahead = l.category == Category::POLE_LANDMARK
                    && bundle.landmark_list().iter().any(|p| {
                        p.category == Category::POLE_LANDMARK && p.angle.abs() < 2.0 * threshold
                    });
                if pole_ahead && reaction == Reaction::Neither {
                    reaction = Reaction::Puck;
                }
                gauci_rule(reaction, &self.config.speeds)
            }
        }
    }

    fn innie_command(
        &mut self,
        bundle: &ObservationBundle,
        closest: Option<DetectedLandmark>,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let linear = self.config.speeds.linear_speed;
        match closest {
            None => self.pushout(bundle, sink),
            Some(l) if l.category == Category::BLAST_LANDMARK => self.pushout(bundle, sink),
            Some(l) if l.category == Category::POLE_LANDMARK => {
                MotionCommand::new(linear, self.noise.wander(self.config.wander_span))
            }
            Some(l) => {
                let inside = l.distance < self.config.inside_radius;
                match self.machine.step(inside, self.config.homing_timeout, "Circle") {
                    PushoutState::Pushing => self.pushout(bundle, sink),
                    PushoutState::Homing => {
                        sink.bearing(l.angle, l.distance, Rgb::BLUE);
                        home_to_angle(Some(l.angle), linear, self.config.homing_angular_speed)
                    }
                }
            }
        }
    }
}

impl Controller for LandmarkCircleController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        if self.noise.chance(self.config.outie_trans_prob) {
            self.outie = !self.outie;
            debug!(
                "[Circle] role -> {}",
                if self.outie { "outie" } else { "innie" }
            );
        }

        let closest = bundle.closest_landmark(Category::ANY_LANDMARK).copied();
        if self.outie {
            self.outie_command(bundle, closest, sink)
        } else {
            self.innie_command(bundle, closest, sink)
        }
    }

    fn name(&self) -> &'static str {
        "landmark_circle"
    }

    fn state_label(&self) -> Option<&'static str> {
        if self.outie {
            Some("OUTIE")
        } else {
            Some(self.machine.state().label())
        }
    }
}
