//! Controllers: observation bundle in, motion command out.
//!
//! Every behavior implements [`Controller`]. Which one an agent runs is
//! chosen from configuration through [`BehaviorConfig::build`].
//!
//! ```text
//! ObservationBundle ──► Controller::react ──► MotionCommand
//!        │                    │
//!        │                    ├── reactive rules (Gauci, single ray, ...)
//!        │                    ├── centroid / sector
//!        │                    ├── hysteresis machines (pushout, circle, flow)
//!        └── hit points ──────┴── velocity-obstacle planner (avoider)
//! ```
//!
//! Controllers own their state (dwell timers, planner memory, RNG) and
//! mutate it only inside `react`. The debug sink never affects the result.

mod avoider;
mod centroid;
mod config;
mod flow;
mod hysteresis;
mod landmark_circle;
mod pushout;
mod reactive;
mod sector;

use crate::command::MotionCommand;
use crate::core::{Point2D, Pose2D};
use crate::observation::ObservationBundle;
use crate::viz::DebugSink;

pub use avoider::AvoiderController;
pub use centroid::{CentroidConfig, CentroidController, CentroidRule, attractant_centroid};
pub use config::BehaviorConfig;
pub use flow::{FlowConfig, FlowController, FlowState, is_pokable};
pub use hysteresis::{DwellTimer, ticks_from_sample};
pub use landmark_circle::{LandmarkCircleConfig, LandmarkCircleController};
pub use pushout::{PushoutConfig, PushoutController, PushoutMachine, PushoutState, home_to_angle};
pub use reactive::{
    GauciConfig, GauciController, LeftmostConfig, LeftmostController, NearestFrontalConfig,
    NearestFrontalController, Reaction, ReactiveSpeeds, SimpleAvoiderConfig,
    SimpleAvoiderController, SingleRayClusterConfig, SingleRayClusterController, frontal_reaction,
    gauci_rule,
};
pub use sector::{SectorConfig, SectorController, Span, landmark_spans, sector_widths};

/// Kinematic state of the agent a controller is deciding for.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AgentState {
    /// World pose
    pub pose: Pose2D,
    /// World-frame velocity
    pub velocity: Point2D,
    /// Body radius
    pub radius: f32,
}

impl AgentState {
    /// Create an agent state
    pub fn new(pose: Pose2D, velocity: Point2D, radius: f32) -> Self {
        Self {
            pose,
            velocity,
            radius,
        }
    }
}

/// A decision unit.
pub trait Controller: Send {
    /// Decide this tick's command.
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand;

    /// Behavior name for logging.
    fn name(&self) -> &'static str;

    /// Current state label, for controllers that are state machines.
    fn state_label(&self) -> Option<&'static str> {
        None
    }
}
