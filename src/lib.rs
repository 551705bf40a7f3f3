//! # Jhund
//!
//! Sensing and reactive control core for swarms of simple mobile agents.
//!
//! ## Overview
//!
//! Each agent senses a 2D world through a fan of virtual range rays and an
//! optional landmark sensor, then a controller turns the observation into a
//! linear/angular motion command:
//!
//! - **Fan sensor** - per-ray distance and object category
//! - **Landmark sensor** - distance and bearing to landmark objects
//! - **Controllers** - reactive clustering rules, centroid and sector
//!   steering, hysteresis state machines, and a velocity-obstacle planner
//! - **Swarm driver** - one sense/decide/clamp/actuate pass per agent per tick
//!
//! The physics engine that moves bodies and answers ray queries is not part
//! of this crate. It plugs in through [`WorldQuery`] and [`Actuator`];
//! [`StaticWorld`] is a small in-memory stand-in for tests and benches.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jhund::{JhundConfig, Swarm, StaticWorld, Pose2D, NullSink, MotionCommand};
//!
//! let config = JhundConfig::load(Path::new("configs/flow.yaml"))?;
//! let mut swarm = Swarm::new();
//! for i in 0..10 {
//!     swarm.spawn(&config, Pose2D::new(30.0 * i as f32, 0.0, 0.0), 10.0)?;
//! }
//!
//! let mut commands: Vec<(usize, MotionCommand)> = Vec::new();
//! swarm.tick(&world, &mut commands, &mut NullSink);
//! // integrate `commands` in the physics engine, then report back:
//! swarm.set_kinematics(0, new_pose, new_velocity)?;
//! ```
//!
//! ## Coordinate System
//!
//! - X: Forward (positive ahead of the agent)
//! - Y: Left (positive to the agent's left)
//! - Theta: Rotation in radians, CCW positive from +X axis
//!
//! Fan ray 0 is the rightmost ray, ray N-1 the leftmost.

#![warn(missing_docs)]

// Core types
pub mod core;

// YAML configuration
pub mod config;

// Errors
pub mod error;

// Random source for stochastic behaviors
pub mod noise;

// Sensors and the world query contract
pub mod sensor;

// Per-tick observation aggregate
pub mod observation;

// Motion commands and actuation
pub mod command;

// Debug drawing hook
pub mod viz;

// Velocity-obstacle planner
pub mod planner;

// Controllers
pub mod behavior;

// Tick driver
pub mod swarm;

// Re-export commonly used types
pub use core::{Category, Point2D, Pose2D, Segment2D};

pub use config::{ConfigError, JhundConfig};

pub use error::{Error, Result};

pub use noise::NoiseGenerator;

pub use sensor::{
    DetectedLandmark, FanSensor, FanSensorConfig, LandmarkObservation, LandmarkRef,
    LandmarkSensor, LandmarkSensorConfig, RangeObservation, RangeRay, SegmentHit, StaticWorld,
    WorldQuery,
};

pub use observation::ObservationBundle;

pub use command::{Actuator, MotionCommand, SpeedLimits};

pub use viz::{DebugPrimitive, DebugSink, NullSink, RecordingSink, Rgb};

pub use planner::{PlanResult, Planner, PlannerConfig, PlannerState};

pub use behavior::{AgentState, BehaviorConfig, Controller};

pub use swarm::{Agent, Swarm};
