//! Tick driver: sense, decide, clamp and actuate for every agent.
//!
//! ```text
//! for each agent (one borrowed world snapshot for the whole tick):
//!     FanSensor::scan ─┐
//!                      ├─► ObservationBundle ─► Controller::react
//!     LandmarkSensor ──┘                              │
//!                                                     ▼
//!                         Actuator::apply ◄── MotionCommand::clamped
//! ```
//!
//! Moving the bodies is the caller's job: after a tick it integrates the
//! commands in its own physics and reports poses and velocities back with
//! [`Swarm::set_kinematics`].

use log::{debug, trace};

use crate::behavior::{AgentState, Controller};
use crate::command::{Actuator, MotionCommand, SpeedLimits};
use crate::config::{ConfigError, JhundConfig};
use crate::core::{Point2D, Pose2D};
use crate::error::{Error, Result};
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::sensor::{FanSensor, LandmarkSensor, WorldQuery};
use crate::viz::DebugSink;

/// One agent: body state, sensors, controller and limits.
pub struct Agent {
    pose: Pose2D,
    velocity: Point2D,
    radius: f32,
    fan: FanSensor,
    landmark_sensor: Option<LandmarkSensor>,
    controller: Box<dyn Controller>,
    limits: SpeedLimits,
    last_command: MotionCommand,
}

impl Agent {
    /// Assemble an agent from parts. Starts at rest.
    pub fn new(
        pose: Pose2D,
        radius: f32,
        fan: FanSensor,
        landmark_sensor: Option<LandmarkSensor>,
        controller: Box<dyn Controller>,
        limits: SpeedLimits,
    ) -> Self {
        Self {
            pose,
            velocity: Point2D::ZERO,
            radius,
            fan,
            landmark_sensor,
            controller,
            limits,
            last_command: MotionCommand::zero(),
        }
    }

    /// Build an agent from configuration.
    ///
    /// `stream` selects the agent's random stream derived from the seed.
    pub fn from_config(
        config: &JhundConfig,
        stream: u64,
        pose: Pose2D,
        radius: f32,
    ) -> std::result::Result<Self, ConfigError> {
        config.limits.validate()?;
        config.validate_behavior_sections()?;
        let fan = FanSensor::new(config.fan.clone())?;
        let landmark_sensor = config
            .landmark_sensor
            .clone()
            .map(LandmarkSensor::new)
            .transpose()?;
        let noise = NoiseGenerator::derived(config.seed, stream);
        let controller = config.behavior.build(&config.planner, noise)?;
        Ok(Self::new(
            pose,
            radius,
            fan,
            landmark_sensor,
            controller,
            config.limits.clone(),
        ))
    }

    /// World pose
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// World-frame velocity
    pub fn velocity(&self) -> Point2D {
        self.velocity
    }

    /// Body radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Kinematic state as seen by the controller
    pub fn state(&self) -> AgentState {
        AgentState::new(self.pose, self.velocity, self.radius)
    }

    /// Controller name
    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    /// Controller state label, for state machines
    pub fn state_label(&self) -> Option<&'static str> {
        self.controller.state_label()
    }

    /// Command issued on the last tick (clamped)
    pub fn last_command(&self) -> MotionCommand {
        self.last_command
    }

    /// Update pose and velocity after external integration.
    pub fn set_kinematics(&mut self, pose: Pose2D, velocity: Point2D) {
        self.pose = pose;
        self.velocity = velocity;
    }

    /// Sense the world from the current pose.
    pub fn sense<W: WorldQuery + ?Sized>(&self, world: &W) -> ObservationBundle {
        let range = self.fan.scan(world, &self.pose, self.radius);
        match &self.landmark_sensor {
            Some(sensor) => {
                let candidates = world.landmarks_in_range(self.pose.position());
                ObservationBundle::with_landmarks(range, sensor.scan(&candidates, &self.pose))
            }
            None => ObservationBundle::new(range),
        }
    }

    /// Sense, decide and clamp. Returns the clamped command.
    pub fn step<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let bundle = self.sense(world);
        let state = self.state();
        let command = self
            .controller
            .react(&bundle, &state, sink)
            .clamped(&self.limits);
        self.last_command = command;
        command
    }
}

/// All agents of one simulation.
#[derive(Default)]
pub struct Swarm {
    agents: Vec<Agent>,
    ticks: u64,
}

impl Swarm {
    /// Empty swarm
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent built from `config`; returns its id.
    pub fn spawn(&mut self, config: &JhundConfig, pose: Pose2D, radius: f32) -> Result<usize> {
        let id = self.agents.len();
        let agent = Agent::from_config(config, id as u64, pose, radius)?;
        debug!(
            "[Swarm] spawned agent {} ({}) at ({:.1}, {:.1})",
            id,
            agent.controller_name(),
            pose.x,
            pose.y
        );
        self.agents.push(agent);
        Ok(id)
    }

    /// Add a prebuilt agent; returns its id.
    pub fn push(&mut self, agent: Agent) -> usize {
        self.agents.push(agent);
        self.agents.len() - 1
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// True when there are no agents
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// All agents, indexed by id
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agent `id`
    pub fn agent(&self, id: usize) -> Result<&Agent> {
        self.agents.get(id).ok_or(Error::UnknownAgent(id))
    }

    /// Report the externally integrated pose and velocity of agent `id`.
    pub fn set_kinematics(&mut self, id: usize, pose: Pose2D, velocity: Point2D) -> Result<()> {
        let agent = self.agents.get_mut(id).ok_or(Error::UnknownAgent(id))?;
        agent.set_kinematics(pose, velocity);
        Ok(())
    }

    /// Run one control tick for every agent against one world snapshot.
    pub fn tick<W, A>(&mut self, world: &W, actuator: &mut A, sink: &mut dyn DebugSink)
    where
        W: WorldQuery + ?Sized,
        A: Actuator + ?Sized,
    {
        for (id, agent) in self.agents.iter_mut().enumerate() {
            let command = agent.step(world, sink);
            trace!(
                "[Swarm] tick {} agent {}: ({:.2}, {:.2})",
                self.ticks,
                id,
                command.linear,
                command.angular
            );
            actuator.apply(id, command);
        }
        self.ticks += 1;
    }
}
