//! Discrete preferred-velocity search.
//!
//! Each tick a handful of preferred velocities (fixed speed, bearings
//! spread over the forward half-plane) are run through the ORCA update and
//! the fastest result wins. Only the neighbours of last tick's winner are
//! retried; a near-stop forces a full sweep.

use log::{debug, trace, warn};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::core::{Point2D, Pose2D};
use crate::sensor::RangeObservation;

use super::PlannerConfig;
use super::obstacle::ObstaclePolygon;
use super::orca::{OrcaAgent, compute_new_velocity};

/// Search memory carried from one tick to the next.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerState {
    /// Candidate index chosen last
    pub last_index: usize,
    /// Speed achieved last (∞ before the first tick)
    pub last_magnitude: f32,
}

impl PlannerState {
    /// Initial state: centre candidate, unbounded last speed.
    pub fn new(candidate_count: usize) -> Self {
        Self {
            last_index: candidate_count / 2,
            last_magnitude: f32::INFINITY,
        }
    }

    /// Record the outcome of a search. A failed search zeroes the speed so
    /// the next tick sweeps every candidate; the index is kept.
    pub fn record(&mut self, outcome: Option<(usize, f32)>) {
        match outcome {
            Some((index, magnitude)) => {
                self.last_index = index;
                self.last_magnitude = magnitude;
            }
            None => self.last_magnitude = 0.0,
        }
    }
}

/// Strictly fastest `(index, velocity)` pair; ties keep the earlier one and
/// zero speed never wins.
pub fn pick_fastest(
    results: impl IntoIterator<Item = (usize, Point2D)>,
) -> Option<(usize, Point2D, f32)> {
    let mut best: Option<(usize, Point2D, f32)> = None;
    for (index, velocity) in results {
        let magnitude = velocity.length();
        if magnitude > best.map_or(0.0, |(_, _, m)| m) {
            best = Some((index, velocity, magnitude));
        }
    }
    best
}

/// Outcome of one planning step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlanResult {
    /// Fastest collision-free velocity, agent frame
    Velocity {
        /// Chosen velocity
        velocity: Point2D,
        /// Index of the candidate that produced it
        index: usize,
    },
    /// No candidate produced a non-zero speed
    Infeasible,
}

impl PlanResult {
    /// Chosen velocity, if any
    pub fn velocity(&self) -> Option<Point2D> {
        match self {
            PlanResult::Velocity { velocity, .. } => Some(*velocity),
            PlanResult::Infeasible => None,
        }
    }
}

/// Velocity-obstacle planner with validated configuration.
#[derive(Clone, Debug)]
pub struct Planner {
    config: PlannerConfig,
    candidates: Vec<Point2D>,
}

impl Planner {
    /// Create a planner; fails on invalid configuration.
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let candidates = candidate_velocities(config.candidate_count, config.max_speed);
        Ok(Self { config, candidates })
    }

    /// Planner configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Preferred velocities tried by the search, right to left
    pub fn candidates(&self) -> &[Point2D] {
        &self.candidates
    }

    /// Fresh search state for this planner
    pub fn initial_state(&self) -> PlannerState {
        PlannerState::new(self.config.candidate_count)
    }

    /// Candidate indices to try this tick.
    pub fn search_window(&self, state: &PlannerState) -> std::ops::RangeInclusive<usize> {
        let n = self.candidates.len();
        if state.last_magnitude < self.config.stuck_speed_threshold {
            0..=n - 1
        } else if state.last_index == 0 {
            0..=1
        } else if state.last_index >= n - 1 {
            n - 2..=n - 1
        } else {
            state.last_index - 1..=state.last_index + 1
        }
    }

    /// Plan one step.
    ///
    /// `velocity` is the agent's world-frame velocity and `pose` its pose;
    /// the result is in the agent frame. `state` is updated in place.
    pub fn plan(
        &self,
        range: &RangeObservation,
        velocity: Point2D,
        pose: &Pose2D,
        radius: f32,
        state: &mut PlannerState,
    ) -> PlanResult {
        let polygon = ObstaclePolygon::from_scan_points(range.hit_points());
        let local_velocity = pose.inverse_rotate(velocity);

        let window = self.search_window(state);
        trace!(
            "[Planner] window {:?}, last speed {:.1}, {} vertices",
            window,
            state.last_magnitude,
            polygon.vertices().len()
        );

        let best = pick_fastest(window.map(|index| {
            let chosen = self.simulate(&polygon, local_velocity, self.candidates[index], radius);
            (index, chosen)
        }));

        match best {
            Some((index, velocity, magnitude)) => {
                if index != state.last_index {
                    debug!(
                        "[Planner] candidate {} -> {} ({:.1})",
                        state.last_index, index, magnitude
                    );
                }
                state.record(Some((index, magnitude)));
                PlanResult::Velocity { velocity, index }
            }
            None => {
                warn!("[Planner] no feasible velocity, full sweep next tick");
                state.record(None);
                PlanResult::Infeasible
            }
        }
    }

    /// Motion command for a chosen agent-frame velocity.
    pub fn command(&self, velocity: Point2D) -> MotionCommand {
        MotionCommand::new(
            self.config.linear_gain * velocity.x,
            self.config.angular_gain * velocity.y,
        )
    }

    /// Run `sim_steps` ORCA updates from the origin for one preferred
    /// velocity and return the final velocity.
    fn simulate(
        &self,
        polygon: &ObstaclePolygon,
        velocity: Point2D,
        preferred: Point2D,
        radius: f32,
    ) -> Point2D {
        let mut agent = OrcaAgent {
            position: Point2D::ZERO,
            velocity,
            preferred,
            radius,
            max_speed: self.config.max_speed,
            time_horizon: self.config.time_horizon_obst,
        };
        for _ in 0..self.config.sim_steps {
            agent.velocity = compute_new_velocity(polygon, &agent);
            agent.position = agent.position + agent.velocity * self.config.time_step;
        }
        agent.velocity
    }
}

/// `count` velocities of magnitude `speed`, bearings evenly spaced over
/// [-π/2, π/2].
pub fn candidate_velocities(count: usize, speed: f32) -> Vec<Point2D> {
    use std::f32::consts::{FRAC_PI_2, PI};
    match count {
        0 => Vec::new(),
        1 => vec![Point2D::new(speed, 0.0)],
        n => {
            let step = PI / (n - 1) as f32;
            (0..n)
                .map(|i| Point2D::from_polar(speed, -FRAC_PI_2 + i as f32 * step))
                .collect()
        }
    }
}
