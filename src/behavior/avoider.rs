//! Collision avoidance through the velocity-obstacle planner.

use log::warn;

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::observation::ObservationBundle;
use crate::planner::{PlanResult, Planner, PlannerConfig, PlannerState};
use crate::viz::{DebugSink, Rgb};

use super::{AgentState, Controller};

/// Drives along the fastest velocity the planner finds collision free.
///
/// An infeasible tick stops the agent; the previous velocity is never
/// reused.
pub struct AvoiderController {
    planner: Planner,
    state: PlannerState,
}

impl AvoiderController {
    /// Create the controller; fails on invalid planner configuration.
    pub fn new(config: PlannerConfig) -> Result<Self, ConfigError> {
        let planner = Planner::new(config)?;
        let state = planner.initial_state();
        Ok(Self { planner, state })
    }

    /// Search memory
    pub fn planner_state(&self) -> &PlannerState {
        &self.state
    }
}

impl Controller for AvoiderController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let result = self.planner.plan(
            bundle.range(),
            agent.velocity,
            &agent.pose,
            agent.radius,
            &mut self.state,
        );
        match result {
            PlanResult::Velocity { velocity, .. } => {
                sink.line_to(velocity, Rgb::GREEN);
                self.planner.command(velocity)
            }
            PlanResult::Infeasible => {
                warn!("[Avoider] infeasible, stopping");
                MotionCommand::zero()
            }
        }
    }

    fn name(&self) -> &'static str {
        "avoider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Point2D, Pose2D};
    use crate::sensor::{RangeObservation, RangeRay};
    use crate::viz::RecordingSink;
    use std::f32::consts::PI;

    #[test]
    fn test_open_space_drives_forward() {
        let mut c = AvoiderController::new(PlannerConfig::default()).unwrap();
        let rays = (0..36)
            .map(|i| RangeRay {
                angle: -PI + 2.0 * PI * i as f32 / 36.0,
                distance: 500.0,
                category: None,
            })
            .collect();
        let bundle = ObservationBundle::new(RangeObservation::new(rays, 0.0, 500.0, 10.0));
        let agent = AgentState::new(Pose2D::identity(), Point2D::ZERO, 10.0);
        let mut sink = RecordingSink::new();

        let cmd = c.react(&bundle, &agent, &mut sink);
        assert!(cmd.linear > 5.0, "linear {}", cmd.linear);
        assert_eq!(sink.primitives().len(), 1);
        assert!(c.planner_state().last_magnitude > 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig {
            candidate_count: 4,
            ..Default::default()
        };
        assert!(AvoiderController::new(config).is_err());
    }
}
