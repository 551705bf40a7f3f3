//! Behavior selection from configuration.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::noise::NoiseGenerator;
use crate::planner::PlannerConfig;

use super::Controller;
use super::avoider::AvoiderController;
use super::centroid::{CentroidConfig, CentroidController};
use super::flow::{FlowConfig, FlowController};
use super::landmark_circle::{LandmarkCircleConfig, LandmarkCircleController};
use super::pushout::{PushoutConfig, PushoutController};
use super::reactive::{
    GauciConfig, GauciController, LeftmostConfig, LeftmostController, NearestFrontalConfig,
    NearestFrontalController, SimpleAvoiderConfig, SimpleAvoiderController, SingleRayClusterConfig,
    SingleRayClusterController,
};
use super::sector::{SectorConfig, SectorController};

/// Which controller an agent runs, with its parameters.
///
/// In YAML the variant is selected by `kind`:
///
/// ```yaml
/// behavior:
///   kind: gauci
///   puck_mask: "RED_PUCK | GREEN_PUCK"
///   front_angle_threshold: 0.2
/// ```
///
/// The avoider has no section of its own; it uses the root `planner`
/// section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorConfig {
    /// Multi-ray clustering
    Gauci(GauciConfig),
    /// Centre-ray clustering
    SingleRayCluster(SingleRayClusterConfig),
    /// Nearest frontal object clustering
    NearestFrontal(NearestFrontalConfig),
    /// Leftmost puck steering
    Leftmost(LeftmostConfig),
    /// Nearest-ray avoidance
    SimpleAvoider(SimpleAvoiderConfig),
    /// Attractant centroid steering
    Centroid(CentroidConfig),
    /// Landmark sector steering
    Sector(SectorConfig),
    /// PUSHING/HOMING machine
    Pushout(PushoutConfig),
    /// Outie/innie landmark circling
    LandmarkCircle(LandmarkCircleConfig),
    /// FLOW/WANDER/POKE machine
    Flow(FlowConfig),
    /// Velocity-obstacle planner
    Avoider,
}

impl BehaviorConfig {
    /// Variant name as written in YAML.
    pub fn kind(&self) -> &'static str {
        match self {
            BehaviorConfig::Gauci(_) => "gauci",
            BehaviorConfig::SingleRayCluster(_) => "single_ray_cluster",
            BehaviorConfig::NearestFrontal(_) => "nearest_frontal",
            BehaviorConfig::Leftmost(_) => "leftmost",
            BehaviorConfig::SimpleAvoider(_) => "simple_avoider",
            BehaviorConfig::Centroid(_) => "centroid",
            BehaviorConfig::Sector(_) => "sector",
            BehaviorConfig::Pushout(_) => "pushout",
            BehaviorConfig::LandmarkCircle(_) => "landmark_circle",
            BehaviorConfig::Flow(_) => "flow",
            BehaviorConfig::Avoider => "avoider",
        }
    }

    /// True for behaviors driven by the closest landmark.
    pub fn needs_landmarks(&self) -> bool {
        matches!(
            self,
            BehaviorConfig::Pushout(_) | BehaviorConfig::LandmarkCircle(_) | BehaviorConfig::Flow(_)
        )
    }

    /// Check the selected behavior's parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            BehaviorConfig::Gauci(c) => c.validate(),
            BehaviorConfig::SingleRayCluster(c) => c.validate(),
            BehaviorConfig::NearestFrontal(c) => c.validate(),
            BehaviorConfig::Leftmost(c) => c.validate(),
            BehaviorConfig::SimpleAvoider(c) => c.validate(),
            BehaviorConfig::Centroid(c) => c.validate(),
            BehaviorConfig::Sector(c) => c.validate(),
            BehaviorConfig::Pushout(c) => c.validate(),
            BehaviorConfig::LandmarkCircle(c) => c.validate(),
            BehaviorConfig::Flow(c) => c.validate(),
            BehaviorConfig::Avoider => Ok(()),
        }
    }

    /// Build a controller instance.
    ///
    /// `planner` is only read by the avoider. Random behaviors take
    /// ownership of `noise`.
    pub fn build(
        &self,
        planner: &PlannerConfig,
        noise: NoiseGenerator,
    ) -> Result<Box<dyn Controller>, ConfigError> {
        self.validate()?;
        let controller: Box<dyn Controller> = match self {
            BehaviorConfig::Gauci(c) => Box::new(GauciController::new(c.clone())),
            BehaviorConfig::SingleRayCluster(c) => {
                Box::new(SingleRayClusterController::new(c.clone()))
            }
            BehaviorConfig::NearestFrontal(c) => Box::new(NearestFrontalController::new(c.clone())),
            BehaviorConfig::Leftmost(c) => Box::new(LeftmostController::new(c.clone())),
            BehaviorConfig::SimpleAvoider(c) => Box::new(SimpleAvoiderController::new(c.clone())),
            BehaviorConfig::Centroid(c) => Box::new(CentroidController::new(c, noise)),
            BehaviorConfig::Sector(c) => Box::new(SectorController::new(c.clone(), noise)),
            BehaviorConfig::Pushout(c) => Box::new(PushoutController::new(c.clone(), noise)),
            BehaviorConfig::LandmarkCircle(c) => {
                Box::new(LandmarkCircleController::new(c.clone(), noise))
            }
            BehaviorConfig::Flow(c) => Box::new(FlowController::new(c.clone(), noise)),
            BehaviorConfig::Avoider => Box::new(AvoiderController::new(planner.clone())?),
        };
        info!("[Config] built {} controller", controller.name());
        Ok(controller)
    }
}
