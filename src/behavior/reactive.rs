//! Reactive clustering rules.
//!
//! Each rule looks at the rays around the forward direction, decides
//! whether it is facing an attractant (puck) or another agent, and picks
//! one of three fixed commands. Agent avoidance always beats attraction:
//! [`Reaction`] has a single variant per tick, so both can never fire.

use std::f32::consts::FRAC_PI_4;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_positive};
use crate::core::{Category, normalize_angle};
use crate::observation::ObservationBundle;
use crate::sensor::{RangeObservation, RangeRay};
use crate::viz::{DebugSink, Rgb};

use super::{AgentState, Controller};

/// What the frontal rays show this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reaction {
    /// An attractant ahead and no agent
    Puck,
    /// An agent ahead
    Agent,
    /// Nothing of interest ahead
    Neither,
}

impl Reaction {
    fn from_flags(puck: bool, agent: bool) -> Self {
        if agent {
            Reaction::Agent
        } else if puck {
            Reaction::Puck
        } else {
            Reaction::Neither
        }
    }
}

fn require_mask(section: &'static str, field: &'static str, mask: Category) -> Result<(), ConfigError> {
    if mask.is_empty() {
        Err(ConfigError::EmptyMask { section, field })
    } else {
        Ok(())
    }
}

/// Speeds shared by the multi-ray rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReactiveSpeeds {
    /// Forward speed
    #[serde(default = "defaults::linear_speed")]
    pub linear_speed: f32,

    /// Magnitude of every turn
    #[serde(default = "defaults::angular_speed")]
    pub angular_speed: f32,

    /// Linear speed multiplier when an agent is ahead
    #[serde(default = "defaults::slow_factor")]
    pub slow_factor: f32,

    /// Half-width of the frontal cone (radians)
    #[serde(default = "defaults::front_angle_threshold")]
    pub front_angle_threshold: f32,
}

impl Default for ReactiveSpeeds {
    fn default() -> Self {
        Self {
            linear_speed: defaults::linear_speed(),
            angular_speed: defaults::angular_speed(),
            slow_factor: defaults::slow_factor(),
            front_angle_threshold: defaults::front_angle_threshold(),
        }
    }
}

impl ReactiveSpeeds {
    fn validate(&self, section: &'static str) -> Result<(), ConfigError> {
        require_finite(section, "linear_speed", self.linear_speed)?;
        require_finite(section, "angular_speed", self.angular_speed)?;
        require_non_negative(section, "slow_factor", self.slow_factor)?;
        require_positive(section, "front_angle_threshold", self.front_angle_threshold)
    }
}

/// Puck → turn left, agent → slow down and turn left, neither → turn right.
pub fn gauci_rule(reaction: Reaction, speeds: &ReactiveSpeeds) -> MotionCommand {
    match reaction {
        Reaction::Puck => MotionCommand::new(speeds.linear_speed, speeds.angular_speed),
        Reaction::Agent => MotionCommand::new(
            speeds.linear_speed * speeds.slow_factor,
            speeds.angular_speed,
        ),
        Reaction::Neither => MotionCommand::new(speeds.linear_speed, -speeds.angular_speed),
    }
}

/// Classify the rays with `|angle + shift| < threshold`.
pub fn frontal_reaction(
    range: &RangeObservation,
    puck_mask: Category,
    threshold: f32,
    shift: f32,
) -> Reaction {
    let mut puck = false;
    let mut agent = false;
    for ray in range
        .rays()
        .iter()
        .filter(|ray| (ray.angle + shift).abs() < threshold)
    {
        agent |= ray.is(Category::AGENT);
        puck |= ray.matches(puck_mask);
    }
    Reaction::from_flags(puck, agent)
}

// ---------------------------------------------------------------------------
// Gauci
// ---------------------------------------------------------------------------

/// Gauci multi-ray rule configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GauciConfig {
    /// Categories treated as attractants
    pub puck_mask: Category,

    /// Speeds and frontal cone
    #[serde(flatten)]
    pub speeds: ReactiveSpeeds,

    /// Arc landmark distance below which the cone is shifted
    #[serde(default = "defaults::arc_shift_radius")]
    pub arc_shift_radius: f32,

    /// Cone shift applied near an arc landmark (radians)
    #[serde(default = "defaults::arc_shift_angle")]
    pub arc_shift_angle: f32,
}

impl GauciConfig {
    /// Config with default speeds.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            speeds: ReactiveSpeeds::default(),
            arc_shift_radius: defaults::arc_shift_radius(),
            arc_shift_angle: defaults::arc_shift_angle(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "behavior.gauci";
        require_mask(SECTION, "puck_mask", self.puck_mask)?;
        self.speeds.validate(SECTION)?;
        require_non_negative(SECTION, "arc_shift_radius", self.arc_shift_radius)?;
        require_finite(SECTION, "arc_shift_angle", self.arc_shift_angle)
    }
}

/// Gauci clustering controller.
pub struct GauciController {
    config: GauciConfig,
}

impl GauciController {
    /// Create the controller
    pub fn new(config: GauciConfig) -> Self {
        Self { config }
    }

    fn centre_shift(&self, bundle: &ObservationBundle) -> f32 {
        match bundle.closest_landmark(Category::ARC_LANDMARK) {
            Some(arc) if arc.distance < self.config.arc_shift_radius => self.config.arc_shift_angle,
            _ => 0.0,
        }
    }
}

impl Controller for GauciController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let shift = self.centre_shift(bundle);
        let threshold = self.config.speeds.front_angle_threshold;
        let reaction = frontal_reaction(bundle.range(), self.config.puck_mask, threshold, shift);

        let length = bundle.range().range_max();
        sink.bearing(threshold - shift, length, Rgb::WHITE);
        sink.bearing(-threshold - shift, length, Rgb::WHITE);

        gauci_rule(reaction, &self.config.speeds)
    }

    fn name(&self) -> &'static str {
        "gauci"
    }
}

// ---------------------------------------------------------------------------
// Single ray
// ---------------------------------------------------------------------------

/// Single forward ray rule configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingleRayClusterConfig {
    /// Categories treated as attractants
    pub puck_mask: Category,

    /// Command when the ray sees a puck
    #[serde(default = "defaults::single_ray_on_puck")]
    pub on_puck: MotionCommand,

    /// Command when the ray sees an agent
    #[serde(default = "defaults::single_ray_on_agent")]
    pub on_agent: MotionCommand,

    /// Command otherwise
    #[serde(default = "defaults::single_ray_otherwise")]
    pub otherwise: MotionCommand,

    /// Only the first puck kind ever seen counts as a puck afterwards
    #[serde(default = "defaults::latch_first_kind")]
    pub latch_first_kind: bool,
}

impl SingleRayClusterConfig {
    /// Config with default commands.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            on_puck: defaults::single_ray_on_puck(),
            on_agent: defaults::single_ray_on_agent(),
            otherwise: defaults::single_ray_otherwise(),
            latch_first_kind: defaults::latch_first_kind(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "behavior.single_ray_cluster";
        require_mask(SECTION, "puck_mask", self.puck_mask)?;
        for (field, cmd) in [
            ("on_puck", &self.on_puck),
            ("on_agent", &self.on_agent),
            ("otherwise", &self.otherwise),
        ] {
            require_finite(SECTION, field, cmd.linear)?;
            require_finite(SECTION, field, cmd.angular)?;
        }
        Ok(())
    }
}

/// Clusters pucks using only the centre ray.
pub struct SingleRayClusterController {
    config: SingleRayClusterConfig,
    latched: Option<Category>,
}

impl SingleRayClusterController {
    /// Create the controller
    pub fn new(config: SingleRayClusterConfig) -> Self {
        Self {
            config,
            latched: None,
        }
    }

    /// Puck kind latched so far
    pub fn latched_kind(&self) -> Option<Category> {
        self.latched
    }

    fn classify(&mut self, ray: &RangeRay) -> Reaction {
        let mut puck = false;
        if let Some(category) = ray.category.filter(|c| c.matches(self.config.puck_mask)) {
            if self.config.latch_first_kind {
                let kind = *self.latched.get_or_insert_with(|| {
                    trace!("[Cluster] latched puck kind {}", category.name());
                    category
                });
                puck = category == kind;
            } else {
                puck = true;
            }
        }
        Reaction::from_flags(puck, ray.is(Category::AGENT))
    }
}

impl Controller for SingleRayClusterController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let reaction = match bundle.range().centre_ray().copied() {
            Some(ray) => {
                sink.bearing(ray.angle, ray.distance, Rgb::YELLOW);
                self.classify(&ray)
            }
            None => Reaction::Neither,
        };
        match reaction {
            Reaction::Puck => self.config.on_puck,
            Reaction::Agent => self.config.on_agent,
            Reaction::Neither => self.config.otherwise,
        }
    }

    fn name(&self) -> &'static str {
        "single_ray_cluster"
    }
}

// ---------------------------------------------------------------------------
// Nearest frontal
// ---------------------------------------------------------------------------

/// Nearest-frontal rule configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NearestFrontalConfig {
    /// Categories treated as attractants
    pub puck_mask: Category,

    /// Rays with |angle| at most this are frontal (radians)
    #[serde(default = "defaults::front_angle_threshold")]
    pub front_angle_threshold: f32,

    /// Command when the nearest frontal object is a puck
    #[serde(default = "defaults::nearest_frontal_on_puck")]
    pub on_puck: MotionCommand,

    /// Command when the nearest frontal object is an agent
    #[serde(default = "defaults::nearest_frontal_on_agent")]
    pub on_agent: MotionCommand,

    /// Command otherwise
    #[serde(default = "defaults::nearest_frontal_otherwise")]
    pub otherwise: MotionCommand,
}

impl NearestFrontalConfig {
    /// Config with default commands.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            front_angle_threshold: defaults::front_angle_threshold(),
            on_puck: defaults::nearest_frontal_on_puck(),
            on_agent: defaults::nearest_frontal_on_agent(),
            otherwise: defaults::nearest_frontal_otherwise(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "behavior.nearest_frontal";
        require_mask(SECTION, "puck_mask", self.puck_mask)?;
        require_positive(SECTION, "front_angle_threshold", self.front_angle_threshold)?;
        for (field, cmd) in [
            ("on_puck", &self.on_puck),
            ("on_agent", &self.on_agent),
            ("otherwise", &self.otherwise),
        ] {
            require_finite(SECTION, field, cmd.linear)?;
            require_finite(SECTION, field, cmd.angular)?;
        }
        Ok(())
    }
}

/// Most central frontal ray passing `keep`.
fn most_central<'a>(
    rays: &'a [RangeRay],
    threshold: f32,
    keep: impl Fn(&RangeRay) -> bool,
) -> Option<&'a RangeRay> {
    rays.iter()
        .filter(|ray| ray.angle.abs() <= threshold && keep(ray))
        .fold(None, |best: Option<&RangeRay>, ray| match best {
            Some(b) if b.angle.abs() <= ray.angle.abs() => Some(b),
            _ => Some(ray),
        })
}

/// Reacts to whichever of puck or agent is nearer in the frontal cone.
pub struct NearestFrontalController {
    config: NearestFrontalConfig,
}

impl NearestFrontalController {
    /// Create the controller
    pub fn new(config: NearestFrontalConfig) -> Self {
        Self { config }
    }

    fn classify(&self, range: &RangeObservation) -> Reaction {
        let threshold = self.config.front_angle_threshold;
        let puck = most_central(range.rays(), threshold, |r| r.matches(self.config.puck_mask));
        let agent = most_central(range.rays(), threshold, |r| r.is(Category::AGENT));
        match (puck, agent) {
            (Some(p), Some(a)) if p.distance < a.distance => Reaction::Puck,
            (_, Some(_)) => Reaction::Agent,
            (Some(_), None) => Reaction::Puck,
            (None, None) => Reaction::Neither,
        }
    }
}

impl Controller for NearestFrontalController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        _sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        match self.classify(bundle.range()) {
            Reaction::Puck => self.config.on_puck,
            Reaction::Agent => self.config.on_agent,
            Reaction::Neither => self.config.otherwise,
        }
    }

    fn name(&self) -> &'static str {
        "nearest_frontal"
    }
}

// ---------------------------------------------------------------------------
// Leftmost
// ---------------------------------------------------------------------------

/// Leftmost-puck rule configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeftmostConfig {
    /// Categories treated as attractants
    pub puck_mask: Category,

    /// Speeds (the frontal cone is unused)
    #[serde(flatten)]
    pub speeds: ReactiveSpeeds,

    /// Bias the target by heading (compass modulation)
    #[serde(default)]
    pub modulate: bool,

    /// Subtracted from the target when cos(2·heading) < 0
    #[serde(default)]
    pub ingress_angle: f32,

    /// Added to the target near a landmark, and when cos(2·heading) ≥ 0
    #[serde(default = "defaults::egress_angle")]
    pub egress_angle: f32,

    /// Landmark distance below which the egress bias applies
    #[serde(default = "defaults::circle_radius")]
    pub circle_radius: f32,
}

impl LeftmostConfig {
    /// Config with default speeds and no modulation.
    pub fn new(puck_mask: Category) -> Self {
        Self {
            puck_mask,
            speeds: ReactiveSpeeds::default(),
            modulate: false,
            ingress_angle: 0.0,
            egress_angle: defaults::egress_angle(),
            circle_radius: defaults::circle_radius(),
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "behavior.leftmost";
        require_mask(SECTION, "puck_mask", self.puck_mask)?;
        self.speeds.validate(SECTION)?;
        require_finite(SECTION, "ingress_angle", self.ingress_angle)?;
        require_finite(SECTION, "egress_angle", self.egress_angle)?;
        require_non_negative(SECTION, "circle_radius", self.circle_radius)
    }
}

/// Steers so the leftmost visible puck ends up to the right.
pub struct LeftmostController {
    config: LeftmostConfig,
}

impl LeftmostController {
    /// Create the controller
    pub fn new(config: LeftmostConfig) -> Self {
        Self { config }
    }

    /// Biased angle of the leftmost puck ray, if any.
    fn target_angle(&self, bundle: &ObservationBundle, heading: f32) -> Option<f32> {
        let range = bundle.range();
        let mut target = range
            .leftmost_matching(self.config.puck_mask)
            .and_then(|i| range.ray(i))
            .map(|ray| ray.angle)?;

        if bundle
            .closest_landmark(Category::ANY_LANDMARK)
            .is_some_and(|l| l.distance < self.config.circle_radius)
        {
            target += self.config.egress_angle;
        }
        if self.config.modulate {
            if (2.0 * normalize_angle(heading)).cos() < 0.0 {
                target -= self.config.ingress_angle;
            } else {
                target += self.config.egress_angle;
            }
        }
        Some(target)
    }
}

impl Controller for LeftmostController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let speeds = &self.config.speeds;
        let agent_ahead = bundle.range().rays().iter().any(|ray| {
            ray.is(Category::AGENT)
                && ray.angle.abs() < FRAC_PI_4
                && ray.distance < 2.0 * agent.radius
        });
        if agent_ahead {
            return MotionCommand::new(speeds.linear_speed * speeds.slow_factor, speeds.angular_speed);
        }

        match self.target_angle(bundle, agent.pose.theta) {
            Some(target) if target > 0.0 => {
                sink.bearing(target, bundle.range().range_max(), Rgb::RED);
                MotionCommand::new(speeds.linear_speed, speeds.angular_speed)
            }
            _ => MotionCommand::new(speeds.linear_speed, -speeds.angular_speed),
        }
    }

    fn name(&self) -> &'static str {
        "leftmost"
    }
}

// ---------------------------------------------------------------------------
// Simple avoider
// ---------------------------------------------------------------------------

/// Nearest-ray avoider configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleAvoiderConfig {
    /// Forward speed
    #[serde(default = "defaults::linear_speed")]
    pub linear_speed: f32,

    /// Turn rate numerator: angular = -gain / angle
    #[serde(default = "defaults::avoider_gain")]
    pub gain: f32,
}

impl Default for SimpleAvoiderConfig {
    fn default() -> Self {
        Self {
            linear_speed: defaults::linear_speed(),
            gain: defaults::avoider_gain(),
        }
    }
}

impl SimpleAvoiderConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const SECTION: &str = "behavior.simple_avoider";
        require_finite(SECTION, "linear_speed", self.linear_speed)?;
        require_finite(SECTION, "gain", self.gain)
    }
}

/// Turns away from the nearest hit, harder the more central it is.
pub struct SimpleAvoiderController {
    config: SimpleAvoiderConfig,
}

impl SimpleAvoiderController {
    /// Create the controller
    pub fn new(config: SimpleAvoiderConfig) -> Self {
        Self { config }
    }
}

impl Controller for SimpleAvoiderController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        _sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        let range = bundle.range();
        let nearest = range
            .rays()
            .iter()
            .filter(|ray| ray.distance < range.range_max())
            .fold(None, |best: Option<&RangeRay>, ray| match best {
                Some(b) if b.distance <= ray.distance => Some(b),
                _ => Some(ray),
            });

        let angular = match nearest {
            Some(ray) if ray.angle != 0.0 => -self.config.gain / ray.angle,
            _ => 0.0,
        };
        MotionCommand::new(self.config.linear_speed, angular)
    }

    fn name(&self) -> &'static str {
        "simple_avoider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pose2D;
    use crate::sensor::{DetectedLandmark, LandmarkObservation};
    use crate::viz::NullSink;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn ray(angle: f32, distance: f32, category: Option<Category>) -> RangeRay {
        RangeRay {
            angle,
            distance,
            category,
        }
    }

    fn bundle(rays: Vec<RangeRay>) -> ObservationBundle {
        ObservationBundle::new(RangeObservation::new(rays, 0.0, 100.0, 10.0))
    }

    fn agent() -> AgentState {
        AgentState::new(Pose2D::identity(), Default::default(), 10.0)
    }

    #[test]
    fn test_agent_beats_puck() {
        let range = RangeObservation::new(
            vec![
                ray(-0.05, 20.0, Some(Category::RED_PUCK)),
                ray(0.05, 30.0, Some(Category::AGENT)),
            ],
            0.0,
            100.0,
            10.0,
        );
        let reaction = frontal_reaction(&range, Category::ANY_PUCK, 0.17, 0.0);
        assert_eq!(reaction, Reaction::Agent);
    }

    #[test]
    fn test_gauci_commands() {
        let mut c = GauciController::new(GauciConfig::new(Category::ANY_PUCK));

        let puck = bundle(vec![ray(0.0, 20.0, Some(Category::BLUE_PUCK))]);
        assert_eq!(
            c.react(&puck, &agent(), &mut NullSink),
            MotionCommand::new(4.0, 2.0)
        );

        let other = bundle(vec![ray(0.0, 20.0, Some(Category::AGENT))]);
        assert_eq!(
            c.react(&other, &agent(), &mut NullSink),
            MotionCommand::new(1.0, 2.0)
        );

        let empty = bundle(vec![ray(0.0, 100.0, None), ray(1.0, 5.0, Some(Category::RED_PUCK))]);
        assert_eq!(
            c.react(&empty, &agent(), &mut NullSink),
            MotionCommand::new(4.0, -2.0)
        );
    }

    #[test]
    fn test_gauci_arc_shift() {
        let mut c = GauciController::new(GauciConfig::new(Category::ANY_PUCK));
        // Puck at -0.3 is outside the unshifted cone but centred once shifted
        let rays = vec![ray(-0.3, 20.0, Some(Category::RED_PUCK))];
        let far = bundle(rays.clone());
        assert_relative_eq!(c.react(&far, &agent(), &mut NullSink).angular, -2.0);

        let near_arc = ObservationBundle::with_landmarks(
            far.range().clone(),
            LandmarkObservation::new(vec![DetectedLandmark {
                distance: 150.0,
                angle: 1.0,
                category: Category::ARC_LANDMARK,
            }]),
        );
        assert_relative_eq!(c.react(&near_arc, &agent(), &mut NullSink).angular, 2.0);
    }

    #[test]
    fn test_single_ray_latches_first_kind() {
        let mut c = SingleRayClusterController::new(SingleRayClusterConfig::new(Category::ANY_PUCK));
        let side = ray(-1.0, 100.0, None);

        let red = bundle(vec![side, ray(0.0, 20.0, Some(Category::RED_PUCK)), side]);
        assert_eq!(c.react(&red, &agent(), &mut NullSink), MotionCommand::new(4.0, 2.0));
        assert_eq!(c.latched_kind(), Some(Category::RED_PUCK));

        let green = bundle(vec![side, ray(0.0, 20.0, Some(Category::GREEN_PUCK)), side]);
        assert_eq!(c.react(&green, &agent(), &mut NullSink), MotionCommand::new(4.0, -2.0));

        let other = bundle(vec![side, ray(0.0, 20.0, Some(Category::AGENT)), side]);
        assert_eq!(c.react(&other, &agent(), &mut NullSink), MotionCommand::new(0.5, -2.0));
    }

    #[test]
    fn test_single_ray_empty_fan() {
        let mut c = SingleRayClusterController::new(SingleRayClusterConfig::new(Category::ANY_PUCK));
        let cmd = c.react(&ObservationBundle::default(), &agent(), &mut NullSink);
        assert_eq!(cmd, MotionCommand::new(4.0, -2.0));
    }

    #[test]
    fn test_nearest_frontal_closer_wins() {
        let mut c = NearestFrontalController::new(NearestFrontalConfig::new(Category::ANY_PUCK));

        let puck_closer = bundle(vec![
            ray(-0.1, 20.0, Some(Category::RED_PUCK)),
            ray(0.1, 40.0, Some(Category::AGENT)),
        ]);
        assert_eq!(c.react(&puck_closer, &agent(), &mut NullSink), MotionCommand::new(4.0, -2.0));

        let agent_closer = bundle(vec![
            ray(-0.1, 40.0, Some(Category::RED_PUCK)),
            ray(0.1, 20.0, Some(Category::AGENT)),
        ]);
        assert_eq!(c.react(&agent_closer, &agent(), &mut NullSink), MotionCommand::new(2.0, 2.0));

        let outside = bundle(vec![ray(0.5, 5.0, Some(Category::AGENT))]);
        assert_eq!(c.react(&outside, &agent(), &mut NullSink), MotionCommand::new(4.0, 2.0));
    }

    #[test]
    fn test_leftmost_turns_toward_target_side() {
        let mut c = LeftmostController::new(LeftmostConfig::new(Category::ANY_PUCK));

        let left = bundle(vec![
            ray(-0.5, 30.0, Some(Category::RED_PUCK)),
            ray(0.4, 30.0, Some(Category::RED_PUCK)),
        ]);
        assert_eq!(c.react(&left, &agent(), &mut NullSink), MotionCommand::new(4.0, 2.0));

        let right = bundle(vec![ray(-0.5, 30.0, Some(Category::RED_PUCK)), ray(0.4, 100.0, None)]);
        assert_eq!(c.react(&right, &agent(), &mut NullSink), MotionCommand::new(4.0, -2.0));

        let nothing = bundle(vec![ray(0.0, 100.0, None)]);
        assert_eq!(c.react(&nothing, &agent(), &mut NullSink), MotionCommand::new(4.0, -2.0));
    }

    #[test]
    fn test_leftmost_egress_near_landmark() {
        let mut c = LeftmostController::new(LeftmostConfig::new(Category::ANY_PUCK));
        let range = RangeObservation::new(
            vec![ray(-0.3, 30.0, Some(Category::RED_PUCK))],
            0.0,
            100.0,
            10.0,
        );
        let near = ObservationBundle::with_landmarks(
            range,
            LandmarkObservation::new(vec![DetectedLandmark {
                distance: 50.0,
                angle: FRAC_PI_2,
                category: Category::POLE_LANDMARK,
            }]),
        );
        // -0.3 + 0.5 egress > 0
        assert_eq!(c.react(&near, &agent(), &mut NullSink), MotionCommand::new(4.0, 2.0));
    }

    #[test]
    fn test_leftmost_agent_close_ahead() {
        let mut c = LeftmostController::new(LeftmostConfig::new(Category::ANY_PUCK));
        let b = bundle(vec![
            ray(-0.5, 30.0, Some(Category::RED_PUCK)),
            ray(0.2, 15.0, Some(Category::AGENT)),
        ]);
        assert_eq!(c.react(&b, &agent(), &mut NullSink), MotionCommand::new(1.0, 2.0));
    }

    #[test]
    fn test_simple_avoider() {
        let mut c = SimpleAvoiderController::new(SimpleAvoiderConfig::default());
        let b = bundle(vec![
            ray(-0.5, 80.0, Some(Category::WALL)),
            ray(0.25, 40.0, Some(Category::WALL)),
            ray(1.0, 100.0, None),
        ]);
        let cmd = c.react(&b, &agent(), &mut NullSink);
        assert_relative_eq!(cmd.angular, -4.0);
        assert_relative_eq!(cmd.linear, 4.0);

        let straight = bundle(vec![ray(0.0, 10.0, Some(Category::WALL))]);
        assert_relative_eq!(c.react(&straight, &agent(), &mut NullSink).angular, 0.0);

        let clear = bundle(vec![ray(0.3, 100.0, None)]);
        assert_relative_eq!(c.react(&clear, &agent(), &mut NullSink).angular, 0.0);
    }

    #[test]
    fn test_config_yaml_flatten() {
        let config: GauciConfig =
            serde_yaml::from_str("puck_mask: \"RED_PUCK | GREEN_PUCK\"\nlinear_speed: 6.0\n").unwrap();
        assert_eq!(config.puck_mask, Category::RED_PUCK | Category::GREEN_PUCK);
        assert_relative_eq!(config.speeds.linear_speed, 6.0);
        assert_relative_eq!(config.speeds.angular_speed, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_mask_rejected() {
        assert!(GauciConfig::new(Category::empty()).validate().is_err());
        assert!(LeftmostConfig::new(Category::empty()).validate().is_err());
    }
}
