//! Default value functions for serde deserialization.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::command::MotionCommand;
use crate::core::Category;

// Fan sensor

pub fn number_of_rays() -> usize {
    31
}

pub fn fan_angle_min() -> f32 {
    -FRAC_PI_2
}

pub fn fan_angle_max() -> f32 {
    FRAC_PI_2
}

pub fn fan_range_min() -> f32 {
    0.0
}

pub fn fan_range_max() -> f32 {
    200.0
}

// Landmark sensor

pub fn landmark_min_range() -> f32 {
    0.0
}

pub fn landmark_max_range() -> f32 {
    400.0
}

pub fn landmark_min_angle() -> f32 {
    -PI
}

pub fn landmark_max_angle() -> f32 {
    PI
}

pub fn any_landmark() -> Category {
    Category::ANY_LANDMARK
}

// Agent limits

pub fn max_linear_speed() -> f32 {
    100.0
}

pub fn max_angular_speed() -> f32 {
    2.0 * PI
}

// Planner

pub fn candidate_count() -> usize {
    11
}

pub fn planner_max_speed() -> f32 {
    100.0
}

pub fn time_step() -> f32 {
    1.0 / 60.0
}

pub fn time_horizon_obst() -> f32 {
    1.5
}

pub fn sim_steps() -> usize {
    1
}

pub fn stuck_speed_threshold() -> f32 {
    20.0
}

pub fn linear_gain() -> f32 {
    0.1
}

pub fn angular_gain() -> f32 {
    0.02
}

// Reactive rules

pub fn linear_speed() -> f32 {
    4.0
}

pub fn angular_speed() -> f32 {
    2.0
}

pub fn slow_factor() -> f32 {
    0.25
}

/// 10 degrees
pub fn front_angle_threshold() -> f32 {
    10f32.to_radians()
}

pub fn arc_shift_radius() -> f32 {
    200.0
}

pub fn arc_shift_angle() -> f32 {
    0.3
}

pub fn egress_angle() -> f32 {
    0.5
}

pub fn circle_radius() -> f32 {
    200.0
}

pub fn avoider_gain() -> f32 {
    1.0
}

pub fn single_ray_on_puck() -> MotionCommand {
    MotionCommand::new(4.0, 2.0)
}

pub fn single_ray_on_agent() -> MotionCommand {
    MotionCommand::new(0.5, -2.0)
}

pub fn single_ray_otherwise() -> MotionCommand {
    MotionCommand::new(4.0, -2.0)
}

pub fn latch_first_kind() -> bool {
    true
}

pub fn nearest_frontal_on_puck() -> MotionCommand {
    MotionCommand::new(4.0, -2.0)
}

pub fn nearest_frontal_on_agent() -> MotionCommand {
    MotionCommand::new(2.0, 2.0)
}

pub fn nearest_frontal_otherwise() -> MotionCommand {
    MotionCommand::new(4.0, 2.0)
}

// Centroid and sector

pub fn centroid_gain() -> f32 {
    1000.0
}

pub fn wander_span() -> f32 {
    5.0
}

pub fn sector_threshold() -> f32 {
    FRAC_PI_4
}

pub fn sector_linear_speed() -> f32 {
    10.0
}

pub fn sector_turn_rate() -> f32 {
    5.0
}

pub fn sector_fallback_gain() -> f32 {
    100.0
}

// Hysteresis machines

pub fn homing_timeout() -> u32 {
    30
}

pub fn inside_radius() -> f32 {
    150.0
}

pub fn outside_radius() -> f32 {
    250.0
}

pub fn outie_trans_prob() -> f32 {
    0.001
}

pub fn wander_prob() -> f32 {
    0.01
}

pub fn wander_mean() -> f32 {
    60.0
}

pub fn wander_sigma() -> f32 {
    20.0
}

pub fn poke_prob() -> f32 {
    0.05
}

pub fn poke_mean() -> f32 {
    30.0
}

pub fn poke_sigma() -> f32 {
    10.0
}
