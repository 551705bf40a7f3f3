//! Test utilities for Jhund integration tests.
//!
//! Worlds, fans and observations shared by the scenario tests.

#![allow(dead_code)]

use std::f32::consts::PI;
use std::path::{Path, PathBuf};

use jhund::{
    Category, DetectedLandmark, FanSensorConfig, LandmarkObservation, MotionCommand,
    ObservationBundle, Point2D, Pose2D, RangeObservation, RangeRay, StaticWorld,
};

/// Route `log` output through the test harness.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Square arena of half-width `half` centred on the origin.
pub fn arena(half: f32) -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_box(Point2D::new(-half, -half), Point2D::new(half, half));
    world
}

/// Fan config detecting everything, with the given extent.
pub fn fan_config(rays: usize, angle_min: f32, angle_max: f32, range_max: f32) -> FanSensorConfig {
    FanSensorConfig::new(Category::all(), Category::all())
        .with_fan(rays, angle_min, angle_max)
        .with_range(0.0, range_max)
}

/// Full-circle fan: `n` rays from -π in steps of 2π/n.
pub fn full_circle_angles(n: usize) -> Vec<f32> {
    (0..n).map(|i| -PI + 2.0 * PI * i as f32 / n as f32).collect()
}

/// Observation built from `(angle, distance, category)` triples.
pub fn observation(rays: &[(f32, f32, Option<Category>)], range_max: f32) -> RangeObservation {
    let rays = rays
        .iter()
        .map(|&(angle, distance, category)| RangeRay {
            angle,
            distance,
            category,
        })
        .collect();
    RangeObservation::new(rays, 0.0, range_max, 10.0)
}

/// Full-circle observation with landmark hits at `marked` indices and
/// misses elsewhere.
pub fn landmark_ring(n: usize, marked: &[usize], range_max: f32) -> RangeObservation {
    let rays: Vec<_> = full_circle_angles(n)
        .into_iter()
        .enumerate()
        .map(|(i, angle)| {
            if marked.contains(&i) {
                (angle, range_max / 2.0, Some(Category::ARC_LANDMARK))
            } else {
                (angle, range_max, None)
            }
        })
        .collect();
    observation(&rays, range_max)
}

/// Bundle with a single detected landmark.
pub fn with_landmark(
    range: RangeObservation,
    distance: f32,
    angle: f32,
    category: Category,
) -> ObservationBundle {
    ObservationBundle::with_landmarks(
        range,
        LandmarkObservation::new(vec![DetectedLandmark {
            distance,
            angle,
            category,
        }]),
    )
}

/// Unicycle integration of one command over `dt`.
pub fn integrate(pose: Pose2D, command: MotionCommand, dt: f32) -> (Pose2D, Point2D) {
    let theta = pose.theta + command.angular * dt;
    let velocity = Point2D::from_angle(theta) * command.linear;
    let next = Pose2D::new(pose.x + velocity.x * dt, pose.y + velocity.y * dt, theta);
    (next, velocity)
}

/// Write `yaml` to `name` inside `dir` and return the path.
pub fn write_config(dir: &Path, name: &str, yaml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, yaml).unwrap();
    path
}
