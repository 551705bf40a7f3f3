//! Virtual sensors.
//!
//! Sensors are stateless: each scan is a pure function of the agent pose and
//! the borrowed world snapshot.
//!
//! - [`FanSensor`]: classified range fan ([`RangeObservation`])
//! - [`LandmarkSensor`]: landmark bearings ([`LandmarkObservation`])
//! - [`WorldQuery`]: what the sensors ask of the physics engine
//! - [`StaticWorld`]: in-memory [`WorldQuery`] for tests and offline runs

mod fan;
mod landmark;
mod world;

pub use fan::{FanSensor, FanSensorConfig, RangeObservation, RangeRay};
pub use landmark::{DetectedLandmark, LandmarkObservation, LandmarkSensor, LandmarkSensorConfig};
pub use world::{LandmarkRef, SegmentHit, StaticWorld, WorldCircle, WorldQuery, WorldSegment};
