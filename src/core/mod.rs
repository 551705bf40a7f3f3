//! Core types shared by every layer of the crate.
//!
//! - [`Category`]: object class bit set and filtering masks
//! - [`Point2D`], [`Pose2D`]: positions, vectors and headings
//! - [`Segment2D`]: segment/circle intersection used by ray queries
//! - [`math`]: angle wrapping and differences
//!
//! Coordinates follow the usual robotics convention: X forward, Y left,
//! angles counter-clockwise positive.

mod category;
mod point;
mod pose;
mod segment;

pub mod math;

pub use category::Category;
pub use math::{angle_diff, normalize_angle, normalize_angle_positive, normalize_angle_upper};
pub use point::Point2D;
pub use pose::Pose2D;
pub use segment::Segment2D;
