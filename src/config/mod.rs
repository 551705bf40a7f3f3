//! Configuration loading for Jhund.
//!
//! Loads a whole swarm configuration from a single YAML file. Every numeric
//! parameter has a default; category masks that decide what a sensor or
//! behavior reacts to do not, so forgetting one fails at load time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jhund::config::JhundConfig;
//!
//! let config = JhundConfig::load(Path::new("configs/gauci.yaml"))?;
//! let mut swarm = Swarm::new();
//! swarm.spawn(&config, Pose2D::identity(), 10.0)?;
//! ```
//!
//! ## Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | `fan` | Ray count, angular extent, range window, detection/acceptance masks |
//! | `landmark_sensor` | Range and bearing windows (pushout, landmark_circle, flow) |
//! | `limits` | Linear/angular command clamps |
//! | `behavior` | Controller selected by `kind` plus its parameters |
//! | `planner` | Velocity-obstacle search (avoider only) |
//! | `seed` | RNG seed, 0 for OS entropy |
//!
//! ## Example YAML
//!
//! ```yaml
//! fan:
//!   number_of_rays: 31
//!   angle_min: -1.5708
//!   angle_max: 1.5708
//!   range_max: 200.0
//!   detection_mask: "WALL | AGENT | RED_PUCK | GREEN_PUCK"
//!
//! landmark_sensor:
//!   max_range: 400.0
//!
//! behavior:
//!   kind: flow
//!   puck_mask: "RED_PUCK | GREEN_PUCK"
//!   wander_prob: 0.01
//!   poke_mean: 30.0
//!
//! seed: 42
//! ```

pub(crate) mod defaults;
pub(crate) mod error;
mod jhund;

pub use error::ConfigError;
pub use jhund::JhundConfig;
