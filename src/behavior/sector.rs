//! Landmark-span sector steering.
//!
//! The fan is read as a circular array of "inside a landmark" flags. Each
//! maximal run of flagged rays is a span; the gaps between circularly
//! adjacent spans are sectors. The agent heads for the narrowest sector
//! that is still wider than a threshold, and falls back to the centroid
//! rule when there is none.
//!
//! ```text
//!  ray index   0 1 2 3 4 5 6 7 8 9
//!  landmark    x x . . . x . . x x      N = 10
//!  spans       [8..1]      [5..5]       (8,9,0,1 wrap into one span)
//! ```

use log::trace;
use serde::{Deserialize, Serialize};

use crate::command::MotionCommand;
use crate::config::ConfigError;
use crate::config::defaults;
use crate::config::error::{require_finite, require_non_negative, require_positive};
use crate::core::math::{forward_angle_diff, shortest_arc_midpoint, sign};
use crate::core::{Category, normalize_angle};
use crate::noise::NoiseGenerator;
use crate::observation::ObservationBundle;
use crate::sensor::RangeObservation;
use crate::viz::{DebugSink, Rgb};

use super::centroid::CentroidRule;
use super::{AgentState, Controller};

const SECTION: &str = "behavior.sector";

/// Maximal run of landmark rays, inclusive at both ends.
///
/// A span that wraps past the last ray has `start > stop`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    /// Index of the first ray
    pub start: usize,
    /// Index of the last ray
    pub stop: usize,
    /// Angle of the first ray
    pub start_angle: f32,
    /// Angle of the last ray
    pub stop_angle: f32,
}

impl Span {
    fn from_indices(range: &RangeObservation, start: usize, stop: usize) -> Self {
        let angle = |i: usize| range.ray(i).map_or(0.0, |r| r.angle);
        Self {
            start,
            stop,
            start_angle: angle(start),
            stop_angle: angle(stop),
        }
    }

    /// Midpoint of the shorter arc between the span's end rays.
    pub fn midpoint(&self) -> f32 {
        shortest_arc_midpoint(self.start_angle, self.stop_angle)
    }
}

/// Spans of rays whose category intersects `mask`.
///
/// A run touching both ray 0 and ray N-1 is reported once, first, starting
/// at its true beginning near the end of the array. A fan that is entirely
/// inside landmarks is one span `0..=N-1`.
pub fn landmark_spans(range: &RangeObservation, mask: Category) -> Vec<Span> {
    let n = range.len();
    let inside = |i: usize| range.ray(i).is_some_and(|r| r.matches(mask));
    if n == 0 {
        return Vec::new();
    }
    if (0..n).all(inside) {
        return vec![Span::from_indices(range, 0, n - 1)];
    }

    // At least one ray is clear, so the backward walk stops above 0
    let wrap_start = (inside(0) && inside(n - 1)).then(|| {
        let mut j = n - 1;
        while j > 0 && inside(j - 1) {
            j -= 1;
        }
        j
    });

    let mut spans = Vec::new();
    let mut i = 0;
    while i < n {
        if !inside(i) {
            i += 1;
            continue;
        }
        let start = i;
        while i + 1 < n && inside(i + 1) {
            i += 1;
        }
        let stop = i;
        i += 1;

        match wrap_start {
            Some(ws) if start == 0 => spans.push(Span::from_indices(range, ws, stop)),
            Some(ws) if start == ws => {}
            _ => spans.push(Span::from_indices(range, start, stop)),
        }
    }
    spans
}

/// Width of the sector after each span: counter-clockwise from the end of
/// span k to the start of span k+1 (circularly), in [0, 2π).
pub fn sector_widths(spans: &[Span]) -> Vec<f32> {
    let m = spans.len();
    (0..m)
        .map(|k| forward_angle_diff(spans[(k + 1) % m].start_angle, spans[k].stop_angle))
        .collect()
}

/// Sector controller configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorConfig {
    /// Categories steered toward by the centroid fallback
    pub attractant_mask: Category,

    /// Categories that form spans
    #[serde(default = "defaults::any_landmark")]
    pub landmark_mask: Category,

    /// Sectors must be wider than this (radians)
    #[serde(default = "defaults::sector_threshold")]
    pub threshold: f32,

    /// Forward speed
    #[serde(default = "defaults::sector_linear_speed")]
    pub linear_speed: f32,

    /// Turn rate magnitude toward the chosen sector
    #[serde(default = "defaults::sector_turn_rate")]
    pub turn_rate: f32,

    /// Centroid gain when no sector qualifies
    #[serde(default = "defaults::sector_fallback_gain")]
    pub fallback_gain: f32,

    /// Random turn span when the fallback sees nothing (0 = straight)
    #[serde(default)]
    pub wander_span: f32,
}

impl SectorConfig {
    /// Config with defaults.
    pub fn new(attractant_mask: Category) -> Self {
        Self {
            attractant_mask,
            landmark_mask: defaults::any_landmark(),
            threshold: defaults::sector_threshold(),
            linear_speed: defaults::sector_linear_speed(),
            turn_rate: defaults::sector_turn_rate(),
            fallback_gain: defaults::sector_fallback_gain(),
            wander_span: 0.0,
        }
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attractant_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: SECTION,
                field: "attractant_mask",
            });
        }
        if self.landmark_mask.is_empty() {
            return Err(ConfigError::EmptyMask {
                section: SECTION,
                field: "landmark_mask",
            });
        }
        require_positive(SECTION, "threshold", self.threshold)?;
        require_finite(SECTION, "linear_speed", self.linear_speed)?;
        require_finite(SECTION, "turn_rate", self.turn_rate)?;
        require_finite(SECTION, "fallback_gain", self.fallback_gain)?;
        require_non_negative(SECTION, "wander_span", self.wander_span)
    }
}

/// Steers into the narrowest sufficiently wide gap between landmarks.
pub struct SectorController {
    config: SectorConfig,
    fallback: CentroidRule,
    noise: NoiseGenerator,
}

impl SectorController {
    /// Create the controller.
    pub fn new(config: SectorConfig, noise: NoiseGenerator) -> Self {
        let fallback = CentroidRule {
            linear_speed: config.linear_speed,
            gain: config.fallback_gain,
            wander_span: config.wander_span,
        };
        Self {
            config,
            fallback,
            noise,
        }
    }

    /// Bisector of the chosen sector, if one qualifies.
    pub fn sector_bearing(&self, range: &RangeObservation) -> Option<f32> {
        let spans = landmark_spans(range, self.config.landmark_mask);
        if spans.is_empty() {
            return None;
        }
        let widths = sector_widths(&spans);

        let mut chosen: Option<(usize, f32)> = None;
        for (k, &width) in widths.iter().enumerate() {
            if width > self.config.threshold && chosen.is_none_or(|(_, w)| width < w) {
                chosen = Some((k, width));
            }
        }
        let (k, width) = chosen?;

        let next = spans[(k + 1) % spans.len()].midpoint();
        let prev = spans[k].midpoint();
        let bearing = shortest_arc_midpoint(next, prev);
        trace!(
            "[Sector] {} spans, sector {} width {:.2}, bearing {:.2}",
            spans.len(),
            k,
            width,
            bearing
        );
        Some(bearing)
    }
}

impl Controller for SectorController {
    fn react(
        &mut self,
        bundle: &ObservationBundle,
        _agent: &AgentState,
        sink: &mut dyn DebugSink,
    ) -> MotionCommand {
        match self.sector_bearing(bundle.range()) {
            Some(bearing) => {
                sink.bearing(bearing, bundle.range().range_max(), Rgb::MAGENTA);
                MotionCommand::new(
                    self.config.linear_speed,
                    self.config.turn_rate * sign(normalize_angle(bearing)),
                )
            }
            None => self.fallback.command(
                bundle.range(),
                self.config.attractant_mask,
                &mut self.noise,
                sink,
            ),
        }
    }

    fn name(&self) -> &'static str {
        "sector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::TWO_PI;
    use crate::sensor::RangeRay;
    use crate::viz::NullSink;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    /// Full-circle fan of `n` rays with landmarks at `marked` indices.
    fn circle_fan(n: usize, marked: &[usize]) -> RangeObservation {
        let rays = (0..n)
            .map(|i| RangeRay {
                angle: -PI + TWO_PI * i as f32 / n as f32,
                distance: if marked.contains(&i) { 30.0 } else { 100.0 },
                category: marked.contains(&i).then_some(Category::ARC_LANDMARK),
            })
            .collect();
        RangeObservation::new(rays, 0.0, 100.0, 10.0)
    }

    #[test]
    fn test_wraparound_is_one_span() {
        let range = circle_fan(10, &[8, 9, 0, 1]);
        let spans = landmark_spans(&range, Category::ANY_LANDMARK);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].stop), (8, 1));
    }

    #[test]
    fn test_spans_in_walk_order() {
        let range = circle_fan(10, &[0, 1, 5, 8, 9]);
        let spans = landmark_spans(&range, Category::ANY_LANDMARK);
        let bounds: Vec<_> = spans.iter().map(|s| (s.start, s.stop)).collect();
        assert_eq!(bounds, vec![(8, 1), (5, 5)]);

        let range = circle_fan(10, &[2, 3, 6]);
        let bounds: Vec<_> = landmark_spans(&range, Category::ANY_LANDMARK)
            .iter()
            .map(|s| (s.start, s.stop))
            .collect();
        assert_eq!(bounds, vec![(2, 3), (6, 6)]);
    }

    #[test]
    fn test_degenerate_spans() {
        assert!(landmark_spans(&circle_fan(10, &[]), Category::ANY_LANDMARK).is_empty());
        let all: Vec<usize> = (0..10).collect();
        let spans = landmark_spans(&circle_fan(10, &all), Category::ANY_LANDMARK);
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].stop), (0, 9));
        assert!(landmark_spans(&RangeObservation::default(), Category::ANY_LANDMARK).is_empty());
    }

    #[test]
    fn test_sector_widths() {
        // Rays every 36°; spans [2..3] and [6..6]
        let range = circle_fan(10, &[2, 3, 6]);
        let spans = landmark_spans(&range, Category::ANY_LANDMARK);
        let widths = sector_widths(&spans);
        let step = TWO_PI / 10.0;
        assert_relative_eq!(widths[0], 3.0 * step, epsilon = 1e-4);
        assert_relative_eq!(widths[1], 6.0 * step, epsilon = 1e-4);
    }

    #[test]
    fn test_picks_narrowest_wide_sector() {
        // Gap 3..6 (108°) beats gap 6..2 (216°); both exceed 45°
        let range = circle_fan(10, &[2, 3, 6]);
        let controller = SectorController::new(
            SectorConfig::new(Category::ANY_PUCK),
            NoiseGenerator::new(1),
        );
        let bearing = controller.sector_bearing(&range).unwrap();
        // Bisector of span [6..6] and the middle of span [2..3]
        let step = TWO_PI / 10.0;
        let a = -PI + 6.0 * step;
        let b = -PI + 2.5 * step;
        assert_relative_eq!(bearing, shortest_arc_midpoint(a, b), epsilon = 1e-4);
    }

    #[test]
    fn test_turns_toward_sector() {
        let range = circle_fan(10, &[2, 3, 6]);
        let mut controller = SectorController::new(
            SectorConfig::new(Category::ANY_PUCK),
            NoiseGenerator::new(1),
        );
        let bundle = ObservationBundle::new(range);
        let cmd = controller.react(&bundle, &AgentState::default(), &mut NullSink);
        assert_relative_eq!(cmd.linear, 10.0);
        assert_relative_eq!(cmd.angular.abs(), 5.0);
    }

    #[test]
    fn test_fallback_without_spans() {
        let rays = vec![
            RangeRay {
                angle: -0.3,
                distance: 100.0,
                category: None,
            },
            RangeRay {
                angle: 0.3,
                distance: 9.0,
                category: Some(Category::RED_PUCK),
            },
        ];
        let bundle = ObservationBundle::new(RangeObservation::new(rays, 0.0, 100.0, 10.0));
        let mut controller = SectorController::new(
            SectorConfig::new(Category::ANY_PUCK),
            NoiseGenerator::new(1),
        );
        let cmd = controller.react(&bundle, &AgentState::default(), &mut NullSink);
        let expected = 100.0 * (0.3f32.sin() / 10.0) / 2.0;
        assert_relative_eq!(cmd.angular, expected, epsilon = 1e-4);
        assert_relative_eq!(cmd.linear, 10.0);
    }

    #[test]
    fn test_no_wide_sector_falls_back() {
        let mut config = SectorConfig::new(Category::ANY_PUCK);
        config.threshold = 7.0;
        let mut controller = SectorController::new(config, NoiseGenerator::new(1));
        assert!(controller.sector_bearing(&circle_fan(10, &[2, 3, 6])).is_none());
        let bundle = ObservationBundle::new(circle_fan(10, &[2, 3, 6]));
        let cmd = controller.react(&bundle, &AgentState::default(), &mut NullSink);
        assert_relative_eq!(cmd.angular, 0.0);
    }
}
