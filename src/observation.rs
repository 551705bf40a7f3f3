//! Per-tick observation bundle.

use crate::core::Category;
use crate::sensor::{DetectedLandmark, LandmarkObservation, RangeObservation};

/// Everything an agent sensed on one tick.
///
/// Built once per agent per tick and handed to the controller by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationBundle {
    range: RangeObservation,
    landmarks: Option<LandmarkObservation>,
}

impl ObservationBundle {
    /// Bundle with a range fan only.
    pub fn new(range: RangeObservation) -> Self {
        Self {
            range,
            landmarks: None,
        }
    }

    /// Bundle with both observations.
    pub fn with_landmarks(range: RangeObservation, landmarks: LandmarkObservation) -> Self {
        Self {
            range,
            landmarks: Some(landmarks),
        }
    }

    /// Range fan.
    pub fn range(&self) -> &RangeObservation {
        &self.range
    }

    /// Landmark bearings, when the agent carries a landmark sensor.
    pub fn landmarks(&self) -> Option<&LandmarkObservation> {
        self.landmarks.as_ref()
    }

    /// Landmark detections, empty when no landmark sensor is fitted.
    pub fn landmark_list(&self) -> &[DetectedLandmark] {
        self.landmarks.as_ref().map_or(&[], |obs| obs.landmarks())
    }

    /// Nearest landmark matching `mask`, if any was sensed.
    pub fn closest_landmark(&self, mask: Category) -> Option<&DetectedLandmark> {
        self.landmarks.as_ref().and_then(|obs| obs.closest(mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmark(distance: f32, category: Category) -> DetectedLandmark {
        DetectedLandmark {
            distance,
            angle: 0.0,
            category,
        }
    }

    #[test]
    fn test_range_only_bundle() {
        let bundle = ObservationBundle::new(RangeObservation::new(Vec::new(), 0.0, 80.0, 0.0));
        assert_eq!(bundle.range().range_max(), 80.0);
        assert!(bundle.landmarks().is_none());
        assert!(bundle.landmark_list().is_empty());
        assert!(bundle.closest_landmark(Category::ANY_LANDMARK).is_none());
    }

    #[test]
    fn test_bundle_with_landmarks() {
        let landmarks = LandmarkObservation::new(vec![
            landmark(40.0, Category::ARC_LANDMARK),
            landmark(25.0, Category::POLE_LANDMARK),
        ]);
        let bundle = ObservationBundle::with_landmarks(RangeObservation::default(), landmarks);
        assert_eq!(bundle.landmarks().map(|obs| obs.len()), Some(2));
        assert_eq!(bundle.landmark_list().len(), 2);
        let arc = bundle.closest_landmark(Category::ARC_LANDMARK).unwrap();
        assert_eq!(arc.distance, 40.0);
    }
}
