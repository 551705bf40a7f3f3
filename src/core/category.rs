//! Object categories and category masks.
//!
//! Every object in the world carries exactly one category flag. Sensors and
//! controllers filter with masks, which are arbitrary unions of flags.
//!
//! | Flag | Bit | Meaning |
//! |------|-----|---------|
//! | `WALL` | 1 | Static boundary, or any object a sensor does not accept |
//! | `AGENT` | 2 | Another swarm agent |
//! | `RED_PUCK` | 4 | Movable puck, first kind |
//! | `GREEN_PUCK` | 8 | Movable puck, second kind |
//! | `BLUE_PUCK` | 16 | Movable puck, third kind |
//! | `ARC_LANDMARK` | 32 | Landmark marking an enclosure arc |
//! | `POLE_LANDMARK` | 64 | Landmark treated as an attractant |
//! | `BLAST_LANDMARK` | 128 | Landmark marking an area to clear |
//!
//! In YAML configuration a mask is written with flag names:
//! `detection_mask: "WALL | AGENT | RED_PUCK"`.

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Category bit set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Category: u32 {
        /// Static boundary
        const WALL = 1;
        /// Swarm agent
        const AGENT = 1 << 1;
        /// Red puck
        const RED_PUCK = 1 << 2;
        /// Green puck
        const GREEN_PUCK = 1 << 3;
        /// Blue puck
        const BLUE_PUCK = 1 << 4;
        /// Arc landmark
        const ARC_LANDMARK = 1 << 5;
        /// Pole landmark
        const POLE_LANDMARK = 1 << 6;
        /// Blast landmark
        const BLAST_LANDMARK = 1 << 7;

        /// Any puck kind
        const ANY_PUCK = Self::RED_PUCK.bits() | Self::GREEN_PUCK.bits() | Self::BLUE_PUCK.bits();
        /// Any landmark kind
        const ANY_LANDMARK = Self::ARC_LANDMARK.bits()
            | Self::POLE_LANDMARK.bits()
            | Self::BLAST_LANDMARK.bits();
    }
}

impl Category {
    /// True when exactly one flag is set, i.e. the value can tag an object.
    #[inline]
    pub fn is_single(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// True when any flag of `mask` is set in `self`.
    #[inline]
    pub fn matches(self, mask: Category) -> bool {
        self.intersects(mask)
    }

    /// True when `self` is a landmark category.
    #[inline]
    pub fn is_landmark(self) -> bool {
        self.intersects(Category::ANY_LANDMARK)
    }

    /// Short name for logging. Masks with several flags report "MIXED".
    pub fn name(self) -> &'static str {
        if self.is_empty() {
            return "NONE";
        }
        if !self.is_single() {
            return "MIXED";
        }
        self.iter_names().next().map_or("MIXED", |(name, _)| name)
    }
}
