//! Minimum-dwell countdown shared by the hysteresis state machines.
//!
//! A state entered on tick `t` with dwell `D` holds through ticks
//! `t+1 ..= t+D`; its exit predicate is first evaluated on tick `t+D+1`.

use crate::noise::NoiseGenerator;

/// Countdown of ticks during which exit predicates are ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DwellTimer {
    remaining: u32,
}

impl DwellTimer {
    /// Timer that is not holding.
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    /// Hold for the next `ticks` ticks.
    pub fn start(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Hold for a duration drawn from Normal(mean, sigma), rounded to whole
    /// ticks. Negative draws hold for zero ticks.
    pub fn start_normal(&mut self, noise: &mut NoiseGenerator, mean: f32, sigma: f32) -> u32 {
        let ticks = ticks_from_sample(noise.normal(mean, sigma));
        self.start(ticks);
        ticks
    }

    /// Advance one tick.
    ///
    /// Returns true while holding (the exit predicate must not be evaluated
    /// this tick), false once the dwell has run out.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// Whether the next [`tick`](Self::tick) will hold.
    #[inline]
    pub fn is_holding(&self) -> bool {
        self.remaining > 0
    }

    /// Ticks left to hold
    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

/// Round a sampled duration to ticks; negative or non-finite gives 0.
pub fn ticks_from_sample(sample: f32) -> u32 {
    if sample.is_finite() && sample > 0.0 {
        sample.round().min(u32::MAX as f32) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dwell_blocks_exit() {
        // Entered on tick 0 with dwell 5, exit predicate true from tick 1
        let mut timer = DwellTimer::idle();
        timer.start(5);

        let mut left_on = None;
        for tick in 1..=10 {
            let exit_requested = true;
            if !timer.tick() && exit_requested {
                left_on = Some(tick);
                break;
            }
        }
        assert_eq!(left_on, Some(6));
    }

    #[test]
    fn test_zero_dwell_exits_next_tick() {
        let mut timer = DwellTimer::idle();
        timer.start(0);
        assert!(!timer.is_holding());
        assert!(!timer.tick());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut timer = DwellTimer::idle();
        timer.start(2);
        assert!(timer.tick());
        assert_eq!(timer.remaining(), 1);
        assert!(timer.is_holding());
        assert!(timer.tick());
        assert!(!timer.is_holding());
    }

    #[test]
    fn test_ticks_from_sample() {
        assert_eq!(ticks_from_sample(4.4), 4);
        assert_eq!(ticks_from_sample(4.6), 5);
        assert_eq!(ticks_from_sample(-3.0), 0);
        assert_eq!(ticks_from_sample(f32::NAN), 0);
    }

    #[test]
    fn test_normal_dwell_seeded() {
        let mut a = NoiseGenerator::new(11);
        let mut b = NoiseGenerator::new(11);
        let mut ta = DwellTimer::idle();
        let mut tb = DwellTimer::idle();
        assert_eq!(
            ta.start_normal(&mut a, 30.0, 5.0),
            tb.start_normal(&mut b, 30.0, 5.0)
        );
        assert_eq!(ta, tb);
    }
}
