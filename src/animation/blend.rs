//! Blend fraction timers
//!
//! Animation cross-fades are driven by tick-counting timers whose output is
//! eased through a quarter sine wave, so weight changes decelerate as they
//! approach 0 or 1 instead of snapping. The sine is monotonic over the used
//! range, which is what makes the save-file inverse reconstruction exact.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

/// A tick timer whose eased output drives one animation blend weight.
#[derive(Debug, Clone, Copy)]
pub struct FractionTimer {
    timer: f32,
    max: f32,
    rising: bool,
}

impl FractionTimer {
    /// A zeroed timer that tops out after `max` ticks.
    #[must_use]
    pub fn new(max: f32) -> Self {
        Self {
            timer: 0.0,
            max: max.max(1.0),
            rising: false,
        }
    }

    /// Rebuild a timer from a saved fraction by inverting the ease curve.
    /// Exact because the quarter sine is monotonic over [0, 1].
    #[must_use]
    pub fn from_saved(max: f32, saved: SavedFraction) -> Self {
        let max = max.max(1.0);
        let timer = saved.fraction.clamp(0.0, 1.0).asin() / FRAC_PI_2 * max;
        Self {
            timer,
            max,
            rising: saved.rising,
        }
    }

    /// Advance one tick toward full.
    pub fn increase(&mut self) {
        self.timer = (self.timer + 1.0).min(self.max);
        self.rising = true;
    }

    /// Retreat one tick toward empty.
    pub fn decrease(&mut self) {
        self.timer = (self.timer - 1.0).max(0.0);
        self.rising = false;
    }

    /// Snap back to zero without touching the direction flag.
    pub fn reset(&mut self) {
        self.timer = 0.0;
    }

    /// The eased blend weight in [0, 1].
    #[must_use]
    pub fn fraction(&self) -> f32 {
        (self.timer / self.max * FRAC_PI_2).sin()
    }

    /// Whether the last step moved toward full.
    #[must_use]
    pub fn rising(&self) -> bool {
        self.rising
    }

    /// Whether the timer has topped out.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.timer >= self.max
    }

    /// Whether the timer has bottomed out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timer <= 0.0
    }

    /// Fraction plus direction flag, for persistence.
    #[must_use]
    pub fn snapshot(&self) -> SavedFraction {
        SavedFraction {
            fraction: self.fraction(),
            rising: self.rising,
        }
    }
}

/// Persisted form of a [`FractionTimer`]: the eased fraction and the
/// direction it was moving. Raw timer values are not stored; they are
/// reconstructed through the inverse ease on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedFraction {
    /// Eased weight at save time
    pub fraction: f32,
    /// Direction flag at save time
    pub rising: bool,
}

/// The three blend weights consumers read each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlendWeights {
    /// Wings held out, efficient forward flight
    pub glide: f32,
    /// Active wing beats
    pub flap: f32,
    /// Station-keeping pose
    pub hover: f32,
}
