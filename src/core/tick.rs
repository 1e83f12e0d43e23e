//! Tick timing for the fixed-step simulation
//!
//! The locomotion core advances in whole ticks. `TickClock` converts the
//! host's variable frame deltas into the number of ticks to run this frame,
//! so the same creature behaves identically at any frame rate.

use std::time::{Duration, Instant};

/// Simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 20;

/// Duration of one simulation tick (50 ms at the default rate).
pub const TICK_DURATION: Duration = Duration::from_millis(1000 / TICKS_PER_SECOND as u64);

/// Fixed-timestep accumulator clock.
///
/// Call [`TickClock::update`] once per frame and step the simulation the
/// returned number of times. Leftover time carries into the next frame, so
/// ticks are neither stretched nor dropped under normal operation.
#[derive(Debug)]
pub struct TickClock {
    /// Instant of the previous `update` call
    last_update: Instant,
    /// Unconsumed simulation time
    accumulator: Duration,
    /// Total ticks issued since creation
    tick: u64,
    /// Cap on ticks issued per frame (stall protection)
    max_ticks_per_frame: u32,
}

impl TickClock {
    /// Default cap on ticks issued in a single frame.
    const DEFAULT_MAX_TICKS: u32 = 8;

    /// Create a clock starting now with an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_update: Instant::now(),
            accumulator: Duration::ZERO,
            tick: 0,
            max_ticks_per_frame: Self::DEFAULT_MAX_TICKS,
        }
    }

    /// Override the per-frame tick cap.
    #[must_use]
    pub fn with_max_ticks_per_frame(mut self, max: u32) -> Self {
        self.max_ticks_per_frame = max.max(1);
        self
    }

    /// Measure the time since the last call and return how many ticks to run.
    pub fn update(&mut self) -> u32 {
        let now = Instant::now();
        let delta = now - self.last_update;
        self.last_update = now;
        self.advance(delta)
    }

    /// Accumulate `delta` and return how many whole ticks it covers.
    ///
    /// When the host stalls, the count is capped and the excess time is
    /// discarded so the simulation does not spiral trying to catch up.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        self.accumulator += delta;

        let mut ticks = 0;
        while self.accumulator >= TICK_DURATION {
            self.accumulator -= TICK_DURATION;
            ticks += 1;
            if ticks >= self.max_ticks_per_frame {
                self.accumulator = Duration::ZERO;
                break;
            }
        }

        self.tick += u64::from(ticks);
        ticks
    }

    /// Total ticks issued since the clock was created.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Fraction of the next tick already elapsed, in [0, 1).
    ///
    /// Renderers interpolate between the previous and current tick states
    /// by this amount. They must only read simulation state, never write it.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f32() / TICK_DURATION.as_secs_f32()).min(1.0)
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
