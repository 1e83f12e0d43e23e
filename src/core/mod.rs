//! Core simulation plumbing
//!
//! The fixed-rate tick clock, the per-tick event queue, and save records.

mod events;
mod save;
mod tick;

pub use events::{EventQueue, LocomotionEvent};
pub use save::{SaveError, SaveState, SavedCreature, SavedLocomotion};
pub use tick::{TICK_DURATION, TICKS_PER_SECOND, TickClock};
