//! Locomotion event queue
//!
//! The locomotion core never calls into its consumers. Anything other
//! systems react to is pushed into a double-buffered queue here and drained
//! by the consumer on the following tick. Events written during tick N
//! become visible at tick N+1, so consumer behavior never depends on update
//! order within a tick.
//!
//! # Example
//!
//! ```ignore
//! // In the per-tick step
//! controller.update(&mut body, &inputs, &terrain, &mut events);
//! events.swap();
//!
//! // Between ticks, in the sound system
//! for event in events.iter() {
//!     if let LocomotionEvent::WingSoundCue { intensity } = event {
//!         play_flap_sound(*intensity);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use glam::Vec3;

use crate::flight::{LandingPhase, LocomotionMode, NavMode};

/// Events produced by the locomotion core.
///
/// `#[non_exhaustive]` so new variants can be added without breaking
/// consumers that match with a wildcard arm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum LocomotionEvent {
    /// The discrete locomotion mode changed.
    ModeChanged {
        /// Mode before the transition
        from: LocomotionMode,
        /// Mode after the transition
        to: LocomotionMode,
    },

    /// The navigation controller crossed the ground/air boundary.
    ///
    /// Emitted exactly once per boundary crossing; re-entering the same
    /// side is silent.
    NavSwapped {
        /// The side now active
        mode: NavMode,
    },

    /// The landing sequencer advanced to a new phase.
    LandingPhaseChanged {
        /// The phase just entered
        phase: LandingPhase,
    },

    /// The landing sequencer committed to a touchdown spot.
    SpotCommitted {
        /// World position of the chosen spot
        position: Vec3,
    },

    /// The spot finder gave up and committed to an unvalidated point.
    ///
    /// Fired alongside a `log::warn!`; consumers may cancel the landing if
    /// they know better.
    EmergencySpot {
        /// The unchecked commit position
        position: Vec3,
    },

    /// The creature finished a landing and is grounded.
    TouchdownComplete {
        /// Where the creature settled
        position: Vec3,
    },

    /// One discrete wing beat, for one-shot sound/particle triggering.
    WingFlap {
        /// Beat strength in [0, 1]
        intensity: f32,
    },

    /// Wing-beat intensity crossed the audible threshold.
    ///
    /// Schmitt-gated: fires once on the upward crossing and re-arms only
    /// after the intensity falls back below the lower threshold.
    WingSoundCue {
        /// Intensity at the moment of crossing
        intensity: f32,
    },
}

/// Double-buffered event queue.
///
/// Push during one tick, `swap` at the tick boundary, read on the next.
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Events written this tick
    pending: VecDeque<LocomotionEvent>,
    /// Events from the previous tick, ready to read
    visible: VecDeque<LocomotionEvent>,
}

impl EventQueue {
    /// Default capacity; a creature rarely emits more per tick.
    const DEFAULT_CAPACITY: usize = 16;

    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create an empty queue with a given initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            visible: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue an event for the next tick.
    #[inline]
    pub fn push(&mut self, event: LocomotionEvent) {
        self.pending.push_back(event);
    }

    /// Publish pending events and discard the previous tick's batch.
    ///
    /// Call once per tick, after stepping the controller.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.visible);
        self.pending.clear();
    }

    /// Iterate over the previous tick's events.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &LocomotionEvent> {
        self.visible.iter()
    }

    /// Drain the previous tick's events by value.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = LocomotionEvent> + '_ {
        self.visible.drain(..)
    }

    /// Whether any events are visible this tick.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Number of visible events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Drop everything, pending and visible. Used when a creature despawns.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.visible.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_invisible_until_swap() {
        let mut queue = EventQueue::new();

        queue.push(LocomotionEvent::WingFlap { intensity: 0.8 });
        assert!(queue.is_empty(), "events must not leak into the same tick");

        queue.swap();
        assert_eq!(queue.len(), 1);
        assert!(matches!(
            queue.iter().next(),
            Some(LocomotionEvent::WingFlap { .. })
        ));
    }

    #[test]
    fn test_double_buffer_isolation() {
        let mut queue = EventQueue::new();

        queue.push(LocomotionEvent::NavSwapped { mode: NavMode::Air });
        queue.swap();

        // Written while the first batch is visible
        queue.push(LocomotionEvent::NavSwapped {
            mode: NavMode::Ground,
        });

        let visible: Vec<_> = queue.iter().collect();
        assert_eq!(visible.len(), 1);
        assert!(matches!(
            visible[0],
            LocomotionEvent::NavSwapped { mode: NavMode::Air }
        ));

        queue.swap();
        let visible: Vec<_> = queue.iter().collect();
        assert_eq!(visible.len(), 1);
        assert!(matches!(
            visible[0],
            LocomotionEvent::NavSwapped {
                mode: NavMode::Ground
            }
        ));
    }

    #[test]
    fn test_drain_consumes() {
        let mut queue = EventQueue::new();

        queue.push(LocomotionEvent::ModeChanged {
            from: LocomotionMode::Grounded,
            to: LocomotionMode::Takeoff,
        });
        queue.push(LocomotionEvent::ModeChanged {
            from: LocomotionMode::Takeoff,
            to: LocomotionMode::Flying,
        });
        queue.swap();

        assert_eq!(queue.drain().count(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear_drops_both_buffers() {
        let mut queue = EventQueue::new();

        queue.push(LocomotionEvent::TouchdownComplete {
            position: Vec3::ZERO,
        });
        queue.swap();
        queue.push(LocomotionEvent::WingFlap { intensity: 1.0 });

        queue.clear();
        queue.swap();
        assert!(queue.is_empty());
    }
}
