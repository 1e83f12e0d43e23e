//! Locomotion mode and navigation state
//!
//! The mode enum is what consumers observe; internally hovering is a flag on
//! top of `Flying` rather than a stored mode, so flag changes can never leave
//! a stale mode behind. Navigation dispatch is a plain tag the controller
//! switches when the creature leaves or regains the ground.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The externally visible locomotion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionMode {
    /// On the ground, using ground navigation
    #[default]
    Grounded,
    /// In the fixed launch window between ground and flight
    Takeoff,
    /// Airborne under the gliding model
    Flying,
    /// Airborne and holding position under the hovering model
    Hovering,
    /// Airborne and executing the landing sequence
    Landing,
}

impl LocomotionMode {
    /// Whether this mode is an airborne one.
    #[must_use]
    pub fn is_airborne(self) -> bool {
        !matches!(self, Self::Grounded)
    }
}

/// Which navigation family steers the creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NavMode {
    /// Ground pathing
    #[default]
    Ground,
    /// Free-space air pathing
    Air,
}

/// Navigation dispatch tag with an idempotent swap.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NavState {
    mode: NavMode,
    swaps: u32,
}

impl NavState {
    /// Create a navigation state in ground mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active navigation mode.
    #[must_use]
    pub fn mode(&self) -> NavMode {
        self.mode
    }

    /// Switch navigation modes. Returns `true` only when the mode actually
    /// changed; repeated requests for the current mode are no-ops.
    pub fn set_mode(&mut self, mode: NavMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.swaps += 1;
        true
    }

    /// How many real swaps have happened.
    #[must_use]
    pub fn swap_count(&self) -> u32 {
        self.swaps
    }
}

/// Persistent locomotion state for one creature.
///
/// `base` never holds [`LocomotionMode::Hovering`]; hovering is the `hovering`
/// flag layered over `Flying`, and [`FlightState::mode`] folds the flag into
/// the reported mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightState {
    /// Stored mode, one of Grounded, Takeoff, Flying, Landing
    pub base: LocomotionMode,
    /// Hovering flag, meaningful only while flying
    pub hovering: bool,
    /// Navigation dispatch
    pub nav: NavState,
    /// Consecutive ticks spent airborne
    pub ticks_airborne: u32,
    /// A landing has been requested and not yet begun
    pub landing_requested: bool,
    /// A landing request was cancelled while still airborne
    pub landing_rescinded: bool,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            base: LocomotionMode::Grounded,
            hovering: false,
            nav: NavState::new(),
            ticks_airborne: 0,
            landing_requested: false,
            landing_rescinded: false,
        }
    }
}

impl FlightState {
    /// Create a grounded state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The mode consumers observe. Hovering replaces Flying while the flag
    /// is set.
    #[must_use]
    pub fn mode(&self) -> LocomotionMode {
        if self.base == LocomotionMode::Flying && self.hovering {
            LocomotionMode::Hovering
        } else {
            self.base
        }
    }

    /// Whether the creature is in any airborne mode.
    #[must_use]
    pub fn is_airborne(&self) -> bool {
        self.base.is_airborne()
    }
}

/// External inputs sampled once per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInputs {
    /// Override for the look direction; `None` uses the body orientation
    pub look: Option<Vec3>,
    /// Current navigation target, if any
    pub target: Option<Vec3>,
    /// The creature is being ridden as a stationary mount or is seated
    pub seated: bool,
    /// Hold position instead of cruising
    pub hover: bool,
    /// The rider or brain wants the creature on the ground
    pub wants_to_land: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_flag_reports_hovering_mode() {
        let mut state = FlightState::new();
        state.base = LocomotionMode::Flying;
        assert_eq!(state.mode(), LocomotionMode::Flying);

        state.hovering = true;
        assert_eq!(state.mode(), LocomotionMode::Hovering);

        // The flag only matters while flying.
        state.base = LocomotionMode::Landing;
        assert_eq!(state.mode(), LocomotionMode::Landing);
    }

    #[test]
    fn test_airborne_modes() {
        assert!(!LocomotionMode::Grounded.is_airborne());
        assert!(LocomotionMode::Takeoff.is_airborne());
        assert!(LocomotionMode::Flying.is_airborne());
        assert!(LocomotionMode::Hovering.is_airborne());
        assert!(LocomotionMode::Landing.is_airborne());
    }

    #[test]
    fn test_nav_swap_is_idempotent() {
        let mut nav = NavState::new();
        assert_eq!(nav.mode(), NavMode::Ground);

        assert!(nav.set_mode(NavMode::Air));
        assert!(!nav.set_mode(NavMode::Air));
        assert!(!nav.set_mode(NavMode::Air));
        assert_eq!(nav.swap_count(), 1);

        assert!(nav.set_mode(NavMode::Ground));
        assert_eq!(nav.swap_count(), 2);
    }
}
