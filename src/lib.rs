//! A locomotion core for large flying creatures
//!
//! This crate provides:
//! - A tick-driven mode state machine (grounded, takeoff, flying, hovering, landing)
//! - Glide and hover velocity integration over a terrain query interface
//! - A multi-phase landing sequencer with terrain-validated spot selection
//! - Wing animation blend selection with hysteresis and discrete flap events

pub mod animation;
pub mod core;
pub mod flight;
pub mod sim;
pub mod terrain;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::{BlendWeights, WingAnimator};
    pub use crate::core::{EventQueue, LocomotionEvent, SaveState, TICKS_PER_SECOND, TickClock};
    pub use crate::flight::{
        FlightController, FlightTunables, LandingPhase, LocomotionMode, NavMode, TickInputs,
    };
    pub use crate::sim::{Body, SimWorld};
    pub use crate::terrain::{ColliderTerrain, TerrainQuery, VoxelTerrain};
    pub use glam::{Vec2, Vec3};
}
