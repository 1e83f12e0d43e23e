//! Creature simulation
//!
//! The kinematic body shared by every locomotion mode and the hecs-backed
//! world that steps whole flocks of them.

mod body;
mod world;

pub use body::Body;
pub use world::SimWorld;
