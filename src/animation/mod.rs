//! Wing animation selection
//!
//! Decides which wing pose a flying creature shows and how hard it is
//! beating, from velocity and mode alone. Blend weights move through eased
//! fraction timers so poses never snap, and hysteresis keeps the flap/glide
//! choice from chattering.

mod blend;
mod wing;

pub use blend::{BlendWeights, FractionTimer, SavedFraction};
pub use wing::{BlendSnapshot, WingAnimator};
