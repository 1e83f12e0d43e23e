//! Flight locomotion
//!
//! The mode state machine, the glide and hover velocity integrations, the
//! multi-phase landing sequencer, and the tuning set that drives them. One
//! [`FlightController`] owns the whole pipeline for a single creature and is
//! the only writer of its body's velocity.

mod config;
mod controller;
mod landing;
mod physics;
mod state;
mod steering;

pub use config::{
    ConfigError, FlightTunables, GlideTunables, HoverTunables, LandingTunables, ModeTunables,
    WingTunables,
};
pub use controller::FlightController;
pub use landing::{LandingPhase, LandingSequence, LandingStep, find_landing_spot};
pub use physics::{glide_step, hover_step};
pub use state::{FlightState, LocomotionMode, NavMode, NavState, TickInputs};
pub use steering::{ease_pitch_into_band, look_vector, turn_toward, wrap_degrees, yaw_pitch_to};
