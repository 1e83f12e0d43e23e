//! Flight tuning constants
//!
//! Every scalar the locomotion core uses lives here so creature variants can
//! be tuned from data. Defaults reproduce the reference creature. Tunables
//! can round-trip through RON for data-driven variants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Gliding-integration constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GlideTunables {
    /// Base gravity applied per tick while airborne
    pub base_gravity: f32,
    /// Fraction of gravity cancelled at full flap weight
    pub flap_gravity_relief: f32,
    /// Fraction of gravity cancelled at full hover weight
    pub hover_gravity_relief: f32,
    /// Fraction of gravity cancelled at full glide weight
    pub glide_gravity_relief: f32,
    /// How much a level pitch converts gravity into carry
    pub pitch_lift_gain: f32,
    /// Divisor normalizing the horizontal look magnitude in the pitch factor
    pub look_factor_scale: f32,
    /// Lift recovered from sink rate while descending
    pub lift_gain: f32,
    /// Lift bonus at full flap weight
    pub lift_flap_bonus: f32,
    /// Lift bonus at full glide weight
    pub lift_glide_bonus: f32,
    /// Forward acceleration per unit of downward pitch
    pub dive_gain: f32,
    /// Multiplier on the vertical part of the dive term
    pub dive_vertical_mult: f32,
    /// Fraction of the dive term cancelled at full flap weight
    pub dive_flap_resist: f32,
    /// Per-tick blend of horizontal velocity toward the look heading
    pub heading_align_rate: f32,
    /// Horizontal drag at full flap weight
    pub flap_drag_horizontal: f32,
    /// Vertical drag at full flap weight
    pub flap_drag_vertical: f32,
    /// Horizontal drag in an efficient glide
    pub glide_drag_horizontal: f32,
    /// Vertical drag in an efficient glide
    pub glide_drag_vertical: f32,
    /// Squared horizontal speed below which the correction terms shut off
    pub min_horizontal_speed_sq: f32,
}

impl Default for GlideTunables {
    fn default() -> Self {
        Self {
            base_gravity: 0.08,
            flap_gravity_relief: 0.5,
            hover_gravity_relief: 0.3,
            glide_gravity_relief: 0.2,
            pitch_lift_gain: 0.75,
            look_factor_scale: 0.4,
            lift_gain: 0.1,
            lift_flap_bonus: 0.6,
            lift_glide_bonus: 0.4,
            dive_gain: 0.04,
            dive_vertical_mult: 3.0,
            dive_flap_resist: 0.3,
            heading_align_rate: 0.1,
            flap_drag_horizontal: 0.96,
            flap_drag_vertical: 0.98,
            glide_drag_horizontal: 0.992,
            glide_drag_vertical: 0.995,
            min_horizontal_speed_sq: 1.0e-4,
        }
    }
}

/// Hovering-integration constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HoverTunables {
    /// Acceleration toward the navigation target
    pub approach_accel: f32,
    /// Relative-movement coefficient scaling the friction response
    pub relative_movement: f32,
    /// Distance to the target inside which velocity decays to rest
    pub arrive_radius: f32,
    /// Per-tick velocity retention inside the arrive radius
    pub settle_damping: f32,
    /// Velocity retention applied through the friction model (air part)
    pub air_friction: f32,
    /// Height below the creature probed for ground friction
    pub friction_probe_depth: f32,
}

impl Default for HoverTunables {
    fn default() -> Self {
        Self {
            approach_accel: 0.1,
            relative_movement: 0.02,
            arrive_radius: 0.1,
            settle_damping: 0.5,
            air_friction: 0.91,
            friction_probe_depth: 2.0,
        }
    }
}

/// Mode state-machine constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModeTunables {
    /// Ticks the takeoff window lasts before flight proper
    pub takeoff_ticks: u32,
    /// Upward force per tick during takeoff
    pub takeoff_lift: f32,
    /// Downward force per tick when a landing request aborts a takeoff
    pub abort_sink: f32,
    /// Squared speed below which the hover flag may engage
    pub hover_speed_sq: f32,
    /// Airborne ticks after which the creature wants to land (0 disables)
    pub max_flight_ticks: u32,
    /// Yaw steering rate in degrees per tick
    pub turn_rate: f32,
    /// Pitch steering rate in degrees per tick
    pub pitch_rate: f32,
    /// Lower edge of the cruise pitch band, degrees
    pub cruise_pitch_min: f32,
    /// Upper edge of the cruise pitch band, degrees
    pub cruise_pitch_max: f32,
}

impl Default for ModeTunables {
    fn default() -> Self {
        Self {
            takeoff_ticks: 30,
            takeoff_lift: 0.075,
            abort_sink: 0.4,
            hover_speed_sq: 0.04,
            max_flight_ticks: 2400,
            turn_rate: 6.0,
            pitch_rate: 2.0,
            cruise_pitch_min: -25.0,
            cruise_pitch_max: 35.0,
        }
    }
}

/// Landing-sequencer constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LandingTunables {
    /// Circling phase duration, ticks
    pub circle_ticks: u32,
    /// Approaching phase duration, ticks
    pub approach_ticks: u32,
    /// Descending phase duration, ticks
    pub descend_ticks: u32,
    /// Touchdown phase duration, ticks
    pub touchdown_ticks: u32,
    /// Orbit radius while circling
    pub circle_radius: f32,
    /// Degrees the orbit advances per tick
    pub circle_step_degrees: f32,
    /// Ticks between landing-spot samples while circling
    pub spot_sample_interval: u32,
    /// Random candidate attempts per sample
    pub spot_attempts: u32,
    /// Minimum candidate distance from the creature
    pub spot_min_distance: f32,
    /// Maximum candidate distance from the creature
    pub search_radius: f32,
    /// Clear cells required above a landing surface
    pub spot_headroom: f32,
    /// How far below a candidate the surface scan reaches
    pub spot_scan_depth: f32,
    /// Vertical offset of the approach point above the spot
    pub approach_height: f32,
    /// Distance to the approach point that ends Approaching
    pub approach_radius: f32,
    /// Vertical offset flown toward while descending
    pub descend_height: f32,
    /// Added downward force at full descent progress
    pub descend_sink: f32,
    /// Downward force while still airborne in Touchdown
    pub touchdown_sink: f32,
    /// Horizontal velocity retention on ground contact
    pub touchdown_damp_horizontal: f32,
    /// Vertical velocity retention on ground contact
    pub touchdown_damp_vertical: f32,
    /// Ground distance that ends Descending
    pub ground_near: f32,
    /// Emergency commit distance straight below the creature
    pub emergency_drop: f32,
    /// Squared speed counted as "at rest" during Touchdown
    pub rest_speed_sq: f32,
}

impl Default for LandingTunables {
    fn default() -> Self {
        Self {
            circle_ticks: 60,
            approach_ticks: 40,
            descend_ticks: 60,
            touchdown_ticks: 30,
            circle_radius: 8.0,
            circle_step_degrees: 6.0,
            spot_sample_interval: 10,
            spot_attempts: 8,
            spot_min_distance: 4.0,
            search_radius: 16.0,
            spot_headroom: 4.0,
            spot_scan_depth: 24.0,
            approach_height: 5.0,
            approach_radius: 8.0,
            descend_height: 1.0,
            descend_sink: 0.08,
            touchdown_sink: 0.15,
            touchdown_damp_horizontal: 0.8,
            touchdown_damp_vertical: 0.5,
            ground_near: 2.0,
            emergency_drop: 5.0,
            rest_speed_sq: 0.01,
        }
    }
}

/// Wing-animation constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WingTunables {
    /// Ticks for the glide blend to fully rise
    pub glide_blend_ticks: f32,
    /// Ticks for the flap blend to fully rise
    pub flap_blend_ticks: f32,
    /// Ticks for the hover blend to fully rise
    pub hover_blend_ticks: f32,
    /// Smoothed flap demand above which a flap cycle may start
    pub flap_enter_threshold: f32,
    /// Smoothed flap demand below which a flap cycle may end
    pub flap_exit_threshold: f32,
    /// Minimum ticks a flap cycle is held
    pub flap_min_hold: u32,
    /// Minimum gliding ticks between flap cycles
    pub glide_min_hold: u32,
    /// Base cooldown between discrete flap events, ticks
    pub flap_event_cooldown: u32,
    /// Random cooldown jitter, plus or minus this many ticks
    pub flap_event_jitter: u32,
    /// Chance per eligible hover tick of a discrete flap
    pub hover_flap_chance: f64,
    /// Exponential smoothing rate of the flap demand signal
    pub demand_smoothing: f32,
    /// Exponential approach rate of the wing-beat intensity
    pub intensity_smoothing: f32,
    /// Intensity crossing that fires the wing sound cue
    pub sound_on_threshold: f32,
    /// Intensity the cue re-arms below
    pub sound_off_threshold: f32,
    /// Vertical speed counted as climbing
    pub climb_speed: f32,
    /// Vertical speed counted as a strong climb (overrides the glide hold)
    pub strong_climb_speed: f32,
    /// Look pitch (degrees, negative is down) below which a descent is a dive
    pub dive_pitch: f32,
    /// Sink rate that, with the pitch, marks a dive
    pub dive_speed: f32,
    /// Sink rate counted as a gentle descent
    pub gentle_sink: f32,
    /// Sink rate treated as "falling hard" while hovering
    pub hover_sink_speed: f32,
    /// Squared horizontal speed counted as slow
    pub slow_speed_sq: f32,
    /// Yaw change per tick (degrees) counted as turning
    pub turn_threshold: f32,
}

impl Default for WingTunables {
    fn default() -> Self {
        Self {
            glide_blend_ticks: 20.0,
            flap_blend_ticks: 10.0,
            hover_blend_ticks: 15.0,
            flap_enter_threshold: 0.55,
            flap_exit_threshold: 0.22,
            flap_min_hold: 28,
            glide_min_hold: 14,
            flap_event_cooldown: 30,
            flap_event_jitter: 15,
            hover_flap_chance: 0.3,
            demand_smoothing: 0.2,
            intensity_smoothing: 0.15,
            sound_on_threshold: 0.7,
            sound_off_threshold: 0.3,
            climb_speed: 0.15,
            strong_climb_speed: 0.3,
            dive_pitch: -20.0,
            dive_speed: 0.2,
            gentle_sink: 0.05,
            hover_sink_speed: 0.3,
            slow_speed_sq: 0.01,
            turn_threshold: 3.0,
        }
    }
}

/// The full tunable set for one creature kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FlightTunables {
    /// Gliding integration
    pub glide: GlideTunables,
    /// Hovering integration
    pub hover: HoverTunables,
    /// Mode state machine
    pub modes: ModeTunables,
    /// Landing sequencer
    pub landing: LandingTunables,
    /// Wing animation blend
    pub wing: WingTunables,
}

impl FlightTunables {
    /// Set the landing search radius.
    #[must_use]
    pub fn with_search_radius(mut self, radius: f32) -> Self {
        self.landing.search_radius = radius;
        self
    }

    /// Set the flight-duration landing heuristic (0 disables it).
    #[must_use]
    pub fn with_max_flight_ticks(mut self, ticks: u32) -> Self {
        self.modes.max_flight_ticks = ticks;
        self
    }

    /// Set the yaw steering rate, degrees per tick.
    #[must_use]
    pub fn with_turn_rate(mut self, degrees_per_tick: f32) -> Self {
        self.modes.turn_rate = degrees_per_tick;
        self
    }

    /// Save the tunables to a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, text).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load tunables from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        ron::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Errors from tunable file I/O.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_model() {
        let tunables = FlightTunables::default();

        assert!((tunables.glide.base_gravity - 0.08).abs() < f32::EPSILON);
        assert_eq!(tunables.modes.takeoff_ticks, 30);
        assert_eq!(
            tunables.landing.circle_ticks
                + tunables.landing.approach_ticks
                + tunables.landing.descend_ticks
                + tunables.landing.touchdown_ticks,
            190
        );
        assert!(tunables.wing.flap_enter_threshold > tunables.wing.flap_exit_threshold);
    }

    #[test]
    fn test_builders() {
        let tunables = FlightTunables::default()
            .with_search_radius(24.0)
            .with_max_flight_ticks(0)
            .with_turn_rate(4.0);

        assert!((tunables.landing.search_radius - 24.0).abs() < f32::EPSILON);
        assert_eq!(tunables.modes.max_flight_ticks, 0);
        assert!((tunables.modes.turn_rate - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ron_round_trip() {
        let tunables = FlightTunables::default().with_search_radius(20.0);

        let text = ron::ser::to_string_pretty(&tunables, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let loaded: FlightTunables = ron::from_str(&text).expect("parse");

        assert!((loaded.landing.search_radius - 20.0).abs() < f32::EPSILON);
        assert!((loaded.glide.base_gravity - tunables.glide.base_gravity).abs() < f32::EPSILON);
    }
}
