//! Orientation steering helpers
//!
//! Small pure functions for yaw and pitch bookkeeping. All angles are
//! degrees unless a name says otherwise.

use glam::Vec3;

/// Wrap an angle into (-180, 180].
#[must_use]
pub fn wrap_degrees(degrees: f32) -> f32 {
    let mut wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped -= 360.0;
    } else if wrapped <= -180.0 {
        wrapped += 360.0;
    }
    wrapped
}

/// Turn `current` toward `target` by at most `max_step` degrees, taking the
/// short way around.
#[must_use]
pub fn turn_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = wrap_degrees(target - current);
    let step = delta.clamp(-max_step, max_step);
    wrap_degrees(current + step)
}

/// Yaw and pitch (degrees) of the direction from `from` to `to`.
///
/// Yaw 0 faces +Z and grows toward +X; pitch is positive looking up. A
/// degenerate direction yields `(0, 0)`.
#[must_use]
pub fn yaw_pitch_to(from: Vec3, to: Vec3) -> (f32, f32) {
    let d = to - from;
    let h = (d.x * d.x + d.z * d.z).sqrt();
    if h < 1.0e-6 && d.y.abs() < 1.0e-6 {
        return (0.0, 0.0);
    }
    let yaw = d.x.atan2(d.z).to_degrees();
    let pitch = d.y.atan2(h).to_degrees();
    (yaw, pitch)
}

/// Unit look vector for a yaw/pitch pair in degrees.
#[must_use]
pub fn look_vector(yaw_degrees: f32, pitch_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    let pitch = pitch_degrees.to_radians();
    let cos_pitch = pitch.cos();
    Vec3::new(yaw.sin() * cos_pitch, pitch.sin(), yaw.cos() * cos_pitch)
}

/// Ease `pitch` back inside `[band_min, band_max]` by at most `rate` degrees.
///
/// Values already inside the band pass through untouched, so transient
/// excursions during dives and climbs are corrected over a few ticks rather
/// than clamped in one.
#[must_use]
pub fn ease_pitch_into_band(pitch: f32, band_min: f32, band_max: f32, rate: f32) -> f32 {
    if pitch < band_min {
        (pitch + rate).min(band_min)
    } else if pitch > band_max {
        (pitch - rate).max(band_max)
    } else {
        pitch
    }
}
