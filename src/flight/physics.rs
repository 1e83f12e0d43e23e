//! Flight physics integration
//!
//! Pure velocity steppers for the two airborne movement families. Gliding is
//! a forward-flight model where wing activity reduces effective gravity and
//! sink rate is traded for carry along the look heading. Hovering is a
//! friction-driven station-keeping model. Both take the current velocity and
//! return the next one; neither touches position or any other state.

use glam::{Vec2, Vec3};

use crate::flight::config::{GlideTunables, HoverTunables};

/// One gliding velocity step.
///
/// `look` is the full look vector, `pitch_radians` its elevation (positive
/// looking up). The three weights are the current animation blend fractions;
/// they shade gravity, lift and drag so the physics tracks what the wings
/// are visibly doing.
#[must_use]
pub fn glide_step(
    velocity: Vec3,
    look: Vec3,
    pitch_radians: f32,
    flap_weight: f32,
    glide_weight: f32,
    hover_weight: f32,
    tun: &GlideTunables,
) -> Vec3 {
    let mut v = velocity;

    let look_h = Vec2::new(look.x, look.z);
    let look_h_len = look_h.length();

    // A level look converts most of gravity into carry; a steep look (look
    // vector nearly vertical) collapses the factor and the body just falls.
    let cos_pitch = pitch_radians.cos();
    let pitch_factor = cos_pitch * cos_pitch * (look_h_len / tun.look_factor_scale).min(1.0);

    let gravity = tun.base_gravity
        * (1.0 - flap_weight * tun.flap_gravity_relief)
        * (1.0 - hover_weight * tun.hover_gravity_relief)
        * (1.0 - glide_weight * tun.glide_gravity_relief);
    v.y += gravity * (-1.0 + pitch_factor * tun.pitch_lift_gain);

    // Horizontal speed is sampled once; the correction terms below all divide
    // by it, so a near-stationary body skips them entirely.
    let h_speed_sq = v.x * v.x + v.z * v.z;
    if h_speed_sq >= tun.min_horizontal_speed_sq && look_h_len > 1.0e-5 {
        let h_speed = h_speed_sq.sqrt();
        let look_dir = look_h / look_h_len;

        // Sink converted into carry along the heading.
        if v.y < 0.0 {
            let lift = -v.y
                * tun.lift_gain
                * pitch_factor
                * (1.0 + flap_weight * tun.lift_flap_bonus + glide_weight * tun.lift_glide_bonus);
            v.x += look_dir.x * lift;
            v.z += look_dir.y * lift;
        }

        // Nose-down dive: forward and (much more) downward acceleration,
        // resisted by flapping.
        if pitch_radians < 0.0 {
            let dive = h_speed
                * (-pitch_radians.sin())
                * tun.dive_gain
                * (1.0 - flap_weight * tun.dive_flap_resist);
            v.x += look_dir.x * dive;
            v.z += look_dir.y * dive;
            v.y -= dive * tun.dive_vertical_mult;
        }

        // Carve toward the heading instead of sliding sideways.
        v.x += (look_dir.x * h_speed - v.x) * tun.heading_align_rate;
        v.z += (look_dir.y * h_speed - v.z) * tun.heading_align_rate;
    }

    let drag_h = tun.glide_drag_horizontal
        + (tun.flap_drag_horizontal - tun.glide_drag_horizontal) * flap_weight;
    let drag_v =
        tun.glide_drag_vertical + (tun.flap_drag_vertical - tun.glide_drag_vertical) * flap_weight;
    v.x *= drag_h;
    v.y *= drag_v;
    v.z *= drag_h;

    v
}

/// One hovering velocity step.
///
/// Station-keeping around an optional navigation target. `ground_friction`
/// is the grip sampled under the body (1.0 normal ground, lower is more
/// slippery); it bleeds into the decay through the relative-movement
/// coefficient. Hover lift is implicit: there is no gravity term in this
/// family.
#[must_use]
pub fn hover_step(
    velocity: Vec3,
    position: Vec3,
    target: Option<Vec3>,
    ground_friction: f32,
    tun: &HoverTunables,
) -> Vec3 {
    let mut v = velocity;

    if let Some(target) = target {
        let to_target = target - position;
        let dist_sq = to_target.length_squared();
        if dist_sq <= tun.arrive_radius * tun.arrive_radius {
            // At the destination: kill residual motion instead of orbiting it.
            v *= tun.settle_damping;
        } else {
            v += (to_target / dist_sq.sqrt()) * tun.approach_accel;
        }
    }

    let friction = tun.air_friction * (1.0 - tun.relative_movement * ground_friction);
    v * friction
}
