//! Landing sequencer
//!
//! A nested state machine that runs only while the creature is in Landing
//! mode: circle and search for a spot, fly to a point above it, sink onto
//! it, absorb the impact. Every phase has a fixed tick budget so a landing
//! can never stall; when the search comes up empty the sequencer degrades
//! through a straight-down check and finally a blind emergency commit
//! rather than aborting.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::{EventQueue, LocomotionEvent};
use crate::flight::config::LandingTunables;
use crate::terrain::TerrainQuery;

/// The four landing phases, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandingPhase {
    /// Orbit while searching for a landing spot
    Circling,
    /// Fly toward a point above the committed spot
    Approaching,
    /// Controlled sink toward the spot
    Descending,
    /// Final drop and impact absorption
    Touchdown,
}

/// What the sequencer wants applied to the body this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct LandingStep {
    /// Point the hover integration should fly toward
    pub nav_target: Option<Vec3>,
    /// Extra downward force to add to the velocity
    pub sink: f32,
    /// Ground-contact damping as (horizontal, vertical) retention
    pub damping: Option<(f32, f32)>,
    /// The sequence finished this tick
    pub complete: bool,
}

/// State of one landing, created on Landing entry and dropped when the
/// touchdown completes or the landing is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingSequence {
    phase: LandingPhase,
    phase_timer: u32,
    circle_center: Vec3,
    circle_radius: f32,
    circle_angle: f32,
    target_spot: Option<Vec3>,
    emergency: bool,
}

impl LandingSequence {
    /// Begin a landing around the creature's current position.
    #[must_use]
    pub fn new(position: Vec3, tun: &LandingTunables) -> Self {
        Self {
            phase: LandingPhase::Circling,
            phase_timer: 0,
            circle_center: position,
            circle_radius: tun.circle_radius,
            circle_angle: 0.0,
            target_spot: None,
            emergency: false,
        }
    }

    /// The active phase.
    #[must_use]
    pub fn phase(&self) -> LandingPhase {
        self.phase
    }

    /// Progress through the active phase, clamped to [0, 1].
    #[must_use]
    pub fn progress(&self, tun: &LandingTunables) -> f32 {
        let duration = match self.phase {
            LandingPhase::Circling => tun.circle_ticks,
            LandingPhase::Approaching => tun.approach_ticks,
            LandingPhase::Descending => tun.descend_ticks,
            LandingPhase::Touchdown => tun.touchdown_ticks,
        };
        (self.phase_timer as f32 / duration.max(1) as f32).min(1.0)
    }

    /// The committed landing spot, `None` while still searching.
    #[must_use]
    pub fn target_spot(&self) -> Option<Vec3> {
        self.target_spot
    }

    /// Whether the committed spot came from the blind emergency fallback.
    #[must_use]
    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    /// Advance one tick.
    ///
    /// Phase changes take effect immediately: after this returns, `phase()`
    /// reports the phase the next tick will run.
    pub fn step(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        grounded: bool,
        terrain: &dyn TerrainQuery,
        rng: &mut SmallRng,
        tun: &LandingTunables,
        events: &mut EventQueue,
    ) -> LandingStep {
        self.phase_timer += 1;
        let progress = self.progress(tun);

        match self.phase {
            LandingPhase::Circling => {
                self.circle_angle += tun.circle_step_degrees;
                let angle = self.circle_angle.to_radians();
                let orbit = self.circle_center
                    + Vec3::new(angle.sin(), 0.0, angle.cos()) * self.circle_radius;

                if self.target_spot.is_none()
                    && self.phase_timer % tun.spot_sample_interval.max(1) == 0
                    && let Some(spot) = find_landing_spot(position, terrain, rng, tun)
                {
                    self.commit_spot(spot, false, events);
                }

                if self.target_spot.is_some() {
                    self.enter_phase(LandingPhase::Approaching, events);
                } else if self.phase_timer >= tun.circle_ticks {
                    let (spot, emergency) = fallback_spot(position, terrain, tun);
                    self.commit_spot(spot, emergency, events);
                    self.enter_phase(LandingPhase::Approaching, events);
                }

                LandingStep {
                    nav_target: Some(orbit),
                    ..LandingStep::default()
                }
            }
            LandingPhase::Approaching => {
                let spot = self.target_spot.unwrap_or(position);
                let approach = spot + Vec3::Y * tun.approach_height;

                if position.distance_squared(approach) <= tun.approach_radius * tun.approach_radius
                    || self.phase_timer >= tun.approach_ticks
                {
                    self.enter_phase(LandingPhase::Descending, events);
                }

                LandingStep {
                    nav_target: Some(approach),
                    ..LandingStep::default()
                }
            }
            LandingPhase::Descending => {
                let spot = self.target_spot.unwrap_or(position);
                let descend = spot + Vec3::Y * tun.descend_height;

                let near_ground = terrain
                    .ground_below(position, tun.spot_scan_depth)
                    .is_some_and(|d| d <= tun.ground_near);
                if grounded || near_ground || self.phase_timer >= tun.descend_ticks {
                    self.enter_phase(LandingPhase::Touchdown, events);
                }

                LandingStep {
                    nav_target: Some(descend),
                    // The sink ramps in with progress so the descent starts
                    // gentle and firms up.
                    sink: tun.descend_sink * progress,
                    ..LandingStep::default()
                }
            }
            LandingPhase::Touchdown => {
                let mut step = LandingStep::default();
                if grounded {
                    step.damping = Some((tun.touchdown_damp_horizontal, tun.touchdown_damp_vertical));
                    if velocity.length_squared() <= tun.rest_speed_sq {
                        step.complete = true;
                    }
                } else {
                    step.nav_target = self.target_spot;
                    step.sink = tun.touchdown_sink;
                }
                if self.phase_timer >= tun.touchdown_ticks {
                    step.complete = true;
                }
                step
            }
        }
    }

    fn commit_spot(&mut self, spot: Vec3, emergency: bool, events: &mut EventQueue) {
        self.target_spot = Some(spot);
        self.emergency = emergency;
        if emergency {
            log::warn!("no valid landing spot found, committing blind at {spot}");
            events.push(LocomotionEvent::EmergencySpot { position: spot });
        } else {
            log::debug!("landing spot committed at {spot}");
            events.push(LocomotionEvent::SpotCommitted { position: spot });
        }
    }

    fn enter_phase(&mut self, phase: LandingPhase, events: &mut EventQueue) {
        log::debug!("landing phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_timer = 0;
        events.push(LocomotionEvent::LandingPhaseChanged { phase });
    }
}

/// Search for a valid landing surface near `position`.
///
/// Up to `spot_attempts` random casts: pick a direction and a distance,
/// snap to the cell grid, scan down for the first solid surface, and accept
/// it if it is solid, has headroom, is not flooded, and can be seen from
/// here. First hit wins.
#[must_use]
pub fn find_landing_spot(
    position: Vec3,
    terrain: &dyn TerrainQuery,
    rng: &mut SmallRng,
    tun: &LandingTunables,
) -> Option<Vec3> {
    for _ in 0..tun.spot_attempts {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let distance = rng.gen_range(tun.spot_min_distance..=tun.search_radius.max(tun.spot_min_distance));
        let candidate = Vec3::new(
            (position.x + angle.sin() * distance).floor() + 0.5,
            position.y,
            (position.z + angle.cos() * distance).floor() + 0.5,
        );

        let Some(depth) = terrain.ground_below(candidate, tun.spot_scan_depth) else {
            continue;
        };
        let spot = Vec3::new(candidate.x, candidate.y - depth, candidate.z);
        if validate_spot(position, spot, terrain, tun) {
            return Some(spot);
        }
    }
    None
}

/// The degraded path when the search fails: check straight down, and if
/// even that is unusable, commit blind to a point below the creature. The
/// blind commit is reported as an emergency so consumers can react.
pub(crate) fn fallback_spot(
    position: Vec3,
    terrain: &dyn TerrainQuery,
    tun: &LandingTunables,
) -> (Vec3, bool) {
    if let Some(depth) = terrain.ground_below(position, tun.spot_scan_depth) {
        let spot = Vec3::new(position.x, position.y - depth, position.z);
        if validate_spot(position, spot, terrain, tun) {
            return (spot, false);
        }
    }
    (position - Vec3::Y * tun.emergency_drop, true)
}

fn validate_spot(from: Vec3, spot: Vec3, terrain: &dyn TerrainQuery, tun: &LandingTunables) -> bool {
    terrain.is_solid(spot - Vec3::Y * 0.5)
        && terrain.has_clearance(spot, tun.spot_headroom)
        && !terrain.fluid_at(spot + Vec3::Y * 0.1)
        && terrain.visible(from, spot + Vec3::Y * 1.0)
}
