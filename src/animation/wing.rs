//! Wing animation blend controller
//!
//! Converts raw physics signals into three cross-faded blend weights plus a
//! wing-beat intensity scalar. The flap/glide split is sticky by contract:
//! the entry threshold sits well above the exit threshold, and each side of
//! the toggle carries a minimum hold, so a creature riding the decision
//! boundary cannot flicker the blend every tick.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::animation::blend::{BlendWeights, FractionTimer, SavedFraction};
use crate::core::{EventQueue, LocomotionEvent};
use crate::flight::{LocomotionMode, WingTunables, wrap_degrees};

/// Persisted animator state: the three eased fractions with their direction
/// flags, plus the smoothed intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendSnapshot {
    /// Glide timer snapshot
    pub glide: SavedFraction,
    /// Flap timer snapshot
    pub flap: SavedFraction,
    /// Hover timer snapshot
    pub hover: SavedFraction,
    /// Wing-beat intensity at save time
    pub intensity: f32,
}

/// Per-creature animation blend state.
pub struct WingAnimator {
    tun: WingTunables,
    gliding: FractionTimer,
    flapping: FractionTimer,
    hovering: FractionTimer,
    /// Exponentially smoothed "the wings should be working" signal
    demand: f32,
    in_flap_cycle: bool,
    /// Ticks since the cycle state last changed
    cycle_ticks: u32,
    /// Ticks until the next discrete flap event may fire
    flap_event_timer: u32,
    intensity: f32,
    sound_played: bool,
    last_yaw: Option<f32>,
    rng: SmallRng,
}

impl WingAnimator {
    /// Create an animator with an entropy-seeded RNG.
    #[must_use]
    pub fn new(tun: WingTunables) -> Self {
        Self::with_rng(tun, SmallRng::from_entropy())
    }

    /// Create an animator with a fixed seed. Flap-event timing becomes
    /// reproducible, which tests rely on.
    #[must_use]
    pub fn with_seed(tun: WingTunables, seed: u64) -> Self {
        Self::with_rng(tun, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(tun: WingTunables, rng: SmallRng) -> Self {
        Self {
            gliding: FractionTimer::new(tun.glide_blend_ticks),
            flapping: FractionTimer::new(tun.flap_blend_ticks),
            hovering: FractionTimer::new(tun.hover_blend_ticks),
            demand: 0.0,
            in_flap_cycle: false,
            // No recent cycle, so the first flap is not stuck in a cooldown.
            cycle_ticks: tun.glide_min_hold,
            flap_event_timer: 0,
            intensity: 0.0,
            sound_played: false,
            last_yaw: None,
            rng,
            tun,
        }
    }

    /// Advance the blend one tick from the current physics signals.
    ///
    /// `yaw_degrees`/`pitch_degrees` are the look orientation; turn rate is
    /// derived from the yaw delta between consecutive calls. Discrete flap
    /// and sound-cue events go into `events`.
    pub fn update(
        &mut self,
        mode: LocomotionMode,
        velocity: Vec3,
        yaw_degrees: f32,
        pitch_degrees: f32,
        has_target: bool,
        events: &mut EventQueue,
    ) {
        self.flap_event_timer = self.flap_event_timer.saturating_sub(1);
        self.cycle_ticks = self.cycle_ticks.saturating_add(1);

        let h_speed_sq = velocity.x * velocity.x + velocity.z * velocity.z;
        let slow = h_speed_sq < self.tun.slow_speed_sq;
        let climbing = velocity.y > self.tun.climb_speed;
        let strong_climb = velocity.y > self.tun.strong_climb_speed;
        let diving = pitch_degrees < self.tun.dive_pitch && velocity.y < -self.tun.dive_speed;
        let gentle_descent = !diving && velocity.y < -self.tun.gentle_sink;
        let turning = match self.last_yaw {
            Some(prev) => wrap_degrees(yaw_degrees - prev).abs() > self.tun.turn_threshold,
            None => false,
        };
        let hover_pose = mode == LocomotionMode::Hovering || (slow && has_target);

        match mode {
            LocomotionMode::Grounded => {
                self.gliding.decrease();
                self.flapping.decrease();
                self.hovering.decrease();
                self.demand *= 1.0 - self.tun.demand_smoothing;
                self.in_flap_cycle = false;
            }
            LocomotionMode::Takeoff | LocomotionMode::Landing | LocomotionMode::Hovering => {
                self.step_hover_pose(climbing, slow, velocity.y, events);
            }
            LocomotionMode::Flying if hover_pose => {
                self.step_hover_pose(climbing, slow, velocity.y, events);
            }
            LocomotionMode::Flying => {
                let active = diving || climbing || turning || slow || gentle_descent;
                self.step_forward_flight(active, diving, strong_climb, events);
            }
        }

        self.step_intensity(velocity, events);
        self.last_yaw = Some(yaw_degrees);
    }

    /// Hover-family tick: hover pose dominates, wings beat when the body is
    /// climbing, crawling, or falling hard.
    fn step_hover_pose(&mut self, climbing: bool, slow: bool, v_y: f32, events: &mut EventQueue) {
        self.hovering.increase();
        self.gliding.decrease();

        let beating = climbing || slow || v_y.abs() > self.tun.hover_sink_speed;
        if beating {
            self.flapping.increase();
        } else {
            self.flapping.decrease();
        }
        self.in_flap_cycle = beating;

        if self.flap_event_timer == 0 {
            let fire = climbing || self.rng.gen_bool(self.tun.hover_flap_chance);
            if fire {
                events.push(LocomotionEvent::WingFlap {
                    intensity: self.intensity,
                });
                self.flap_event_timer = self.tun.flap_event_cooldown;
            }
        }
    }

    /// Forward-flight tick: hysteresis between flap cycles and glide.
    fn step_forward_flight(
        &mut self,
        active: bool,
        diving: bool,
        strong_climb: bool,
        events: &mut EventQueue,
    ) {
        self.hovering.decrease();

        let raw = if active { 1.0 } else { 0.0 };
        self.demand += (raw - self.demand) * self.tun.demand_smoothing;

        if self.in_flap_cycle {
            // Hold the beat long enough to read visually, then require the
            // demand to fall well below the entry level before releasing.
            if self.cycle_ticks >= self.tun.flap_min_hold
                && self.demand < self.tun.flap_exit_threshold
            {
                self.in_flap_cycle = false;
                self.cycle_ticks = 0;
            }
        } else {
            let cooled_down = self.cycle_ticks >= self.tun.glide_min_hold;
            if self.demand > self.tun.flap_enter_threshold && (cooled_down || strong_climb) {
                self.in_flap_cycle = true;
                self.cycle_ticks = 0;
            }
        }

        if self.in_flap_cycle {
            self.flapping.increase();
            self.gliding.decrease();
        } else {
            self.gliding.increase();
            self.flapping.decrease();
        }

        // A sharp correction gets an audible beat even outside a cycle.
        if self.flap_event_timer == 0 && (diving || strong_climb) {
            events.push(LocomotionEvent::WingFlap {
                intensity: self.intensity,
            });
            let jitter = self.tun.flap_event_jitter as i32;
            let next = self.tun.flap_event_cooldown as i32 + self.rng.gen_range(-jitter..=jitter);
            self.flap_event_timer = next.max(1) as u32;
        }
    }

    /// Smooth the wing-beat intensity toward the dominant fraction and run
    /// the sound-cue gate.
    fn step_intensity(&mut self, velocity: Vec3, events: &mut EventQueue) {
        let flap = self.flapping.fraction();
        let glide = self.gliding.fraction();
        let hover = self.hovering.fraction();

        // Flapping is loud, hovering is a soft constant beat, a clean glide
        // is nearly silent.
        let dominant = flap.max(hover * 0.55).max(glide * 0.12);
        let speed_mod = 0.75 + 0.25 * (velocity.length() / 0.6).min(1.0);
        let target = (dominant * speed_mod).clamp(0.0, 1.0);
        self.intensity += (target - self.intensity) * self.tun.intensity_smoothing;

        if !self.sound_played && self.intensity > self.tun.sound_on_threshold {
            events.push(LocomotionEvent::WingSoundCue {
                intensity: self.intensity,
            });
            self.sound_played = true;
        } else if self.sound_played && self.intensity < self.tun.sound_off_threshold {
            self.sound_played = false;
        }
    }

    /// The three blend weights, each in [0, 1].
    #[must_use]
    pub fn weights(&self) -> BlendWeights {
        BlendWeights {
            glide: self.gliding.fraction(),
            flap: self.flapping.fraction(),
            hover: self.hovering.fraction(),
        }
    }

    /// The smoothed wing-beat intensity in [0, 1].
    #[must_use]
    pub fn wing_beat_intensity(&self) -> f32 {
        self.intensity
    }

    /// Whether a flap cycle is currently held.
    #[must_use]
    pub fn flap_cycle_active(&self) -> bool {
        self.in_flap_cycle
    }

    /// Capture the persistable animator state.
    #[must_use]
    pub fn snapshot(&self) -> BlendSnapshot {
        BlendSnapshot {
            glide: self.gliding.snapshot(),
            flap: self.flapping.snapshot(),
            hover: self.hovering.snapshot(),
            intensity: self.intensity,
        }
    }

    /// Restore from a snapshot. Timers are rebuilt through the inverse ease;
    /// the flap-cycle flag follows the flap direction flag, and its hold
    /// starts over.
    pub fn restore(&mut self, snapshot: &BlendSnapshot) {
        self.gliding = FractionTimer::from_saved(self.tun.glide_blend_ticks, snapshot.glide);
        self.flapping = FractionTimer::from_saved(self.tun.flap_blend_ticks, snapshot.flap);
        self.hovering = FractionTimer::from_saved(self.tun.hover_blend_ticks, snapshot.hover);
        self.intensity = snapshot.intensity;
        self.in_flap_cycle = snapshot.flap.rising;
        self.cycle_ticks = if self.in_flap_cycle {
            0
        } else {
            self.tun.glide_min_hold
        };
        self.demand = if snapshot.flap.rising { 1.0 } else { 0.0 };
        self.sound_played = self.intensity > self.tun.sound_on_threshold;
        self.last_yaw = None;
    }
}
