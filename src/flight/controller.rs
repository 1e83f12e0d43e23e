//! Locomotion mode state machine
//!
//! One controller per creature. Each tick it arbitrates the discrete mode,
//! runs the matching physics integration as the single writer of the body's
//! velocity, steps the landing sequencer when one is active, and feeds the
//! wing animator. Mode and navigation changes surface as events; requests
//! that are not actionable are dropped without error.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::animation::{BlendWeights, WingAnimator};
use crate::core::{EventQueue, LocomotionEvent, SavedLocomotion};
use crate::flight::config::FlightTunables;
use crate::flight::landing::{LandingPhase, LandingSequence};
use crate::flight::physics::{glide_step, hover_step};
use crate::flight::state::{FlightState, LocomotionMode, NavMode, TickInputs};
use crate::flight::steering::{ease_pitch_into_band, turn_toward, yaw_pitch_to};
use crate::sim::Body;
use crate::terrain::TerrainQuery;

/// Flight locomotion controller for one creature.
pub struct FlightController {
    tunables: FlightTunables,
    state: FlightState,
    landing: Option<LandingSequence>,
    animator: WingAnimator,
    rng: SmallRng,
    takeoff_requested: bool,
    last_reported: LocomotionMode,
}

impl FlightController {
    /// A grounded controller with entropy-seeded randomness.
    #[must_use]
    pub fn new(tunables: FlightTunables) -> Self {
        Self {
            animator: WingAnimator::new(tunables.wing),
            rng: SmallRng::from_entropy(),
            tunables,
            state: FlightState::new(),
            landing: None,
            takeoff_requested: false,
            last_reported: LocomotionMode::Grounded,
        }
    }

    /// A grounded controller with fixed seeds, for reproducible runs.
    #[must_use]
    pub fn with_seed(tunables: FlightTunables, seed: u64) -> Self {
        Self {
            animator: WingAnimator::with_seed(tunables.wing, seed),
            rng: SmallRng::seed_from_u64(seed.wrapping_add(1)),
            tunables,
            state: FlightState::new(),
            landing: None,
            takeoff_requested: false,
            last_reported: LocomotionMode::Grounded,
        }
    }

    /// Ask for a takeoff. Acted on next tick; dropped if the creature is
    /// not grounded or is seated.
    pub fn request_takeoff(&mut self) {
        self.takeoff_requested = true;
    }

    /// Ask for a landing. Dropped if the creature is already grounded.
    pub fn request_landing(&mut self) {
        if self.state.is_airborne() {
            self.state.landing_requested = true;
        }
    }

    /// Cancel a pending or active landing. An active sequence reverts the
    /// creature to flying.
    pub fn cancel_landing(&mut self) {
        if self.state.landing_requested {
            self.state.landing_requested = false;
            self.state.landing_rescinded = true;
        }
        if self.state.base == LocomotionMode::Landing {
            self.landing = None;
            self.state.base = LocomotionMode::Flying;
            self.state.landing_rescinded = true;
            log::debug!("landing cancelled, back to flight");
        }
    }

    /// Run one simulation tick.
    ///
    /// Writes the body's velocity and look orientation; position integration
    /// is the body's own job afterwards.
    pub fn update(
        &mut self,
        body: &mut Body,
        inputs: &TickInputs,
        terrain: &dyn TerrainQuery,
        events: &mut EventQueue,
    ) {
        if inputs.seated {
            // Forced override: a seated or ridden-as-mount creature is
            // grounded no matter what it was doing.
            self.takeoff_requested = false;
            self.drop_to_ground(events);
            self.update_airborne_clock(body);
            self.update_animator(body, inputs, events);
            self.finish_tick(events);
            return;
        }

        let modes = self.tunables.modes;
        if modes.max_flight_ticks > 0
            && self.state.base == LocomotionMode::Flying
            && self.state.ticks_airborne >= modes.max_flight_ticks
            && !self.state.landing_requested
        {
            log::debug!(
                "airborne for {} ticks, deciding to land",
                self.state.ticks_airborne
            );
            self.state.landing_requested = true;
        }
        if inputs.wants_to_land && self.state.is_airborne() {
            self.state.landing_requested = true;
        }

        if self.state.base == LocomotionMode::Grounded {
            let should_takeoff = !body.on_ground
                && (self.state.ticks_airborne < modes.takeoff_ticks
                    || self.state.landing_rescinded
                    || inputs.target.is_some());
            if self.takeoff_requested || should_takeoff {
                self.begin_takeoff(events);
            }
        }
        self.takeoff_requested = false;

        match self.state.base {
            LocomotionMode::Grounded => {
                // Ground locomotion belongs to the ground navigator.
            }
            LocomotionMode::Takeoff => self.tick_takeoff(body, inputs, terrain, events),
            LocomotionMode::Flying | LocomotionMode::Hovering => {
                self.tick_flying(body, inputs, terrain, events);
            }
            LocomotionMode::Landing => self.tick_landing(body, inputs, terrain, events),
        }

        self.update_airborne_clock(body);
        self.update_animator(body, inputs, events);
        self.finish_tick(events);
    }

    fn tick_takeoff(
        &mut self,
        body: &mut Body,
        inputs: &TickInputs,
        terrain: &dyn TerrainQuery,
        events: &mut EventQueue,
    ) {
        let modes = self.tunables.modes;

        if self.state.landing_requested && body.on_ground {
            // The abort sink brought the creature back down before the
            // window ended.
            self.drop_to_ground(events);
            return;
        }

        if self.state.ticks_airborne >= modes.takeoff_ticks {
            self.state.base = LocomotionMode::Flying;
            self.tick_flying(body, inputs, terrain, events);
            return;
        }

        let friction = self.ground_friction(body, terrain);
        body.velocity =
            hover_step(body.velocity, body.position, None, friction, &self.tunables.hover);
        if self.state.landing_requested {
            // Landing was requested mid-window: sink instead of lifting, and
            // the grounded check above ends the takeoff on contact.
            body.velocity.y -= modes.abort_sink;
        } else {
            body.velocity.y += modes.takeoff_lift;
        }
        body.pitch = turn_toward(body.pitch, 15.0, modes.pitch_rate);
    }

    fn tick_flying(
        &mut self,
        body: &mut Body,
        inputs: &TickInputs,
        terrain: &dyn TerrainQuery,
        events: &mut EventQueue,
    ) {
        if self.state.landing_requested {
            self.begin_landing(body);
            self.tick_landing(body, inputs, terrain, events);
            return;
        }

        let modes = self.tunables.modes;
        let wants_hover = inputs.hover || inputs.target.is_some();
        self.state.hovering =
            wants_hover && body.velocity.length_squared() < modes.hover_speed_sq;

        if self.state.hovering {
            if let Some(target) = inputs.target {
                self.steer_yaw_toward(body, target);
            }
            body.pitch = turn_toward(body.pitch, 0.0, modes.pitch_rate);
            let friction = self.ground_friction(body, terrain);
            body.velocity = hover_step(
                body.velocity,
                body.position,
                inputs.target,
                friction,
                &self.tunables.hover,
            );
        } else {
            if let Some(target) = inputs.target {
                self.steer_yaw_toward(body, target);
            }
            self.steer_pitch(body, inputs.target);

            let (look, pitch_radians) = match inputs.look {
                Some(l) if l.length_squared() > 1.0e-6 => {
                    let look = l.normalize();
                    (look, look.y.clamp(-1.0, 1.0).asin())
                }
                _ => (body.look_dir(), body.pitch.to_radians()),
            };
            let weights = self.animator.weights();
            body.velocity = glide_step(
                body.velocity,
                look,
                pitch_radians,
                weights.flap,
                weights.glide,
                weights.hover,
                &self.tunables.glide,
            );
        }
    }

    fn tick_landing(
        &mut self,
        body: &mut Body,
        _inputs: &TickInputs,
        terrain: &dyn TerrainQuery,
        events: &mut EventQueue,
    ) {
        // Landing mode always carries a sequence; a restored save that lost
        // it gets a fresh one around the current position.
        let seq = self
            .landing
            .get_or_insert_with(|| LandingSequence::new(body.position, &self.tunables.landing));
        let step = seq.step(
            body.position,
            body.velocity,
            body.on_ground,
            terrain,
            &mut self.rng,
            &self.tunables.landing,
            events,
        );

        let friction = self.ground_friction(body, terrain);
        body.velocity = hover_step(
            body.velocity,
            body.position,
            step.nav_target,
            friction,
            &self.tunables.hover,
        );
        body.velocity.y -= step.sink;
        if let Some((damp_h, damp_v)) = step.damping {
            body.velocity.x *= damp_h;
            body.velocity.z *= damp_h;
            body.velocity.y *= damp_v;
        }

        if body.horizontal_speed() > 0.05 {
            let heading = body.velocity.x.atan2(body.velocity.z).to_degrees();
            body.yaw = turn_toward(body.yaw, heading, self.tunables.modes.turn_rate);
        }
        body.pitch = turn_toward(body.pitch, 0.0, self.tunables.modes.pitch_rate);

        if step.complete {
            self.finish_landing(body, events);
        }
    }

    fn begin_takeoff(&mut self, events: &mut EventQueue) {
        self.state.base = LocomotionMode::Takeoff;
        self.state.landing_rescinded = false;
        self.swap_nav(NavMode::Air, events);
    }

    fn begin_landing(&mut self, body: &Body) {
        self.state.base = LocomotionMode::Landing;
        // Consumed on entry; a new request starts a new sequence.
        self.state.landing_requested = false;
        self.state.landing_rescinded = false;
        self.landing = Some(LandingSequence::new(body.position, &self.tunables.landing));
        log::debug!("landing started at {}", body.position);
    }

    fn finish_landing(&mut self, body: &Body, events: &mut EventQueue) {
        self.landing = None;
        self.state.base = LocomotionMode::Grounded;
        self.state.hovering = false;
        self.state.landing_rescinded = false;
        self.state.ticks_airborne = 0;
        self.swap_nav(NavMode::Ground, events);
        events.push(LocomotionEvent::TouchdownComplete {
            position: body.position,
        });
        log::info!("touchdown complete at {}", body.position);
    }

    fn drop_to_ground(&mut self, events: &mut EventQueue) {
        self.landing = None;
        self.state.base = LocomotionMode::Grounded;
        self.state.hovering = false;
        self.state.landing_requested = false;
        self.state.landing_rescinded = false;
        self.swap_nav(NavMode::Ground, events);
    }

    fn swap_nav(&mut self, mode: NavMode, events: &mut EventQueue) {
        if self.state.nav.set_mode(mode) {
            log::debug!("navigation controller -> {mode:?}");
            events.push(LocomotionEvent::NavSwapped { mode });
        }
    }

    fn steer_yaw_toward(&self, body: &mut Body, target: Vec3) {
        let (yaw, _) = yaw_pitch_to(body.position, target);
        body.yaw = turn_toward(body.yaw, yaw, self.tunables.modes.turn_rate);
    }

    /// Pitch follows the direction of travel (or the target elevation), then
    /// gets eased back toward the cruise band so excursions stay transient.
    fn steer_pitch(&self, body: &mut Body, target: Option<Vec3>) {
        let modes = self.tunables.modes;
        let desired = match target {
            Some(point) => yaw_pitch_to(body.position, point).1,
            None => body
                .velocity
                .y
                .atan2(body.horizontal_speed().max(0.1))
                .to_degrees(),
        };
        body.pitch = turn_toward(body.pitch, desired, modes.pitch_rate);
        body.pitch = ease_pitch_into_band(
            body.pitch,
            modes.cruise_pitch_min,
            modes.cruise_pitch_max,
            modes.pitch_rate * 0.5,
        );
    }

    fn update_airborne_clock(&mut self, body: &Body) {
        if self.state.is_airborne() || !body.on_ground {
            self.state.ticks_airborne = self.state.ticks_airborne.saturating_add(1);
        } else {
            self.state.ticks_airborne = 0;
        }
    }

    fn update_animator(&mut self, body: &Body, inputs: &TickInputs, events: &mut EventQueue) {
        self.animator.update(
            self.state.mode(),
            body.velocity,
            body.yaw,
            body.pitch,
            inputs.target.is_some(),
            events,
        );
    }

    fn finish_tick(&mut self, events: &mut EventQueue) {
        let reported = self.state.mode();
        if reported != self.last_reported {
            log::info!("mode {:?} -> {:?}", self.last_reported, reported);
            events.push(LocomotionEvent::ModeChanged {
                from: self.last_reported,
                to: reported,
            });
            self.last_reported = reported;
        }
    }

    fn ground_friction(&self, body: &Body, terrain: &dyn TerrainQuery) -> f32 {
        terrain.friction_at(body.position - Vec3::Y * self.tunables.hover.friction_probe_depth)
    }

    /// The mode consumers observe.
    #[must_use]
    pub fn mode(&self) -> LocomotionMode {
        self.state.mode()
    }

    /// Whether the hover flag is set.
    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.state.hovering
    }

    /// Current animation blend weights.
    #[must_use]
    pub fn blend_weights(&self) -> BlendWeights {
        self.animator.weights()
    }

    /// Current wing-beat intensity.
    #[must_use]
    pub fn wing_beat_intensity(&self) -> f32 {
        self.animator.wing_beat_intensity()
    }

    /// Phase of the active landing, if one is running.
    #[must_use]
    pub fn landing_phase(&self) -> Option<LandingPhase> {
        self.landing.as_ref().map(LandingSequence::phase)
    }

    /// Progress through the active landing phase, 0 when not landing.
    #[must_use]
    pub fn landing_progress(&self) -> f32 {
        self.landing
            .as_ref()
            .map_or(0.0, |seq| seq.progress(&self.tunables.landing))
    }

    /// The committed landing spot of the active sequence.
    #[must_use]
    pub fn landing_spot(&self) -> Option<Vec3> {
        self.landing.as_ref().and_then(LandingSequence::target_spot)
    }

    /// The active navigation family.
    #[must_use]
    pub fn nav_mode(&self) -> NavMode {
        self.state.nav.mode()
    }

    /// How many ground/air navigation swaps have happened.
    #[must_use]
    pub fn nav_swap_count(&self) -> u32 {
        self.state.nav.swap_count()
    }

    /// Consecutive airborne ticks.
    #[must_use]
    pub fn ticks_airborne(&self) -> u32 {
        self.state.ticks_airborne
    }

    /// The full locomotion state, for inspection.
    #[must_use]
    pub fn state(&self) -> &FlightState {
        &self.state
    }

    /// The tuning set this controller runs with.
    #[must_use]
    pub fn tunables(&self) -> &FlightTunables {
        &self.tunables
    }

    /// Capture everything needed to resume this creature after a reload.
    #[must_use]
    pub fn snapshot(&self) -> SavedLocomotion {
        SavedLocomotion {
            state: self.state.clone(),
            blend: self.animator.snapshot(),
            landing: self.landing.clone(),
        }
    }

    /// Restore from a snapshot. No mode-change event fires; the restored
    /// mode becomes the new baseline.
    pub fn restore(&mut self, saved: &SavedLocomotion) {
        self.state = saved.state.clone();
        self.animator.restore(&saved.blend);
        self.landing = saved.landing.clone();
        self.last_reported = self.state.mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    use crate::animation::{BlendSnapshot, SavedFraction};
    use crate::flight::state::NavState;
    use crate::terrain::VoxelTerrain;

    const SEED: u64 = 17;

    fn floor_world() -> VoxelTerrain {
        // Floor fills y <= 2, surface at y = 3.
        VoxelTerrain::with_floor(64, 32, 64, 2)
    }

    fn controller() -> FlightController {
        FlightController::with_seed(FlightTunables::default(), SEED)
    }

    fn grounded_body(terrain: &VoxelTerrain) -> Body {
        let _ = terrain;
        Body::new(Vec3::new(32.0, 3.0, 32.0))
    }

    fn tick(
        ctl: &mut FlightController,
        body: &mut Body,
        inputs: &TickInputs,
        terrain: &VoxelTerrain,
        events: &mut EventQueue,
    ) {
        ctl.update(body, inputs, terrain, events);
        body.integrate(terrain);
    }

    #[test]
    fn test_takeoff_turns_into_flight_after_window() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();
        let start_y = body.position.y;

        ctl.request_takeoff();
        tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Takeoff);
        assert_eq!(ctl.nav_mode(), NavMode::Air);

        let window = FlightTunables::default().modes.takeoff_ticks;
        for _ in 1..window {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            assert_eq!(ctl.mode(), LocomotionMode::Takeoff);
        }
        tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Flying);

        // The lift over the window must have produced real altitude.
        assert!(body.position.y > start_y + 2.0);
    }

    #[test]
    fn test_takeoff_requests_while_flying_do_not_reswap_nav() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        for _ in 0..40 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Flying);
        assert_eq!(ctl.nav_swap_count(), 1);

        for _ in 0..10 {
            ctl.request_takeoff();
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Flying);
        assert_eq!(ctl.nav_swap_count(), 1);
    }

    #[test]
    fn test_landing_scenario_reaches_ground_in_budget() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        // Get airborne and cruise a little.
        ctl.request_takeoff();
        for _ in 0..60 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Flying);

        ctl.request_landing();
        tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Landing);

        let tun = FlightTunables::default().landing;
        let budget = tun.circle_ticks + tun.approach_ticks + tun.descend_ticks + tun.touchdown_ticks;
        let mut spot = None;
        let mut landed_after = None;
        for elapsed in 1..=budget + 5 {
            if let Some(s) = ctl.landing_spot() {
                spot = Some(s);
            }
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            if ctl.mode() == LocomotionMode::Grounded {
                landed_after = Some(elapsed);
                break;
            }
        }

        assert!(
            landed_after.is_some_and(|t| t <= budget),
            "landing exceeded the phase budget"
        );
        assert!(body.on_ground);
        assert!((body.position.y - 3.0).abs() < 0.5);
        assert_eq!(ctl.ticks_airborne(), 0);
        assert!(!ctl.is_hovering());
        assert_eq!(ctl.nav_mode(), NavMode::Ground);

        // The spot was on the floor surface.
        let spot = spot.expect("a spot was committed");
        assert!((spot.y - 3.0).abs() < 1.0e-3);

        events.swap();
        let saw_touchdown = events
            .iter()
            .any(|e| matches!(e, LocomotionEvent::TouchdownComplete { .. }));
        assert!(saw_touchdown);
    }

    #[test]
    fn test_landing_commits_to_the_platform_below() {
        // A lone platform in an otherwise bottomless world: cells y <= 10,
        // surface at y = 11. The only valid spots are on the platform.
        let mut terrain = VoxelTerrain::new(64, 32, 64);
        terrain.fill_box(IVec3::new(20, 0, 20), IVec3::new(44, 10, 44), true);

        let mut body = Body {
            position: Vec3::new(32.0, 20.0, 32.0),
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: false,
        };
        let mut ctl = controller();
        let mut nav = NavState::new();
        nav.set_mode(NavMode::Air);
        ctl.restore(&SavedLocomotion {
            state: FlightState {
                base: LocomotionMode::Flying,
                hovering: false,
                nav,
                ticks_airborne: 200,
                landing_requested: false,
                landing_rescinded: false,
            },
            blend: BlendSnapshot {
                glide: SavedFraction { fraction: 1.0, rising: true },
                flap: SavedFraction { fraction: 0.0, rising: false },
                hover: SavedFraction { fraction: 0.0, rising: false },
                intensity: 0.1,
            },
            landing: None,
        });
        assert_eq!(ctl.mode(), LocomotionMode::Flying);

        let mut events = EventQueue::new();
        let inputs = TickInputs::default();
        ctl.request_landing();

        let mut phases = Vec::new();
        let mut spot = None;
        for _ in 0..200 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            events.swap();
            for event in events.drain() {
                if let LocomotionEvent::LandingPhaseChanged { phase } = event {
                    phases.push(phase);
                }
            }
            if let Some(s) = ctl.landing_spot() {
                spot = Some(s);
            }
            if ctl.mode() == LocomotionMode::Grounded {
                break;
            }
        }

        assert_eq!(ctl.mode(), LocomotionMode::Grounded);
        assert!(body.on_ground);
        assert_eq!(
            phases,
            vec![
                LandingPhase::Approaching,
                LandingPhase::Descending,
                LandingPhase::Touchdown,
            ]
        );

        // The spot sits on the platform surface, never over the void.
        let spot = spot.expect("a spot was committed");
        assert!((spot.y - 11.0).abs() < 1.0e-3);
        assert!(spot.x >= 20.0 && spot.x <= 45.0);
        assert!(spot.z >= 20.0 && spot.z <= 45.0);
    }

    #[test]
    fn test_seated_forces_grounded_from_any_mode() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        for _ in 0..40 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        ctl.request_landing();
        tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Landing);

        let seated = TickInputs {
            seated: true,
            ..TickInputs::default()
        };
        tick(&mut ctl, &mut body, &seated, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Grounded);
        assert!(!ctl.is_hovering());
        assert_eq!(ctl.nav_mode(), NavMode::Ground);
        assert!(ctl.landing_phase().is_none());
    }

    #[test]
    fn test_landing_request_while_grounded_is_dropped() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_landing();
        for _ in 0..5 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Grounded);
        assert!(!ctl.state().landing_requested);
    }

    #[test]
    fn test_cancel_landing_reverts_to_flying() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        for _ in 0..45 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        ctl.request_landing();
        for _ in 0..10 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Landing);

        ctl.cancel_landing();
        tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Flying);
        assert!(ctl.landing_phase().is_none());
        assert!(ctl.state().landing_rescinded);
    }

    #[test]
    fn test_landing_requested_mid_takeoff_aborts_to_ground() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        for _ in 0..8 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        assert_eq!(ctl.mode(), LocomotionMode::Takeoff);
        assert!(body.position.y > 3.0);

        ctl.request_landing();
        let mut grounded_after = None;
        for elapsed in 0..60 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            assert_ne!(ctl.mode(), LocomotionMode::Flying);
            if ctl.mode() == LocomotionMode::Grounded {
                grounded_after = Some(elapsed);
                break;
            }
        }

        assert!(grounded_after.is_some());
        assert!(body.on_ground);
        // Air swap on takeoff, ground swap on the abort.
        assert_eq!(ctl.nav_swap_count(), 2);
    }

    #[test]
    fn test_hover_flag_engages_near_target_and_clears() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();

        ctl.request_takeoff();
        let lift_off = TickInputs::default();
        for _ in 0..40 {
            tick(&mut ctl, &mut body, &lift_off, &terrain, &mut events);
        }

        // Hold position on a target right here: velocity decays, flag sets.
        let hold = TickInputs {
            target: Some(body.position),
            hover: true,
            ..TickInputs::default()
        };
        let mut hovered = false;
        for _ in 0..80 {
            tick(&mut ctl, &mut body, &hold, &terrain, &mut events);
            if ctl.is_hovering() {
                hovered = true;
                break;
            }
        }
        assert!(hovered);
        assert_eq!(ctl.mode(), LocomotionMode::Hovering);

        // The flag never survives grounding.
        let seated = TickInputs {
            seated: true,
            ..TickInputs::default()
        };
        tick(&mut ctl, &mut body, &seated, &terrain, &mut events);
        assert_eq!(ctl.mode(), LocomotionMode::Grounded);
        assert!(!ctl.is_hovering());
    }

    #[test]
    fn test_pitch_stays_in_cruise_band_once_stabilized() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        for _ in 0..40 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
        }
        // Give it some forward way so the glide has something to work with.
        body.velocity += Vec3::new(0.0, 0.0, 1.0);

        // The ease pulls at half the pitch rate, so a steady excursion can
        // sit at most one rate step past the band edge.
        let modes = FlightTunables::default().modes;
        let low = modes.cruise_pitch_min - modes.pitch_rate;
        let high = modes.cruise_pitch_max + modes.pitch_rate;
        for tick_index in 0..160 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            if ctl.mode() != LocomotionMode::Flying {
                break;
            }
            if tick_index > 60 {
                assert!(
                    body.pitch >= low && body.pitch <= high,
                    "pitch {} left the cruise band at tick {tick_index}",
                    body.pitch
                );
            }
        }
    }

    #[test]
    fn test_flight_duration_heuristic_lands_on_its_own() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl =
            FlightController::with_seed(FlightTunables::default().with_max_flight_ticks(50), SEED);
        let mut events = EventQueue::new();
        let inputs = TickInputs::default();

        ctl.request_takeoff();
        let mut saw_landing = false;
        for _ in 0..400 {
            tick(&mut ctl, &mut body, &inputs, &terrain, &mut events);
            if ctl.mode() == LocomotionMode::Landing {
                saw_landing = true;
            }
            if saw_landing && ctl.mode() == LocomotionMode::Grounded {
                break;
            }
        }

        assert!(saw_landing, "the duration heuristic never triggered");
        assert_eq!(ctl.mode(), LocomotionMode::Grounded);
    }

    #[test]
    fn test_hovering_never_reported_while_grounded() {
        let terrain = floor_world();
        let mut body = grounded_body(&terrain);
        let mut ctl = controller();
        let mut events = EventQueue::new();

        let busy = TickInputs {
            target: Some(Vec3::new(40.0, 10.0, 40.0)),
            hover: true,
            ..TickInputs::default()
        };
        ctl.request_takeoff();
        for _ in 0..300 {
            tick(&mut ctl, &mut body, &busy, &terrain, &mut events);
            if ctl.mode() == LocomotionMode::Grounded {
                assert!(!ctl.is_hovering());
            }
        }
    }
}
