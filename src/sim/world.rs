//! Creature simulation world
//!
//! Hosts flying creatures as hecs entities over a terrain and steps them at
//! the fixed tick rate. Each creature is a `(Body, FlightController,
//! TickInputs)` bundle; the step loop runs the controller as the single
//! velocity writer, then integrates the body against the terrain.

use glam::Vec3;
use hecs::Entity;

use crate::core::{EventQueue, LocomotionEvent, SaveState, SavedCreature};
use crate::flight::{FlightController, FlightTunables, LocomotionMode, TickInputs};
use crate::sim::body::Body;
use crate::terrain::TerrainQuery;

/// Simulation world over one terrain.
pub struct SimWorld<T> {
    world: hecs::World,
    terrain: T,
    events: EventQueue,
    tick: u64,
}

impl<T: TerrainQuery> SimWorld<T> {
    /// Create an empty world over the given terrain.
    pub fn new(terrain: T) -> Self {
        Self {
            world: hecs::World::new(),
            terrain,
            events: EventQueue::new(),
            tick: 0,
        }
    }

    /// Spawn a grounded creature at `position`.
    pub fn spawn_creature(&mut self, position: Vec3, tunables: FlightTunables) -> Entity {
        self.world.spawn((
            Body::new(position),
            FlightController::new(tunables),
            TickInputs::default(),
        ))
    }

    /// Spawn a grounded creature with deterministic randomness.
    pub fn spawn_creature_seeded(
        &mut self,
        position: Vec3,
        tunables: FlightTunables,
        seed: u64,
    ) -> Entity {
        self.world.spawn((
            Body::new(position),
            FlightController::with_seed(tunables, seed),
            TickInputs::default(),
        ))
    }

    /// Remove a creature.
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.world.despawn(entity)
    }

    /// Replace a creature's inputs for the coming ticks.
    pub fn set_inputs(
        &mut self,
        entity: Entity,
        inputs: TickInputs,
    ) -> Result<(), hecs::ComponentError> {
        *self.world.get::<&mut TickInputs>(entity)? = inputs;
        Ok(())
    }

    /// Ask a creature to take off.
    pub fn request_takeoff(&mut self, entity: Entity) -> Result<(), hecs::ComponentError> {
        self.world
            .get::<&mut FlightController>(entity)?
            .request_takeoff();
        Ok(())
    }

    /// Ask a creature to land.
    pub fn request_landing(&mut self, entity: Entity) -> Result<(), hecs::ComponentError> {
        self.world
            .get::<&mut FlightController>(entity)?
            .request_landing();
        Ok(())
    }

    /// Call off a creature's landing.
    pub fn cancel_landing(&mut self, entity: Entity) -> Result<(), hecs::ComponentError> {
        self.world
            .get::<&mut FlightController>(entity)?
            .cancel_landing();
        Ok(())
    }

    /// Run one simulation tick for every creature.
    ///
    /// Events pushed during the tick become visible through [`Self::events`]
    /// until the next call.
    pub fn step(&mut self) {
        self.tick += 1;
        for (_entity, (body, controller, inputs)) in self
            .world
            .query_mut::<(&mut Body, &mut FlightController, &TickInputs)>()
        {
            controller.update(body, inputs, &self.terrain, &mut self.events);
            body.integrate(&self.terrain);
        }
        self.events.swap();
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Events from the most recent tick.
    pub fn events(&self) -> impl Iterator<Item = &LocomotionEvent> {
        self.events.iter()
    }

    /// A copy of a creature's body.
    pub fn body(&self, entity: Entity) -> Result<Body, hecs::ComponentError> {
        Ok(*self.world.get::<&Body>(entity)?)
    }

    /// A creature's observed locomotion mode.
    pub fn mode(&self, entity: Entity) -> Result<LocomotionMode, hecs::ComponentError> {
        Ok(self.world.get::<&FlightController>(entity)?.mode())
    }

    /// Borrow a creature's controller.
    pub fn controller(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, FlightController>, hecs::ComponentError> {
        self.world.get::<&FlightController>(entity)
    }

    /// The terrain creatures fly over.
    pub fn terrain(&self) -> &T {
        &self.terrain
    }

    /// Mutable terrain access, for worlds that change under the flock.
    pub fn terrain_mut(&mut self) -> &mut T {
        &mut self.terrain
    }

    /// Number of creatures.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.world.len()
    }

    /// Whether the world holds no creatures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Capture every creature into a save.
    #[must_use]
    pub fn save(&self) -> SaveState {
        let mut save = SaveState::new();
        for (_entity, (body, controller)) in
            self.world.query::<(&Body, &FlightController)>().iter()
        {
            save.add_creature(SavedCreature {
                body: *body,
                locomotion: controller.snapshot(),
            });
        }
        save
    }

    /// Replace the population with the creatures from a save.
    ///
    /// Returns the spawned entities in save order.
    pub fn load(&mut self, save: &SaveState, tunables: FlightTunables) -> Vec<Entity> {
        self.world.clear();
        self.events.clear();
        save.creatures
            .iter()
            .map(|creature| {
                let mut controller = FlightController::new(tunables);
                controller.restore(&creature.locomotion);
                self.world
                    .spawn((creature.body, controller, TickInputs::default()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::VoxelTerrain;

    fn island_world() -> SimWorld<VoxelTerrain> {
        SimWorld::new(VoxelTerrain::with_floor(64, 32, 64, 2))
    }

    #[test]
    fn test_spawned_creature_flies_on_request() {
        let mut world = island_world();
        let creature =
            world.spawn_creature_seeded(Vec3::new(32.0, 3.0, 32.0), FlightTunables::default(), 5);

        world.request_takeoff(creature).unwrap();
        for _ in 0..40 {
            world.step();
        }

        assert_eq!(world.mode(creature).unwrap(), LocomotionMode::Flying);
        assert!(world.body(creature).unwrap().position.y > 5.0);
        assert_eq!(world.tick_count(), 40);
    }

    #[test]
    fn test_events_surface_after_the_tick_that_caused_them() {
        let mut world = island_world();
        let creature =
            world.spawn_creature_seeded(Vec3::new(32.0, 3.0, 32.0), FlightTunables::default(), 5);

        world.step();
        assert_eq!(world.events().count(), 0);

        world.request_takeoff(creature).unwrap();
        world.step();
        let saw_mode_change = world.events().any(|e| {
            matches!(
                e,
                LocomotionEvent::ModeChanged {
                    to: LocomotionMode::Takeoff,
                    ..
                }
            )
        });
        let saw_nav_swap = world
            .events()
            .any(|e| matches!(e, LocomotionEvent::NavSwapped { .. }));
        assert!(saw_mode_change);
        assert!(saw_nav_swap);

        // The next tick's view replaces this one.
        world.step();
        let stale = world.events().any(|e| {
            matches!(
                e,
                LocomotionEvent::ModeChanged {
                    to: LocomotionMode::Takeoff,
                    ..
                }
            )
        });
        assert!(!stale);
    }

    #[test]
    fn test_commands_to_missing_creatures_error() {
        let mut world = island_world();
        let creature =
            world.spawn_creature(Vec3::new(10.0, 3.0, 10.0), FlightTunables::default());
        world.despawn(creature).unwrap();

        assert!(world.request_takeoff(creature).is_err());
        assert!(world.set_inputs(creature, TickInputs::default()).is_err());
    }

    #[test]
    fn test_save_and_load_round_trip_population() {
        let mut world = island_world();
        let tunables = FlightTunables::default();
        let flier = world.spawn_creature_seeded(Vec3::new(32.0, 3.0, 32.0), tunables, 5);
        let _walker = world.spawn_creature_seeded(Vec3::new(20.0, 3.0, 20.0), tunables, 6);

        world.request_takeoff(flier).unwrap();
        for _ in 0..40 {
            world.step();
        }
        let save = world.save();
        assert_eq!(save.creature_count(), 2);

        let mut fresh = island_world();
        let entities = fresh.load(&save, tunables);
        assert_eq!(fresh.len(), 2);

        let modes: Vec<LocomotionMode> = entities
            .iter()
            .map(|&e| fresh.mode(e).unwrap())
            .collect();
        assert!(modes.contains(&LocomotionMode::Flying));
        assert!(modes.contains(&LocomotionMode::Grounded));
    }
}
