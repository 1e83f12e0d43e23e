//! Scripted flight over a voxel island
//!
//! Spawns one creature, walks it through a full locomotion cycle (takeoff,
//! cruise to a plateau, hover at a perch, land) and finishes with a
//! save/load round trip. Run with `RUST_LOG=debug` to watch the landing
//! sequencer work.

use std::time::Duration;

use glam::IVec3;
use wingbeat::prelude::*;

/// Frame delta fed to the tick clock, a little faster than the tick rate.
const FRAME: Duration = Duration::from_millis(16);
const MAX_TICKS: u64 = 1200;

const TAKEOFF_TICK: u64 = 20;
const CRUISE_TICK: u64 = 40;
const PERCH_TICK: u64 = 260;
const LAND_TICK: u64 = 380;

fn build_island() -> VoxelTerrain {
    // Sea-level floor with a plateau in one corner, a pond, and an icy
    // patch near the spawn.
    let mut terrain = VoxelTerrain::with_floor(64, 40, 64, 3);
    terrain.fill_box(IVec3::new(40, 4, 40), IVec3::new(56, 11, 56), true);
    for x in 8..18 {
        for z in 40..56 {
            terrain.set_fluid(IVec3::new(x, 4, z), true);
        }
    }
    for x in 20..28 {
        for z in 10..18 {
            terrain.set_friction(IVec3::new(x, 3, z), 0.3);
        }
    }
    terrain
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut world = SimWorld::new(build_island());
    let creature = world.spawn_creature(Vec3::new(16.0, 4.0, 16.0), FlightTunables::default());
    log::info!("creature spawned on the beach at (16, 4, 16)");

    let cruise_point = Vec3::new(48.0, 24.0, 48.0);
    let perch_point = Vec3::new(48.0, 15.0, 48.0);

    let mut clock = TickClock::new();
    let mut landed = false;
    while world.tick_count() < MAX_TICKS && !landed {
        for _ in 0..clock.advance(FRAME) {
            world.step();
            let tick = world.tick_count();

            match tick {
                TAKEOFF_TICK => {
                    log::info!("[tick {tick}] requesting takeoff");
                    world.request_takeoff(creature)?;
                }
                CRUISE_TICK => {
                    log::info!("[tick {tick}] cruising toward the plateau");
                    world.set_inputs(
                        creature,
                        TickInputs {
                            target: Some(cruise_point),
                            ..TickInputs::default()
                        },
                    )?;
                }
                PERCH_TICK => {
                    log::info!("[tick {tick}] slowing to hover at the perch");
                    world.set_inputs(
                        creature,
                        TickInputs {
                            target: Some(perch_point),
                            hover: true,
                            ..TickInputs::default()
                        },
                    )?;
                }
                LAND_TICK => {
                    log::info!("[tick {tick}] coming down");
                    world.set_inputs(creature, TickInputs::default())?;
                    world.request_landing(creature)?;
                }
                _ => {}
            }

            for event in world.events() {
                log::info!("[tick {tick}] {event:?}");
            }

            if tick % 40 == 0 {
                let body = world.body(creature)?;
                let controller = world.controller(creature)?;
                log::debug!(
                    "[tick {tick}] {:?} at {:.1} speed {:.2} weights {:?} beat {:.2}",
                    controller.mode(),
                    body.position,
                    body.velocity.length(),
                    controller.blend_weights(),
                    controller.wing_beat_intensity(),
                );
            }

            if tick > LAND_TICK && world.mode(creature)? == LocomotionMode::Grounded {
                landed = true;
                break;
            }
        }
    }

    let body = world.body(creature)?;
    let controller = world.controller(creature)?;
    log::info!(
        "finished after {} ticks: {:?} at {:.1}, {} nav swaps",
        world.tick_count(),
        controller.mode(),
        body.position,
        controller.nav_swap_count(),
    );
    drop(controller);

    // Round-trip the whole population through a save.
    let save = world.save();
    let ron = ron::ser::to_string_pretty(&save, ron::ser::PrettyConfig::default())?;
    log::info!("save captured ({} bytes of RON)", ron.len());

    let mut reloaded = SimWorld::new(build_island());
    let entities = reloaded.load(&save, FlightTunables::default());
    for entity in entities {
        log::info!("restored creature in mode {:?}", reloaded.mode(entity)?);
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Demo error: {e}");
    }
}
