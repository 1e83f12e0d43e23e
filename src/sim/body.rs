//! Creature body state
//!
//! Position, velocity and look orientation for one creature, plus the
//! position integration the locomotion controller deliberately does not do
//! itself: the controller is the single writer of velocity, the body owns
//! turning that velocity into motion and resolving ground contact.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::flight::look_vector;
use crate::terrain::TerrainQuery;

/// How far up the penetration resolver will search for open air.
const MAX_POP_UP_CELLS: i32 = 16;

/// Kinematic state of one creature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    /// World position
    pub position: Vec3,
    /// Velocity in units per tick
    pub velocity: Vec3,
    /// Look yaw in degrees; 0 faces +Z, growing toward +X
    pub yaw: f32,
    /// Look pitch in degrees, positive looking up
    pub pitch: f32,
    /// Ground contact, refreshed by [`Body::integrate`]
    pub on_ground: bool,
}

impl Body {
    /// A body at rest on the ground at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            on_ground: true,
        }
    }

    /// The unit look direction for the current yaw and pitch.
    #[must_use]
    pub fn look_dir(&self) -> Vec3 {
        look_vector(self.yaw, self.pitch)
    }

    /// Horizontal speed in units per tick.
    #[must_use]
    pub fn horizontal_speed(&self) -> f32 {
        (self.velocity.x * self.velocity.x + self.velocity.z * self.velocity.z).sqrt()
    }

    /// Apply one tick of motion and refresh ground contact.
    ///
    /// A body that crossed into solid ground this tick is popped back up to
    /// the surface with its downward motion zeroed; a body resting within a
    /// small tolerance of a surface is snapped onto it.
    pub fn integrate(&mut self, terrain: &dyn TerrainQuery) {
        self.position += self.velocity;

        if terrain.is_solid(self.position) {
            for _ in 0..MAX_POP_UP_CELLS {
                self.position.y = self.position.y.floor() + 1.0;
                if !terrain.is_solid(self.position) {
                    break;
                }
            }
            self.velocity.y = self.velocity.y.max(0.0);
            self.on_ground = true;
            return;
        }

        match terrain.ground_below(self.position, 1.0) {
            Some(depth) if depth <= 0.05 && self.velocity.y <= 0.0 => {
                self.position.y -= depth;
                self.velocity.y = 0.0;
                self.on_ground = true;
            }
            _ => {
                self.on_ground = false;
            }
        }
    }
}
