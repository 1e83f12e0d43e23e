//! Terrain queries over a rapier3d collider scene
//!
//! Hosts that already maintain a collision scene can expose it to the
//! locomotion core through this adapter instead of reimplementing the
//! voxel queries. Solid geometry is regular colliders; fluid volumes are
//! sensor colliders.

use glam::Vec3;
use nalgebra::Point3;
use rapier3d::parry::query::{PointQuery, RayCast};
use rapier3d::prelude::*;

use super::TerrainQuery;

/// Convert a glam vector to a nalgebra point.
fn to_point(v: Vec3) -> Point3<f32> {
    Point3::new(v.x, v.y, v.z)
}

/// A static collider scene answering terrain queries.
pub struct ColliderTerrain {
    /// All scene colliders; sensors are fluid volumes
    colliders: ColliderSet,
    /// Friction reported where no collider contains the probe point
    default_friction: f32,
}

impl ColliderTerrain {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self {
            colliders: ColliderSet::new(),
            default_friction: 1.0,
        }
    }

    /// Add a solid axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, friction: f32) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .friction(friction)
            .build();
        self.colliders.insert(collider)
    }

    /// Add a wide, thin slab usable as ground.
    pub fn add_ground_plane(&mut self, y: f32, half_size: f32) -> ColliderHandle {
        self.add_box(
            Vec3::new(0.0, y - 0.5, 0.0),
            Vec3::new(half_size, 0.5, half_size),
            1.0,
        )
    }

    /// Add a fluid volume (a sensor box; it never blocks movement or rays).
    pub fn add_fluid_box(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .sensor(true)
            .build();
        self.colliders.insert(collider)
    }

    /// Remove a collider from the scene.
    pub fn remove(&mut self, handle: ColliderHandle) {
        // Parentless colliders: the body sets are empty placeholders.
        let mut bodies = RigidBodySet::new();
        let mut islands = IslandManager::new();
        self.colliders.remove(handle, &mut islands, &mut bodies, false);
    }

    /// Set the friction reported outside any collider.
    pub fn set_default_friction(&mut self, friction: f32) {
        self.default_friction = friction;
    }

    /// The collider containing `point`, preferring solids over sensors.
    fn containing(&self, point: Vec3, sensors: bool) -> Option<&Collider> {
        let p = to_point(point);
        self.colliders
            .iter()
            .map(|(_, collider)| collider)
            .filter(|collider| collider.is_sensor() == sensors)
            .find(|collider| collider.shape().contains_point(collider.position(), &p))
    }
}

impl Default for ColliderTerrain {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainQuery for ColliderTerrain {
    fn is_solid(&self, point: Vec3) -> bool {
        self.containing(point, false).is_some()
    }

    fn fluid_at(&self, point: Vec3) -> bool {
        self.containing(point, true).is_some()
    }

    fn visible(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length < 1.0e-4 {
            return true;
        }

        let direction = delta / length;
        let ray = Ray::new(to_point(from), vector![direction.x, direction.y, direction.z]);
        !self
            .colliders
            .iter()
            .filter(|(_, collider)| !collider.is_sensor())
            .any(|(_, collider)| {
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, length, true)
                    .is_some()
            })
    }

    fn friction_at(&self, point: Vec3) -> f32 {
        self.containing(point, false)
            .map_or(self.default_friction, |collider| collider.friction())
    }

    fn ground_below(&self, point: Vec3, max_depth: f32) -> Option<f32> {
        let ray = Ray::new(to_point(point), vector![0.0, -1.0, 0.0]);
        self.colliders
            .iter()
            .filter(|(_, collider)| !collider.is_sensor())
            .filter_map(|(_, collider)| {
                collider
                    .shape()
                    .cast_ray(collider.position(), &ray, max_depth, true)
            })
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform_scene() -> ColliderTerrain {
        let mut terrain = ColliderTerrain::new();
        // 8x8 platform with its top face at y = 10
        terrain.add_box(
            Vec3::new(0.0, 9.5, 0.0),
            Vec3::new(4.0, 0.5, 4.0),
            0.8,
        );
        terrain
    }

    #[test]
    fn test_solid_inside_platform() {
        let terrain = platform_scene();

        assert!(terrain.is_solid(Vec3::new(0.0, 9.7, 0.0)));
        assert!(!terrain.is_solid(Vec3::new(0.0, 10.5, 0.0)));
        assert!(!terrain.is_solid(Vec3::new(6.0, 9.7, 0.0)));
    }

    #[test]
    fn test_ground_below_hits_platform() {
        let terrain = platform_scene();

        let distance = terrain
            .ground_below(Vec3::new(1.0, 16.0, 1.0), 32.0)
            .expect("platform below");
        assert!((distance - 6.0).abs() < 0.01);

        assert!(terrain.ground_below(Vec3::new(12.0, 16.0, 0.0), 32.0).is_none());
    }

    #[test]
    fn test_visibility_blocked_by_platform() {
        let terrain = platform_scene();

        let above = Vec3::new(0.0, 12.0, 0.0);
        let below = Vec3::new(0.0, 6.0, 0.0);
        assert!(!terrain.visible(above, below));

        let side = Vec3::new(6.0, 12.0, 0.0);
        assert!(terrain.visible(above, side));
    }

    #[test]
    fn test_fluid_is_sensor_only() {
        let mut terrain = platform_scene();
        terrain.add_fluid_box(Vec3::new(0.0, 11.0, 0.0), Vec3::new(2.0, 1.0, 2.0));

        let in_water = Vec3::new(0.0, 11.0, 0.0);
        assert!(terrain.fluid_at(in_water));
        assert!(!terrain.is_solid(in_water));

        // Fluid never blocks sight
        assert!(terrain.visible(Vec3::new(-3.0, 11.0, 0.0), Vec3::new(3.0, 11.0, 0.0)));
    }

    #[test]
    fn test_friction_from_collider() {
        let terrain = platform_scene();

        assert!((terrain.friction_at(Vec3::new(0.0, 9.7, 0.0)) - 0.8).abs() < 0.01);
        assert!((terrain.friction_at(Vec3::new(0.0, 20.0, 0.0)) - 1.0).abs() < 0.01);
    }
}
