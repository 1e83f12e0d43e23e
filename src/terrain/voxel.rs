//! Bounded voxel terrain for tests and demos
//!
//! A dense solid grid with sparse fluid and friction overrides. Cells
//! outside the bounds are empty air, which makes "no valid landing spot"
//! scenarios easy to stage.

use glam::{IVec3, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};

use super::TerrainQuery;

/// Sampling step for segment visibility tests, in world units.
const VISIBILITY_STEP: f32 = 0.25;

/// An axis-aligned voxel world anchored at the origin.
#[derive(Debug, Clone)]
pub struct VoxelTerrain {
    /// Extent in cells along x, y, z
    size: IVec3,
    /// Dense solid flags, indexed (y * depth + z) * width + x
    solid: Vec<bool>,
    /// Cells flagged as fluid
    fluid: FxHashSet<IVec3>,
    /// Per-cell friction overrides
    friction: FxHashMap<IVec3, f32>,
    /// Friction for cells without an override
    default_friction: f32,
}

impl VoxelTerrain {
    /// Create an all-air world of the given extent.
    #[must_use]
    pub fn new(width: i32, height: i32, depth: i32) -> Self {
        let cells = (width.max(0) * height.max(0) * depth.max(0)) as usize;
        Self {
            size: IVec3::new(width, height, depth),
            solid: vec![false; cells],
            fluid: FxHashSet::default(),
            friction: FxHashMap::default(),
            default_friction: 1.0,
        }
    }

    /// Create a world with a solid floor filling `y <= floor_y`.
    #[must_use]
    pub fn with_floor(width: i32, height: i32, depth: i32, floor_y: i32) -> Self {
        let mut terrain = Self::new(width, height, depth);
        terrain.fill_box(
            IVec3::new(0, 0, 0),
            IVec3::new(width - 1, floor_y, depth - 1),
            true,
        );
        terrain
    }

    /// World extent in cells.
    #[must_use]
    pub const fn size(&self) -> IVec3 {
        self.size
    }

    /// The cell containing a world-space point.
    #[must_use]
    pub fn cell_of(&self, point: Vec3) -> IVec3 {
        IVec3::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// World-space center of a cell's top face, where a creature stands.
    #[must_use]
    pub fn surface_center(&self, cell: IVec3) -> Vec3 {
        Vec3::new(
            cell.x as f32 + 0.5,
            cell.y as f32 + 1.0,
            cell.z as f32 + 0.5,
        )
    }

    fn in_bounds(&self, cell: IVec3) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.z >= 0
            && cell.x < self.size.x
            && cell.y < self.size.y
            && cell.z < self.size.z
    }

    fn index(&self, cell: IVec3) -> usize {
        ((cell.y * self.size.z + cell.z) * self.size.x + cell.x) as usize
    }

    /// Set a single cell solid or empty. Out-of-bounds writes are ignored.
    pub fn set_solid(&mut self, cell: IVec3, solid: bool) {
        if self.in_bounds(cell) {
            let index = self.index(cell);
            self.solid[index] = solid;
        }
    }

    /// Fill an inclusive box of cells.
    pub fn fill_box(&mut self, min: IVec3, max: IVec3, solid: bool) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set_solid(IVec3::new(x, y, z), solid);
                }
            }
        }
    }

    /// Flag a cell as fluid (or clear the flag).
    pub fn set_fluid(&mut self, cell: IVec3, fluid: bool) {
        if fluid {
            self.fluid.insert(cell);
        } else {
            self.fluid.remove(&cell);
        }
    }

    /// Override the friction of a single cell.
    pub fn set_friction(&mut self, cell: IVec3, friction: f32) {
        self.friction.insert(cell, friction);
    }

    /// Set the friction used by cells without an override.
    pub fn set_default_friction(&mut self, friction: f32) {
        self.default_friction = friction;
    }

    fn solid_cell(&self, cell: IVec3) -> bool {
        self.in_bounds(cell) && self.solid[self.index(cell)]
    }
}

impl TerrainQuery for VoxelTerrain {
    fn is_solid(&self, point: Vec3) -> bool {
        self.solid_cell(self.cell_of(point))
    }

    fn fluid_at(&self, point: Vec3) -> bool {
        self.fluid.contains(&self.cell_of(point))
    }

    fn visible(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let length = delta.length();
        if length < VISIBILITY_STEP {
            return !self.is_solid(to);
        }

        let step = delta / length * VISIBILITY_STEP;
        let count = (length / VISIBILITY_STEP) as i32;
        let mut probe = from;
        for _ in 0..=count {
            if self.is_solid(probe) {
                return false;
            }
            probe += step;
        }
        !self.is_solid(to)
    }

    fn friction_at(&self, point: Vec3) -> f32 {
        self.friction
            .get(&self.cell_of(point))
            .copied()
            .unwrap_or(self.default_friction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_is_solid() {
        let terrain = VoxelTerrain::with_floor(16, 16, 16, 3);

        assert!(terrain.is_solid(Vec3::new(8.0, 3.5, 8.0)));
        assert!(!terrain.is_solid(Vec3::new(8.0, 4.5, 8.0)));
        // Outside the bounds is air
        assert!(!terrain.is_solid(Vec3::new(-2.0, 1.0, 8.0)));
    }

    #[test]
    fn test_clearance_above_floor() {
        let mut terrain = VoxelTerrain::with_floor(16, 16, 16, 3);

        let above = Vec3::new(8.5, 4.0, 8.5);
        assert!(terrain.has_clearance(above, 4.0));

        // A ceiling two cells up kills the clearance
        terrain.set_solid(IVec3::new(8, 6, 8), true);
        assert!(!terrain.has_clearance(above, 4.0));
    }

    #[test]
    fn test_ground_below() {
        let terrain = VoxelTerrain::with_floor(16, 32, 16, 3);

        let distance = terrain
            .ground_below(Vec3::new(8.0, 14.0, 8.0), 32.0)
            .expect("floor within range");
        assert!((distance - 10.0).abs() < 0.01);

        // Nothing below when the scan is too short
        assert!(
            terrain
                .ground_below(Vec3::new(8.0, 14.0, 8.0), 5.0)
                .is_none()
        );
    }

    #[test]
    fn test_visibility_blocked_by_wall() {
        let mut terrain = VoxelTerrain::new(16, 16, 16);
        // Wall across x = 8
        terrain.fill_box(IVec3::new(8, 0, 0), IVec3::new(8, 15, 15), true);

        let a = Vec3::new(2.5, 8.5, 8.5);
        let b = Vec3::new(14.5, 8.5, 8.5);
        assert!(!terrain.visible(a, b));

        // Along the wall the line stays clear
        let c = Vec3::new(2.5, 8.5, 2.5);
        assert!(terrain.visible(a, c));
    }

    #[test]
    fn test_fluid_and_friction_overrides() {
        let mut terrain = VoxelTerrain::with_floor(8, 8, 8, 1);
        let cell = IVec3::new(4, 2, 4);

        assert!(!terrain.fluid_at(Vec3::new(4.5, 2.5, 4.5)));
        terrain.set_fluid(cell, true);
        assert!(terrain.fluid_at(Vec3::new(4.5, 2.5, 4.5)));

        assert!((terrain.friction_at(Vec3::new(4.5, 2.5, 4.5)) - 1.0).abs() < f32::EPSILON);
        terrain.set_friction(cell, 0.6);
        assert!((terrain.friction_at(Vec3::new(4.5, 2.5, 4.5)) - 0.6).abs() < f32::EPSILON);
    }
}
