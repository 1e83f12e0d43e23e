//! The terrain query trait

use glam::Vec3;

/// Read-only world queries consumed by the locomotion core.
///
/// Implementations must be cheap and synchronous; every method may be called
/// several times per simulation tick. The core never writes to the world.
pub trait TerrainQuery {
    /// Whether the cell containing `point` is solid.
    fn is_solid(&self, point: Vec3) -> bool;

    /// Whether the cell containing `point` holds fluid (water, lava, ...).
    fn fluid_at(&self, point: Vec3) -> bool;

    /// Straight-line visibility between two points, false when a solid cell
    /// blocks the segment.
    fn visible(&self, from: Vec3, to: Vec3) -> bool;

    /// Ground friction factor at `point`. 1.0 is normal ground; lower is
    /// more slippery. Queried under the creature while hovering close to
    /// the ground.
    fn friction_at(&self, point: Vec3) -> f32;

    /// Whether `height` units of space starting at the cell containing
    /// `point` are clear of solids.
    fn has_clearance(&self, point: Vec3, height: f32) -> bool {
        let steps = height.ceil() as i32;
        (0..steps).all(|i| !self.is_solid(point + Vec3::Y * i as f32))
    }

    /// Distance from `point` straight down to the first solid surface, or
    /// `None` when nothing solid lies within `max_depth`.
    fn ground_below(&self, point: Vec3, max_depth: f32) -> Option<f32> {
        let steps = max_depth.floor() as i32;
        for i in 0..=steps {
            let probe = point - Vec3::Y * i as f32;
            if self.is_solid(probe) {
                // Top face of the solid cell
                let surface = probe.y.floor() + 1.0;
                return Some((point.y - surface).max(0.0));
            }
        }
        None
    }
}
