//! World-terrain query facade
//!
//! The locomotion core only ever asks the world a handful of read-only
//! questions: is this cell solid, is it fluid, can I see from A to B, how
//! slippery is the ground, how far down is it. Hosts answer them through the
//! [`TerrainQuery`] trait; the crate ships a voxel implementation for tests
//! and demos and an adapter over a rapier3d collider scene.

mod collider;
mod query;
mod voxel;

pub use collider::ColliderTerrain;
pub use query::TerrainQuery;
pub use voxel::VoxelTerrain;
