//! Double-precision bounding volumes, block coordinates, and small numeric helpers for Cinder.

mod aabb;
mod block_pos;
mod helpers;

pub use aabb::Aabb;
pub use block_pos::{Axis, BlockPos};
pub use helpers::{DEG_TO_RAD, abs_max, floor};

pub use glam::DVec3;
