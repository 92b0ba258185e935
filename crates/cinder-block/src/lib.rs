//! Block palette, materials, and collision shapes consumed by the entity core.

mod block;
mod material;

pub use block::{Block, BlockState};
pub use material::{Material, RenderType, SoundType};
