//! Block palette and per-state collision shapes.
//!
//! The palette is closed: every block the core reasons about (fences for the
//! supporting-surface fallback, ladders for vertical step distance, snow
//! layers for step sounds, liquids and fire for the environment checks) is a
//! variant here. Behaviour hooks live with the world, not on the block.

use serde::{Deserialize, Serialize};

use cinder_math::{Aabb, BlockPos};

use crate::material::{Material, RenderType, SoundType};

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// A block type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Block {
    Air,
    Stone,
    Dirt,
    Grass,
    Sand,
    Planks,
    Glass,
    Fence,
    Wall,
    FenceGate,
    Ladder,
    Water,
    Lava,
    Fire,
    Cobweb,
    Portal,
    SnowLayer,
    Cactus,
    SlimeBlock,
    HayBale,
    Magma,
}

impl Block {
    pub const fn material(self) -> Material {
        match self {
            Block::Air => Material::Air,
            Block::Stone | Block::Wall | Block::Magma => Material::Rock,
            Block::Dirt => Material::Ground,
            Block::Grass | Block::HayBale => Material::Grass,
            Block::Sand => Material::Sand,
            Block::Planks | Block::Fence | Block::FenceGate => Material::Wood,
            Block::Glass => Material::Glass,
            Block::Ladder => Material::Circuits,
            Block::Water => Material::Water,
            Block::Lava => Material::Lava,
            Block::Fire => Material::Fire,
            Block::Cobweb => Material::Web,
            Block::Portal => Material::Portal,
            Block::SnowLayer => Material::Snow,
            Block::Cactus => Material::Cactus,
            Block::SlimeBlock => Material::Clay,
        }
    }

    pub const fn sound_type(self) -> SoundType {
        match self {
            Block::Dirt => SoundType::GROUND,
            Block::Grass | Block::HayBale => SoundType::PLANT,
            Block::Sand => SoundType::SAND,
            Block::Planks | Block::Fence | Block::FenceGate => SoundType::WOOD,
            Block::Glass | Block::Portal => SoundType::GLASS,
            Block::Ladder => SoundType::LADDER,
            Block::Fire | Block::Cactus => SoundType::CLOTH,
            Block::SnowLayer => SoundType::SNOW,
            Block::SlimeBlock => SoundType::SLIME,
            _ => SoundType::STONE,
        }
    }

    pub const fn render_type(self) -> RenderType {
        match self {
            Block::Air => RenderType::Invisible,
            Block::Water | Block::Lava => RenderType::Liquid,
            _ => RenderType::Model,
        }
    }

    /// Fences, walls and gates: their collision box pokes half a block into
    /// the cell above, so an entity standing on one samples air at its feet.
    pub const fn is_fence_like(self) -> bool {
        matches!(self, Block::Fence | Block::Wall | Block::FenceGate)
    }

    /// Full opaque cubes suffocate entities whose eyes are inside them.
    pub const fn causes_suffocation(self) -> bool {
        matches!(
            self,
            Block::Stone
                | Block::Dirt
                | Block::Grass
                | Block::Sand
                | Block::Planks
                | Block::HayBale
                | Block::Magma
        )
    }
}

// ---------------------------------------------------------------------------
// BlockState
// ---------------------------------------------------------------------------

/// A block plus its single numeric property.
///
/// `level` is the fluid level for liquids (0 = source, 8+ = falling) and the
/// layer count (1..=8) for snow layers. Other blocks ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub block: Block,
    pub level: u8,
}

impl BlockState {
    pub const AIR: BlockState = BlockState::of(Block::Air);

    /// Default state of `block`.
    pub const fn of(block: Block) -> Self {
        let level = match block {
            Block::SnowLayer => 1,
            _ => 0,
        };
        Self { block, level }
    }

    pub const fn with_level(block: Block, level: u8) -> Self {
        Self { block, level }
    }

    pub const fn material(&self) -> Material {
        self.block.material()
    }

    pub const fn is_air(&self) -> bool {
        matches!(self.block, Block::Air)
    }

    pub const fn causes_suffocation(&self) -> bool {
        self.block.causes_suffocation()
    }

    pub const fn render_type(&self) -> RenderType {
        self.block.render_type()
    }

    /// Fraction of the cell left empty above a liquid surface.
    pub fn liquid_height_percent(&self) -> f32 {
        let level = if self.level >= 8 { 0 } else { self.level };
        f32::from(level + 1) / 9.0
    }

    /// Collision shape in cell-local coordinates, if the state blocks movement.
    pub fn local_collision_box(&self) -> Option<Aabb> {
        match self.block {
            Block::Air
            | Block::Water
            | Block::Lava
            | Block::Fire
            | Block::Cobweb
            | Block::Portal => None,
            Block::Fence => Some(Aabb::new(0.375, 0.0, 0.375, 0.625, 1.5, 0.625)),
            Block::Wall => Some(Aabb::new(0.25, 0.0, 0.25, 0.75, 1.5, 0.75)),
            Block::FenceGate => Some(Aabb::new(0.0, 0.0, 0.375, 1.0, 1.5, 0.625)),
            Block::Ladder => Some(Aabb::new(0.0, 0.0, 0.8125, 1.0, 1.0, 1.0)),
            Block::Cactus => Some(Aabb::new(0.0625, 0.0, 0.0625, 0.9375, 0.9375, 0.9375)),
            Block::SnowLayer => {
                let layers = self.level.clamp(1, 8);
                if layers == 1 {
                    None
                } else {
                    Some(Aabb::new(0.0, 0.0, 0.0, 1.0, f64::from(layers - 1) * 0.125, 1.0))
                }
            }
            _ => Some(Aabb::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)),
        }
    }

    /// Collision shape placed at `pos` in world coordinates.
    pub fn collision_box_at(&self, pos: BlockPos) -> Option<Aabb> {
        self.local_collision_box()
            .map(|local| local.offset_vec(pos.as_dvec3()))
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::AIR
    }
}

impl From<Block> for BlockState {
    fn from(block: Block) -> Self {
        Self::of(block)
    }
}
