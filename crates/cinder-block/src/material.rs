//! Block materials, step sound profiles, and render classification.

use serde::{Deserialize, Serialize};

/// Physical material of a block, queried by the environment checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Air,
    Rock,
    Ground,
    Grass,
    Sand,
    Wood,
    Glass,
    Clay,
    Snow,
    Cactus,
    Circuits,
    Web,
    Portal,
    Fire,
    Water,
    Lava,
}

impl Material {
    /// Water and lava.
    pub const fn is_liquid(self) -> bool {
        matches!(self, Material::Water | Material::Lava)
    }

    /// Materials whose cells ignite entities standing in them.
    pub const fn is_fire_source(self) -> bool {
        matches!(self, Material::Fire | Material::Lava)
    }
}

/// Step/landing sound profile of a block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundType {
    /// Sound event played when an entity steps on the block.
    pub step: &'static str,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundType {
    pub const STONE: SoundType = SoundType::new("block.stone.step", 1.0, 1.0);
    pub const WOOD: SoundType = SoundType::new("block.wood.step", 1.0, 1.0);
    pub const GROUND: SoundType = SoundType::new("block.gravel.step", 1.0, 1.0);
    pub const PLANT: SoundType = SoundType::new("block.grass.step", 1.0, 1.0);
    pub const SAND: SoundType = SoundType::new("block.sand.step", 1.0, 1.0);
    pub const GLASS: SoundType = SoundType::new("block.glass.step", 1.0, 1.0);
    pub const CLOTH: SoundType = SoundType::new("block.cloth.step", 1.0, 1.0);
    pub const SNOW: SoundType = SoundType::new("block.snow.step", 1.0, 1.0);
    pub const LADDER: SoundType = SoundType::new("block.ladder.step", 1.0, 1.0);
    pub const SLIME: SoundType = SoundType::new("block.slime.step", 1.0, 1.0);

    pub const fn new(step: &'static str, volume: f32, pitch: f32) -> Self {
        Self {
            step,
            volume,
            pitch,
        }
    }
}

/// How a block is drawn. Only `Invisible` matters to the core: such blocks
/// never produce running particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderType {
    Invisible,
    Liquid,
    Model,
}
