//! A sparse in-memory block grid implementing [`World`].
//!
//! Unset cells are air. Sounds and particles are recorded instead of played,
//! which makes the grid usable both as a headless simulation backdrop and as
//! a test fixture.

use rustc_hash::{FxHashMap, FxHashSet};

use cinder_block::{Block, BlockState};
use cinder_math::{Aabb, BlockPos, DVec3};

use crate::entity::Entity;
use crate::error::BlockCallbackError;
use crate::hooks::{DamageSource, EntityHooks};
use crate::world::{Particle, SoundEvent, World};

/// Fall damage scale when landing on a hay bale.
const HAY_FALL_MULTIPLIER: f32 = 0.2;

/// A sound the grid was asked to play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayedSound {
    pub at: DVec3,
    pub sound: SoundEvent,
    pub volume: f32,
    pub pitch: f32,
}

/// A particle the grid was asked to spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnedParticle {
    pub particle: Particle,
    pub at: DVec3,
    pub velocity: DVec3,
}

/// Sparse block storage keyed by cell position.
#[derive(Clone, Debug, Default)]
pub struct GridWorld {
    blocks: FxHashMap<BlockPos, BlockState>,
    time: i64,
    remote: bool,
    raining: bool,
    /// Cells whose collision hook fails.
    faulty: FxHashSet<BlockPos>,
    sounds: Vec<PlayedSound>,
    particles: Vec<SpawnedParticle>,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `state` at `pos`; air removes the cell.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        if state.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, state);
        }
    }

    /// Fill the inclusive cuboid between `min` and `max`.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, state: BlockState) {
        for pos in BlockPos::iter_span(min, max) {
            self.set_block(pos, state);
        }
    }

    /// Number of non-air cells.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn set_time(&mut self, time: i64) {
        self.time = time;
    }

    pub fn advance_tick(&mut self) {
        self.time += 1;
    }

    pub fn set_remote(&mut self, remote: bool) {
        self.remote = remote;
    }

    pub fn set_raining(&mut self, raining: bool) {
        self.raining = raining;
    }

    /// Make the collision hook of the cell at `pos` fail.
    pub fn mark_faulty(&mut self, pos: BlockPos) {
        self.faulty.insert(pos);
    }

    pub fn sounds(&self) -> &[PlayedSound] {
        &self.sounds
    }

    pub fn particles(&self) -> &[SpawnedParticle] {
        &self.particles
    }

    /// Forget recorded sounds and particles.
    pub fn clear_effects(&mut self) {
        self.sounds.clear();
        self.particles.clear();
    }

    fn sky_visible(&self, pos: BlockPos) -> bool {
        !self
            .blocks
            .keys()
            .any(|p| p.x == pos.x && p.z == pos.z && p.y > pos.y)
    }
}

impl World for GridWorld {
    fn collision_boxes(&self, region: &Aabb) -> Vec<Aabb> {
        let (min, max) = region.block_span();
        // One cell of margin catches shapes taller than their cell, like fences.
        BlockPos::iter_span(min.offset(-1, -1, -1), max.offset(1, 1, 1))
            .filter_map(|pos| self.block_state(pos).collision_box_at(pos))
            .filter(|bb| bb.intersects(region))
            .collect()
    }

    fn block_state(&self, pos: BlockPos) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or_default()
    }

    fn total_world_time(&self) -> i64 {
        self.time
    }

    fn is_remote(&self) -> bool {
        self.remote
    }

    fn is_raining_at(&self, pos: BlockPos) -> bool {
        self.raining && self.sky_visible(pos)
    }

    fn play_sound(&mut self, at: DVec3, sound: SoundEvent, volume: f32, pitch: f32) {
        self.sounds.push(PlayedSound {
            at,
            sound,
            volume,
            pitch,
        });
    }

    fn spawn_particle(&mut self, particle: Particle, at: DVec3, velocity: DVec3) {
        self.particles.push(SpawnedParticle {
            particle,
            at,
            velocity,
        });
    }

    fn on_entity_collision<H: EntityHooks>(
        &mut self,
        pos: BlockPos,
        state: BlockState,
        entity: &mut Entity<H>,
    ) -> Result<(), BlockCallbackError> {
        if self.faulty.contains(&pos) {
            return Err(BlockCallbackError::new(format!(
                "{:?} at {pos} refused the entity",
                state.block
            )));
        }

        match state.block {
            Block::Cobweb => entity.set_in_web(),
            Block::Portal if !entity.is_riding() && !entity.is_being_ridden() => {
                entity.set_portal(pos);
            }
            Block::Cactus => {
                entity.hooks.attack(DamageSource::Cactus, 1.0);
            }
            _ => {}
        }
        Ok(())
    }

    fn on_landed<H: EntityHooks>(&mut self, state: BlockState, entity: &mut Entity<H>) {
        if state.block != Block::SlimeBlock || entity.sneaking {
            entity.motion.y = 0.0;
        } else if entity.motion.y < 0.0 {
            entity.motion.y = -entity.motion.y;
            if !entity.capabilities().living {
                entity.motion.y *= 0.8;
            }
        }
    }

    fn on_fallen_upon<H: EntityHooks>(
        &mut self,
        _pos: BlockPos,
        state: BlockState,
        entity: &mut Entity<H>,
        distance: f32,
    ) {
        let multiplier = match state.block {
            Block::SlimeBlock if !entity.sneaking => 0.0,
            Block::HayBale => HAY_FALL_MULTIPLIER,
            _ => 1.0,
        };
        entity.fall(distance, multiplier);
    }

    fn on_entity_walk<H: EntityHooks>(
        &mut self,
        _pos: BlockPos,
        state: BlockState,
        entity: &mut Entity<H>,
    ) {
        match state.block {
            Block::Magma => {
                let caps = *entity.capabilities();
                if caps.living && !caps.fire_immune && !entity.sneaking {
                    entity.hooks.attack(DamageSource::HotFloor, 1.0);
                }
            }
            Block::SlimeBlock if entity.motion.y.abs() < 0.1 && !entity.sneaking => {
                let damping = 0.4 + entity.motion.y.abs() * 0.2;
                entity.motion.x *= damping;
                entity.motion.z *= damping;
            }
            _ => {}
        }
    }
}
