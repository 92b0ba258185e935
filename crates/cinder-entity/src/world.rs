//! The world collaborator: block queries, effects, and block behaviour hooks.
//!
//! Queries are reads the core treats as pure for the duration of one entity
//! update. Effects (sounds, particles) are fire-and-forget. Block hooks get
//! mutable access to the entity being moved, mirroring how blocks react to
//! entities touching them.

use cinder_block::{BlockState, Material, SoundType};
use cinder_math::{Aabb, BlockPos, DVec3};

use crate::entity::Entity;
use crate::error::BlockCallbackError;
use crate::hooks::EntityHooks;

/// Sound emitted by an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SoundEvent {
    Step(SoundType),
    Swim,
    Splash,
    ExtinguishFire,
}

/// Particle spawned by an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Particle {
    WaterBubble,
    WaterSplash,
    /// Dust kicked up by sprinting over a block.
    BlockCrack(BlockState),
}

/// Everything the kinematics core needs from the surrounding world.
pub trait World {
    /// Solid collision boxes that strictly intersect `region`.
    fn collision_boxes(&self, region: &Aabb) -> Vec<Aabb>;

    fn block_state(&self, pos: BlockPos) -> BlockState;

    /// Monotonic world tick counter.
    fn total_world_time(&self) -> i64;

    /// Remote worlds mirror an authoritative simulation and skip
    /// damage, portal travel and fire bookkeeping.
    fn is_remote(&self) -> bool {
        false
    }

    fn is_area_loaded(&self, _min: BlockPos, _max: BlockPos) -> bool {
        true
    }

    fn is_raining_at(&self, _pos: BlockPos) -> bool {
        false
    }

    /// Whether any cell touched by `bb` has `material`.
    fn material_in_bb(&self, bb: &Aabb, material: Material) -> bool {
        let (min, max) = bb.block_span();
        BlockPos::iter_span(min, max).any(|pos| self.block_state(pos).material() == material)
    }

    /// Whether `bb` reaches below the surface of a `material` liquid.
    ///
    /// Unlike [`World::material_in_bb`] this honours the liquid level, so a
    /// shallow flowing cell only counts once the box dips under its surface.
    fn material_present_in(&self, bb: &Aabb, material: Material) -> bool {
        let (min, max) = bb.block_span();
        if !self.is_area_loaded(min, max) {
            return false;
        }
        let top = bb.max.y.ceil();
        BlockPos::iter_span(min, max).any(|pos| {
            let state = self.block_state(pos);
            if state.material() != material {
                return false;
            }
            let surface = f64::from(pos.y + 1) - f64::from(state.liquid_height_percent());
            top >= surface
        })
    }

    fn contains_any_liquid(&self, bb: &Aabb) -> bool {
        let (min, max) = bb.block_span();
        BlockPos::iter_span(min, max).any(|pos| self.block_state(pos).material().is_liquid())
    }

    /// Whether `bb` touches fire or lava.
    fn is_flammable_within(&self, bb: &Aabb) -> bool {
        let (min, max) = bb.block_span();
        if !self.is_area_loaded(min, max) {
            return false;
        }
        BlockPos::iter_span(min, max).any(|pos| self.block_state(pos).material().is_fire_source())
    }

    fn play_sound(&mut self, _at: DVec3, _sound: SoundEvent, _volume: f32, _pitch: f32) {}

    fn spawn_particle(&mut self, _particle: Particle, _at: DVec3, _velocity: DVec3) {}

    /// An entity's box overlaps the cell at `pos` after a move.
    fn on_entity_collision<H: EntityHooks>(
        &mut self,
        _pos: BlockPos,
        _state: BlockState,
        _entity: &mut Entity<H>,
    ) -> Result<(), BlockCallbackError> {
        Ok(())
    }

    /// Vertical motion of an entity was stopped by the supporting block.
    fn on_landed<H: EntityHooks>(&mut self, _state: BlockState, entity: &mut Entity<H>) {
        entity.motion.y = 0.0;
    }

    /// An entity that had been falling touched down on the block at `pos`.
    fn on_fallen_upon<H: EntityHooks>(
        &mut self,
        _pos: BlockPos,
        _state: BlockState,
        entity: &mut Entity<H>,
        distance: f32,
    ) {
        entity.fall(distance, 1.0);
    }

    /// A grounded entity walked over the block at `pos`.
    fn on_entity_walk<H: EntityHooks>(
        &mut self,
        _pos: BlockPos,
        _state: BlockState,
        _entity: &mut Entity<H>,
    ) {
    }
}
