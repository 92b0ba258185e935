//! The per-tick move: piston clamp, web damping, sneak creep, collision
//! resolution, and the side effects that depend on the achieved motion.

use cinder_block::{Block, BlockState};
use cinder_math::{BlockPos, DVec3, floor};
use tracing::{error, warn};

use crate::collision::{resolve_axes, should_step_up, step_up};
use crate::entity::Entity;
use crate::error::{CrashCategory, CrashReport, SimulationFault};
use crate::hooks::{EntityHooks, EntityKind};
use crate::sneak::creep_toward_edge;
use crate::world::{SoundEvent, World};

/// Depth below the feet sampled for the supporting block.
const SUPPORT_PROBE_DEPTH: f64 = 0.20000000298023224;
/// Inset of the box used to find overlapped cells after a move.
const BLOCK_COLLISION_INSET: f64 = 0.001;
const WEB_DAMPING: DVec3 = DVec3::new(0.25, 0.05000000074505806, 0.25);
const STEP_VOLUME_SCALE: f32 = 0.15;

/// What is driving a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoverType {
    /// The entity's own velocity.
    SelfDriven,
    /// Direct player input.
    Player,
    /// A moving piston head; subject to the per-tick push limit.
    Piston,
}

impl<H: EntityHooks> Entity<H> {
    /// Advance the entity by `delta`, resolving collisions with the world.
    ///
    /// Non-finite components are treated as zero. The only error is a
    /// failing block collision hook, which aborts the rest of the update.
    pub fn move_entity<W: World>(
        &mut self,
        world: &mut W,
        mover: MoverType,
        delta: DVec3,
    ) -> Result<(), SimulationFault> {
        let mut delta = self.sanitize_delta(delta);

        if self.no_clip {
            self.bb = self.bb.offset_vec(delta);
            self.reset_position_to_bb();
            return Ok(());
        }

        if mover == MoverType::Piston {
            let limit = self.config.piston_push_limit;
            let epsilon = self.config.piston_epsilon;
            match self
                .piston
                .clamp(world.total_world_time(), delta, limit, epsilon)
            {
                Some(clamped) => delta = clamped,
                None => return Ok(()),
            }
        }

        let start_pos = self.pos;

        if self.in_web {
            self.in_web = false;
            delta *= WEB_DAMPING;
            self.motion = DVec3::ZERO;
        }

        let self_propelled = matches!(mover, MoverType::SelfDriven | MoverType::Player);
        if self_propelled && self.on_ground && self.sneaking && self.caps.sneak_creep {
            delta = creep_toward_edge(
                &*world,
                &self.bb,
                delta,
                f64::from(self.step_height),
                self.config.sneak_creep_step,
            );
        }

        let requested = delta;
        let start_bb = self.bb;
        let obstacles = world.collision_boxes(&start_bb.expand(delta.x, delta.y, delta.z));
        let mut resolved = resolve_axes(&obstacles, start_bb, requested);

        let step_height = f64::from(self.step_height);
        if should_step_up(step_height, self.on_ground, requested, resolved.delta) {
            resolved = step_up(&*world, start_bb, requested, resolved, step_height);
        }

        self.bb = resolved.bb;
        self.reset_position_to_bb();

        let achieved = resolved.delta;
        self.collided_horizontally = requested.x != achieved.x || requested.z != achieved.z;
        self.collided_vertically = requested.y != achieved.y;
        self.on_ground = self.collided_vertically && requested.y < 0.0;
        self.collided = self.collided_horizontally || self.collided_vertically;

        let (support_pos, support) = self.supporting_block(&*world);
        self.update_fall_state(world, achieved.y, support_pos, support);

        if requested.x != achieved.x {
            self.motion.x = 0.0;
        }
        if requested.z != achieved.z {
            self.motion.z = 0.0;
        }
        if requested.y != achieved.y {
            world.on_landed(support, self);
        }

        if self.can_trigger_walking() {
            self.advance_walk(world, start_pos, support_pos, support);
        }

        if let Err(inner) = self.do_block_collisions(world) {
            let mut report = CrashReport::caused_by("Checking entity block collision", inner);
            self.describe(report.make_category("Entity being checked for collision"));
            error!(entity = %self.id(), cause = report.cause(), "block collision callback failed");
            return Err(SimulationFault::BlockCollision(Box::new(report)));
        }

        self.update_fire_contact(world);
        Ok(())
    }

    fn sanitize_delta(&self, delta: DVec3) -> DVec3 {
        if delta.is_finite() {
            return delta;
        }
        warn!(entity = %self.id(), ?delta, "non-finite move delta, zeroing bad axes");
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        DVec3::new(finite(delta.x), finite(delta.y), finite(delta.z))
    }

    /// Block under the feet, or the fence below when the feet sample air.
    pub fn supporting_block<W: World + ?Sized>(&self, world: &W) -> (BlockPos, BlockState) {
        let pos = BlockPos::new(
            floor(self.pos.x),
            floor(self.pos.y - SUPPORT_PROBE_DEPTH),
            floor(self.pos.z),
        );
        let state = world.block_state(pos);
        if state.is_air() {
            let below = pos.down();
            let under = world.block_state(below);
            if under.block.is_fence_like() {
                return (below, under);
            }
        }
        (pos, state)
    }

    fn update_fall_state<W: World>(
        &mut self,
        world: &mut W,
        dy: f64,
        support_pos: BlockPos,
        support: BlockState,
    ) {
        if self.on_ground {
            if self.fall_distance > 0.0 {
                let distance = self.fall_distance;
                world.on_fallen_upon(support_pos, support, self, distance);
            }
            self.fall_distance = 0.0;
        } else if dy < 0.0 {
            self.fall_distance = (f64::from(self.fall_distance) - dy) as f32;
        }
    }

    fn can_trigger_walking(&self) -> bool {
        let quiet_sneak = self.on_ground && self.sneaking && self.kind() == EntityKind::Player;
        self.caps.triggers_walking && !quiet_sneak && !self.is_riding()
    }

    fn advance_walk<W: World>(
        &mut self,
        world: &mut W,
        start_pos: DVec3,
        support_pos: BlockPos,
        support: BlockState,
    ) {
        let mut moved = self.pos - start_pos;
        if support.block != Block::Ladder {
            moved.y = 0.0;
        }

        if self.on_ground {
            world.on_entity_walk(support_pos, support, self);
        }

        let horizontal = (moved.x * moved.x + moved.z * moved.z).sqrt();
        self.distance_walked = (f64::from(self.distance_walked) + horizontal * 0.6) as f32;
        self.distance_walked_on_step =
            (f64::from(self.distance_walked_on_step) + moved.length() * 0.6) as f32;

        if self.distance_walked_on_step > self.next_step_distance as f32 && !support.is_air() {
            self.next_step_distance = self.distance_walked_on_step as i32 + 1;
            if self.in_water {
                self.play_swim_sound(world);
            } else {
                self.play_step_sound(world, support_pos, support);
            }
        } else if self.distance_walked_on_step > self.next_flap
            && self.caps.makes_fly_sound
            && support.is_air()
        {
            self.next_flap = self.hooks.play_fly_sound(self.distance_walked_on_step);
        }
    }

    fn play_swim_sound<W: World>(&mut self, world: &mut W) {
        let (motion, factor) = match self.controlling_passenger_motion {
            Some(motion) if self.is_being_ridden() => (motion, 0.4),
            _ => (self.motion, 0.35),
        };
        let speed = (motion.x * motion.x * 0.2 + motion.y * motion.y + motion.z * motion.z * 0.2)
            .sqrt() as f32;
        let volume = (speed * factor).min(1.0);
        let pitch = 1.0 + self.pitch_jitter();
        self.play_sound(world, SoundEvent::Swim, volume, pitch);
    }

    fn play_step_sound<W: World>(&mut self, world: &mut W, pos: BlockPos, state: BlockState) {
        let sound = if world.block_state(pos.up()).block == Block::SnowLayer {
            Block::SnowLayer.sound_type()
        } else if state.material().is_liquid() {
            return;
        } else {
            state.block.sound_type()
        };
        self.play_sound(
            world,
            SoundEvent::Step(sound),
            sound.volume * STEP_VOLUME_SCALE,
            sound.pitch,
        );
    }

    fn do_block_collisions<W: World>(&mut self, world: &mut W) -> Result<(), CrashReport> {
        let inset = DVec3::splat(BLOCK_COLLISION_INSET);
        let min = BlockPos::floored(self.bb.min + inset);
        let max = BlockPos::floored(self.bb.max - inset);
        if !world.is_area_loaded(min, max) {
            return Ok(());
        }

        for pos in BlockPos::iter_span(min, max) {
            let state = world.block_state(pos);
            if let Err(err) = world.on_entity_collision(pos, state, self) {
                let mut report = CrashReport::new("Colliding entity with block", err);
                report
                    .make_category("Block being collided with")
                    .add_detail("Block location", pos)
                    .add_detail("Block state", format!("{state:?}"));
                return Err(report);
            }
            self.hooks.on_inside_block(&state);
        }
        Ok(())
    }

    fn update_fire_contact<W: World>(&mut self, world: &mut W) {
        let wet = self.is_wet(&*world);
        let immune_baseline = -self.caps.fire_immune_ticks;

        if world.is_flammable_within(&self.bb.shrink(BLOCK_COLLISION_INSET)) {
            self.deal_fire_damage(1.0);
            if !wet {
                self.fire += 1;
                if self.fire == 0 {
                    self.set_fire(8);
                }
            }
        } else if self.fire <= 0 {
            self.fire = immune_baseline;
        }

        if wet && self.is_burning(&*world) {
            let pitch = 1.6 + self.pitch_jitter();
            self.play_sound(world, SoundEvent::ExtinguishFire, 0.7, pitch);
            self.fire = immune_baseline;
        }
    }

    /// Fill a crash report section with this entity's identity and state.
    pub fn describe(&self, category: &mut CrashCategory) {
        category
            .add_detail("Entity ID", self.id())
            .add_detail("Entity kind", format!("{:?}", self.kind()))
            .add_detail(
                "Entity's exact location",
                format!("{:.2}, {:.2}, {:.2}", self.pos.x, self.pos.y, self.pos.z),
            )
            .add_detail("Entity's block location", BlockPos::floored(self.pos))
            .add_detail(
                "Entity's momentum",
                format!("{:.2}, {:.2}, {:.2}", self.motion.x, self.motion.y, self.motion.z),
            )
            .add_detail("Entity's bounding box", format!("{:?}", self.bb))
            .add_detail("Entity's rider", format!("{:?}", self.passengers()))
            .add_detail("Entity's vehicle", format!("{:?}", self.vehicle()));
    }
}

#[cfg(test)]
#[path = "motion_tests.rs"]
mod tests;
