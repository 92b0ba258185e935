//! The per-tick environment pass: portal timers, water, fire, lava and the
//! out-of-world check.

use cinder_block::{Material, RenderType};
use cinder_math::{BlockPos, DVec3, floor};
use tracing::debug;

use crate::entity::Entity;
use crate::hooks::{DamageSource, EntityHooks};
use crate::world::{Particle, SoundEvent, World};

/// Vertical inset of the box sampled for water contact.
const WATER_PROBE_INSET: f64 = -0.4000000059604645;
const RUNNING_PROBE_DEPTH: f64 = 0.20000000298023224;

impl<H: EntityHooks> Entity<H> {
    /// Run the environment update that precedes the entity's own movement.
    ///
    /// Riding bookkeeping (dismounting from a dead vehicle) is done by
    /// [`crate::EntityTable::tick`] before this runs.
    pub fn base_tick<W: World>(&mut self, world: &mut W) {
        self.prev_distance_walked = self.distance_walked;
        self.prev_pos = self.pos;
        self.prev_pitch = self.pitch;
        self.prev_yaw = self.yaw;
        if self.ride_cooldown > 0 {
            self.ride_cooldown -= 1;
        }

        if !world.is_remote() {
            self.tick_portal();
        }

        if self.sprinting && !self.in_water {
            self.spawn_running_particles(world);
        }

        self.handle_water_movement(world);

        if world.is_remote() {
            self.extinguish();
        } else if self.fire > 0 {
            if self.caps.fire_immune {
                self.fire -= 4;
                if self.fire < 0 {
                    self.extinguish();
                }
            } else {
                if self.fire % 20 == 0 {
                    self.hooks.attack(DamageSource::OnFire, 1.0);
                }
                self.fire -= 1;
            }
        }

        if self.is_in_lava(&*world) {
            self.set_on_fire_from_lava();
            self.fall_distance *= 0.5;
        }

        if self.pos.y < self.config.out_of_world_y {
            debug!(entity = %self.id(), y = self.pos.y, "fell out of the world");
            self.set_dead();
        }

        if !world.is_remote() {
            self.burning_flag = self.fire > 0;
        }

        self.first_update = false;
    }

    fn tick_portal(&mut self) {
        if self.in_portal {
            if self.config.allow_nether {
                if !self.is_riding() {
                    let max = self.caps.max_in_portal_time;
                    let waited = self.portal_counter;
                    self.portal_counter += 1;
                    if waited >= max {
                        self.portal_counter = max;
                        self.time_until_portal = self.caps.portal_cooldown;
                        let target = if self.dimension == -1 { 0 } else { -1 };
                        self.change_dimension(target);
                    }
                }
                self.in_portal = false;
            }
        } else {
            if self.portal_counter > 0 {
                self.portal_counter -= 4;
            }
            if self.portal_counter < 0 {
                self.portal_counter = 0;
            }
        }

        if self.time_until_portal > 0 {
            self.time_until_portal -= 1;
        }
    }

    fn change_dimension(&mut self, to: i32) {
        let from = self.dimension;
        debug!(entity = %self.id(), from, to, "changing dimension");
        self.hooks.change_dimension(from, to);
        self.dimension = to;
    }

    /// Mark the entity as standing in a portal block at `pos`.
    ///
    /// While the post-travel cooldown is running this only re-arms it, so an
    /// entity that stays in the portal does not bounce straight back.
    pub fn set_portal(&mut self, pos: BlockPos) {
        if self.time_until_portal > 0 {
            self.time_until_portal = self.caps.portal_cooldown;
            return;
        }
        if self.last_portal_pos != Some(pos) {
            self.last_portal_pos = Some(pos);
        }
        self.in_portal = true;
    }

    /// Refresh the in-water flag; entering water splashes and puts out fire.
    pub fn handle_water_movement<W: World>(&mut self, world: &mut W) -> bool {
        if self.is_riding_water_craft() {
            self.in_water = false;
            return false;
        }

        let probe = self.bb.grow(0.0, WATER_PROBE_INSET, 0.0).shrink(0.001);
        if world.material_present_in(&probe, Material::Water) {
            if !self.in_water && !self.first_update {
                self.splash(world);
            }
            self.fall_distance = 0.0;
            self.in_water = true;
            self.extinguish();
        } else {
            self.in_water = false;
        }
        self.in_water
    }

    fn splash<W: World>(&mut self, world: &mut W) {
        let (motion, factor) = match self.controlling_passenger_motion {
            Some(motion) if self.is_being_ridden() => (motion, 0.9),
            _ => (self.motion, 0.2),
        };
        let speed = (motion.x * motion.x * 0.2 + motion.y * motion.y + motion.z * motion.z * 0.2)
            .sqrt() as f32;
        let volume = (speed * factor).min(1.0);
        let pitch = 1.0 + self.pitch_jitter();
        self.play_sound(world, SoundEvent::Splash, volume, pitch);

        let surface = f64::from(floor(self.bb.min.y)) + 1.0;
        let width = f64::from(self.width());
        let count = (1.0 + self.width() * 20.0).ceil() as usize;

        for _ in 0..count {
            let dx = (f64::from(self.random_f32()) * 2.0 - 1.0) * width;
            let dz = (f64::from(self.random_f32()) * 2.0 - 1.0) * width;
            let rise = f64::from(self.random_f32()) * 0.2;
            world.spawn_particle(
                Particle::WaterBubble,
                DVec3::new(self.pos.x + dx, surface, self.pos.z + dz),
                DVec3::new(self.motion.x, self.motion.y - rise, self.motion.z),
            );
        }

        for _ in 0..count {
            let dx = (f64::from(self.random_f32()) * 2.0 - 1.0) * width;
            let dz = (f64::from(self.random_f32()) * 2.0 - 1.0) * width;
            world.spawn_particle(
                Particle::WaterSplash,
                DVec3::new(self.pos.x + dx, surface, self.pos.z + dz),
                self.motion,
            );
        }
    }

    fn spawn_running_particles<W: World>(&mut self, world: &mut W) {
        let below = BlockPos::new(
            floor(self.pos.x),
            floor(self.pos.y - RUNNING_PROBE_DEPTH),
            floor(self.pos.z),
        );
        let state = world.block_state(below);
        if state.render_type() == RenderType::Invisible {
            return;
        }

        let width = f64::from(self.width());
        let dx = (f64::from(self.random_f32()) - 0.5) * width;
        let dz = (f64::from(self.random_f32()) - 0.5) * width;
        world.spawn_particle(
            Particle::BlockCrack(state),
            DVec3::new(self.pos.x + dx, self.bb.min.y + 0.1, self.pos.z + dz),
            DVec3::new(-self.motion.x * 4.0, 1.5, -self.motion.z * 4.0),
        );
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
