//! Entity state: kinematics, environment counters, positioning and queries.
//!
//! The per-tick entry points live next door: [`Entity::move_entity`] in
//! `motion.rs` and [`Entity::base_tick`] in `environment.rs`.

use cinder_block::Material;
use cinder_config::SimulationConfig;
use cinder_math::{Aabb, BlockPos, DEG_TO_RAD, DVec3, floor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SimulationFault;
use crate::hooks::{Capabilities, DamageSource, EntityHooks, EntityKind, NoHooks};
use crate::id::EntityId;
use crate::motion::MoverType;
use crate::piston::PistonDeltas;
use crate::world::{SoundEvent, World};

const DEFAULT_WIDTH: f32 = 0.6;
const DEFAULT_HEIGHT: f32 = 1.8;
const DEFAULT_AIR: i32 = 300;

/// The entity this one rides, with its kind cached for water checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vehicle {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl From<EntityKind> for Capabilities {
    fn from(kind: EntityKind) -> Self {
        Capabilities::for_kind(kind)
    }
}

/// A simulated entity.
///
/// Position, motion and rotation are public like plain data; moving the
/// bounding box must go through the positioning methods so that `pos` and
/// the box stay consistent.
#[derive(Clone, Debug)]
pub struct Entity<H: EntityHooks = NoHooks> {
    id: EntityId,
    pub(crate) caps: Capabilities,
    pub(crate) config: SimulationConfig,
    /// Owner callbacks.
    pub hooks: H,
    pub(crate) rng: ChaCha8Rng,

    pub pos: DVec3,
    /// Position at the start of the current tick, for interpolation.
    pub prev_pos: DVec3,
    pub last_tick_pos: DVec3,
    pub motion: DVec3,
    pub yaw: f32,
    pub pitch: f32,
    pub prev_yaw: f32,
    pub prev_pitch: f32,
    pub(crate) bb: Aabb,
    width: f32,
    height: f32,
    pub step_height: f32,

    pub on_ground: bool,
    pub collided_horizontally: bool,
    pub collided_vertically: bool,
    pub collided: bool,
    /// Set whenever external velocity is added.
    pub airborne: bool,

    pub fall_distance: f32,
    pub prev_distance_walked: f32,
    pub distance_walked: f32,
    pub distance_walked_on_step: f32,
    pub(crate) next_step_distance: i32,
    pub(crate) next_flap: f32,

    pub(crate) fire: i32,
    pub(crate) burning_flag: bool,
    pub(crate) in_water: bool,
    pub(crate) first_update: bool,
    pub(crate) in_web: bool,
    pub(crate) in_portal: bool,
    pub(crate) portal_counter: i32,
    pub(crate) time_until_portal: i32,
    pub(crate) last_portal_pos: Option<BlockPos>,
    pub(crate) piston: PistonDeltas,

    pub no_clip: bool,
    pub sneaking: bool,
    pub sprinting: bool,
    /// Suppresses every sound the entity would play.
    pub silent: bool,
    pub no_gravity: bool,
    pub invulnerable: bool,
    pub(crate) dead: bool,
    pub air: i32,
    pub dimension: i32,
    /// Fraction of entity pushes this entity ignores.
    pub entity_collision_reduction: f32,

    pub(crate) ride_cooldown: i32,
    pub(crate) vehicle: Option<Vehicle>,
    pub(crate) passengers: Vec<EntityId>,
    pub(crate) controlling_passenger_motion: Option<DVec3>,
}

impl Entity<NoHooks> {
    /// An entity without owner callbacks.
    pub fn new(id: EntityId, caps: impl Into<Capabilities>, config: SimulationConfig) -> Self {
        Self::with_hooks(id, caps, config, NoHooks)
    }
}

impl<H: EntityHooks> Entity<H> {
    /// An entity at the origin, 0.6 wide and 1.8 tall.
    pub fn with_hooks(
        id: EntityId,
        caps: impl Into<Capabilities>,
        config: SimulationConfig,
        hooks: H,
    ) -> Self {
        let caps = caps.into();
        let mut entity = Self {
            id,
            caps,
            config,
            hooks,
            rng: ChaCha8Rng::seed_from_u64(u64::from(id.0)),
            pos: DVec3::ZERO,
            prev_pos: DVec3::ZERO,
            last_tick_pos: DVec3::ZERO,
            motion: DVec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            prev_yaw: 0.0,
            prev_pitch: 0.0,
            bb: Aabb::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            step_height: caps.step_height,
            on_ground: false,
            collided_horizontally: false,
            collided_vertically: false,
            collided: false,
            airborne: false,
            fall_distance: 0.0,
            prev_distance_walked: 0.0,
            distance_walked: 0.0,
            distance_walked_on_step: 0.0,
            next_step_distance: 1,
            next_flap: 1.0,
            fire: -caps.fire_immune_ticks,
            burning_flag: false,
            in_water: false,
            first_update: true,
            in_web: false,
            in_portal: false,
            portal_counter: 0,
            time_until_portal: 0,
            last_portal_pos: None,
            piston: PistonDeltas::new(),
            no_clip: false,
            sneaking: false,
            sprinting: false,
            silent: false,
            no_gravity: false,
            invulnerable: false,
            dead: false,
            air: DEFAULT_AIR,
            dimension: 0,
            entity_collision_reduction: 0.0,
            ride_cooldown: 0,
            vehicle: None,
            passengers: Vec::new(),
            controlling_passenger_motion: None,
        };
        entity.set_position(DVec3::ZERO);
        entity
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.caps.kind
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn bounding_box(&self) -> Aabb {
        self.bb
    }

    /// Replace the box without touching `pos`; see [`Entity::reset_position_to_bb`].
    pub fn set_bounding_box(&mut self, bb: Aabb) {
        self.bb = bb;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn eye_height(&self) -> f32 {
        self.height * 0.85
    }

    /// Raw fire counter: positive while burning, negative during the
    /// post-fire immunity count-up.
    pub fn fire_ticks(&self) -> i32 {
        self.fire
    }

    pub fn is_in_water(&self) -> bool {
        self.in_water
    }

    pub fn is_in_web(&self) -> bool {
        self.in_web
    }

    /// Slow the next move as if caught in a cobweb.
    pub fn set_in_web(&mut self) {
        self.in_web = true;
        self.fall_distance = 0.0;
    }

    pub fn is_in_portal(&self) -> bool {
        self.in_portal
    }

    pub fn portal_counter(&self) -> i32 {
        self.portal_counter
    }

    pub fn time_until_portal(&self) -> i32 {
        self.time_until_portal
    }

    pub fn last_portal_pos(&self) -> Option<BlockPos> {
        self.last_portal_pos
    }

    pub fn piston_deltas(&self) -> &PistonDeltas {
        &self.piston
    }

    pub fn next_step_distance(&self) -> i32 {
        self.next_step_distance
    }

    pub fn next_flap(&self) -> f32 {
        self.next_flap
    }

    pub fn is_first_update(&self) -> bool {
        self.first_update
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn set_dead(&mut self) {
        self.dead = true;
    }

    pub fn ride_cooldown(&self) -> i32 {
        self.ride_cooldown
    }

    pub fn vehicle(&self) -> Option<Vehicle> {
        self.vehicle
    }

    pub fn is_riding(&self) -> bool {
        self.vehicle.is_some()
    }

    pub fn passengers(&self) -> &[EntityId] {
        &self.passengers
    }

    pub fn is_being_ridden(&self) -> bool {
        !self.passengers.is_empty()
    }

    pub(crate) fn is_riding_water_craft(&self) -> bool {
        self.vehicle
            .is_some_and(|v| Capabilities::for_kind(v.kind).water_craft)
    }

    // -----------------------------------------------------------------------
    // Positioning
    // -----------------------------------------------------------------------

    /// Place the entity and rebuild its box around the new feet position.
    pub fn set_position(&mut self, pos: DVec3) {
        self.pos = pos;
        let half = f64::from(self.width / 2.0);
        let height = f64::from(self.height);
        self.bb = Aabb::new(
            pos.x - half,
            pos.y,
            pos.z - half,
            pos.x + half,
            pos.y + height,
            pos.z + half,
        );
    }

    /// Teleport-style placement: X and Z are clamped to the world limit,
    /// pitch to +/-90, and previous values reset so nothing interpolates.
    ///
    /// The current yaw is reduced modulo 360; the previous yaw keeps the
    /// argument as given.
    pub fn set_position_and_rotation(&mut self, pos: DVec3, yaw: f32, pitch: f32) {
        let limit = self.config.world_coordinate_limit;
        let pos = DVec3::new(pos.x.clamp(-limit, limit), pos.y, pos.z.clamp(-limit, limit));
        self.prev_pos = pos;
        let pitch = pitch.clamp(-90.0, 90.0);
        self.prev_yaw = yaw;
        self.prev_pitch = pitch;

        self.set_position(pos);
        self.set_rotation(yaw, pitch);
    }

    /// Place the entity with every previous-position field reset.
    pub fn set_location_and_angles(&mut self, pos: DVec3, yaw: f32, pitch: f32) {
        self.prev_pos = pos;
        self.last_tick_pos = pos;
        self.yaw = yaw;
        self.pitch = pitch;
        self.set_position(pos);
    }

    /// Stand on the centre of the block cell `pos`.
    pub fn move_to_block_pos_and_angles(&mut self, pos: BlockPos, yaw: f32, pitch: f32) {
        let at = DVec3::new(f64::from(pos.x) + 0.5, f64::from(pos.y), f64::from(pos.z) + 0.5);
        self.set_location_and_angles(at, yaw, pitch);
    }

    pub fn set_rotation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw % 360.0;
        self.pitch = pitch % 360.0;
    }

    /// Apply a mouse-look delta with the 0.15 smoothing factor.
    ///
    /// The previous rotation shifts by the same amount, so the turn is not
    /// interpolated across the frame.
    pub fn turn(&mut self, yaw: f32, pitch: f32) {
        let old_pitch = self.pitch;
        let old_yaw = self.yaw;
        self.yaw = (f64::from(self.yaw) + f64::from(yaw) * 0.15) as f32;
        self.pitch = (f64::from(self.pitch) - f64::from(pitch) * 0.15) as f32;
        self.pitch = self.pitch.clamp(-90.0, 90.0);
        self.prev_pitch += self.pitch - old_pitch;
        self.prev_yaw += self.yaw - old_yaw;
    }

    /// Derive `pos` from the box: horizontal centre, bottom face.
    pub fn reset_position_to_bb(&mut self) {
        let bb = self.bb;
        self.pos = DVec3::new(
            (bb.min.x + bb.max.x) / 2.0,
            bb.min.y,
            (bb.min.z + bb.max.z) / 2.0,
        );
    }

    /// Change the entity's dimensions.
    ///
    /// Shrinking re-centres the box on `pos`. Growing keeps the minimum
    /// corner and, after the first tick on an authoritative world, nudges the
    /// entity back through a regular move so it does not end up in a wall.
    pub fn set_size<W: World>(
        &mut self,
        world: &mut W,
        width: f32,
        height: f32,
    ) -> Result<(), SimulationFault> {
        if width == self.width && height == self.height {
            return Ok(());
        }

        let old_width = self.width;
        self.width = width;
        self.height = height;

        if width < old_width {
            let half = f64::from(width) / 2.0;
            let pos = self.pos;
            self.bb = Aabb::new(
                pos.x - half,
                pos.y,
                pos.z - half,
                pos.x + half,
                pos.y + f64::from(height),
                pos.z + half,
            );
            return Ok(());
        }

        let min = self.bb.min;
        self.bb = Aabb::new(
            min.x,
            min.y,
            min.z,
            min.x + f64::from(width),
            min.y + f64::from(height),
            min.z + f64::from(width),
        );

        if width > old_width && !self.first_update && !world.is_remote() {
            let back = f64::from(old_width - width);
            self.move_entity(world, MoverType::SelfDriven, DVec3::new(back, 0.0, back))?;
        }
        Ok(())
    }

    /// Raise the entity one block at a time until its box is free, then
    /// clear motion and pitch.
    pub fn prepare_to_spawn<W: World + ?Sized>(&mut self, world: &W) {
        while self.pos.y > 0.0 && self.pos.y < 256.0 {
            self.set_position(self.pos);
            if world.collision_boxes(&self.bb).is_empty() {
                break;
            }
            self.pos.y += 1.0;
        }
        self.motion = DVec3::ZERO;
        self.pitch = 0.0;
    }

    // -----------------------------------------------------------------------
    // Velocity
    // -----------------------------------------------------------------------

    pub fn add_velocity(&mut self, x: f64, y: f64, z: f64) {
        self.motion += DVec3::new(x, y, z);
        self.airborne = true;
    }

    /// Accelerate along the entity's facing from strafe/up/forward input.
    ///
    /// Input is normalised when its length exceeds 1 and then scaled by
    /// `friction`.
    pub fn move_relative(&mut self, strafe: f32, up: f32, forward: f32, friction: f32) {
        let len_sq = strafe * strafe + up * up + forward * forward;
        if len_sq < 1.0e-4 {
            return;
        }

        let scale = friction / len_sq.sqrt().max(1.0);
        let (strafe, up, forward) = (strafe * scale, up * scale, forward * scale);
        let sin = (self.yaw * DEG_TO_RAD).sin();
        let cos = (self.yaw * DEG_TO_RAD).cos();
        self.motion.x += f64::from(strafe * cos - forward * sin);
        self.motion.y += f64::from(up);
        self.motion.z += f64::from(forward * cos + strafe * sin);
    }

    // -----------------------------------------------------------------------
    // Fire
    // -----------------------------------------------------------------------

    /// Burn for at least `seconds`; never shortens an existing fire.
    pub fn set_fire(&mut self, seconds: i32) {
        let mut ticks = seconds * self.config.ticks_per_second as i32;
        if self.caps.living {
            ticks = self.hooks.adjust_fire_ticks(ticks);
        }
        if self.fire < ticks {
            self.fire = ticks;
        }
    }

    pub fn extinguish(&mut self) {
        self.fire = 0;
    }

    /// Whether the entity is on fire.
    ///
    /// Remote worlds trust the published burning flag since they never run
    /// the fire countdown themselves.
    pub fn is_burning<W: World + ?Sized>(&self, world: &W) -> bool {
        !self.caps.fire_immune && (self.fire > 0 || (world.is_remote() && self.burning_flag))
    }

    /// Flag published by the authoritative simulation.
    pub fn burning_flag(&self) -> bool {
        self.burning_flag
    }

    pub fn set_burning_flag(&mut self, burning: bool) {
        self.burning_flag = burning;
    }

    pub fn deal_fire_damage(&mut self, amount: f32) {
        if !self.caps.fire_immune {
            self.hooks.attack(DamageSource::InFire, amount);
        }
    }

    pub(crate) fn set_on_fire_from_lava(&mut self) {
        if !self.caps.fire_immune {
            self.hooks.attack(DamageSource::Lava, 4.0);
            self.set_fire(15);
        }
    }

    /// Report a landing to the owner.
    ///
    /// Passengers are not forwarded here; [`crate::EntityTable`] owns them.
    pub fn fall(&mut self, distance: f32, multiplier: f32) {
        self.hooks.fall(distance, multiplier);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// In water, or standing in rain at the feet or the head.
    pub fn is_wet<W: World + ?Sized>(&self, world: &W) -> bool {
        if self.in_water {
            return true;
        }
        let feet = BlockPos::floored(self.pos);
        let head = BlockPos::floored(self.pos + DVec3::new(0.0, f64::from(self.height), 0.0));
        world.is_raining_at(feet) || world.is_raining_at(head)
    }

    /// Water anywhere in the 20 blocks below the entity.
    pub fn is_over_water<W: World + ?Sized>(&self, world: &W) -> bool {
        let region = self.bb.grow(0.0, -20.0, 0.0).shrink(0.001);
        world.material_present_in(&region, Material::Water)
    }

    pub fn is_in_lava<W: World + ?Sized>(&self, world: &W) -> bool {
        let region = self
            .bb
            .grow(-0.10000000149011612, -0.4000000059604645, -0.10000000149011612);
        world.material_in_bb(&region, Material::Lava)
    }

    /// Whether the entity's eyes are below the surface of `material`.
    pub fn is_inside_of_material<W: World + ?Sized>(&self, world: &W, material: Material) -> bool {
        if self.is_riding_water_craft() {
            return false;
        }

        let eye_y = self.pos.y + f64::from(self.eye_height());
        let cell = BlockPos::new(floor(self.pos.x), floor(eye_y), floor(self.pos.z));
        let state = world.block_state(cell);
        if state.material() != material {
            return false;
        }

        let filled = state.liquid_height_percent() - 0.11111111;
        let surface = (cell.y + 1) as f32 - filled;
        eye_y < f64::from(surface)
    }

    /// Whether the box, offset by `offset`, is free of both collisions and liquid.
    pub fn is_offset_position_clear<W: World + ?Sized>(&self, world: &W, offset: DVec3) -> bool {
        let bb = self.bb.offset_vec(offset);
        world.collision_boxes(&bb).is_empty() && !world.contains_any_liquid(&bb)
    }

    /// Probe eight points around eye level for a suffocating block.
    pub fn is_entity_inside_opaque_block<W: World + ?Sized>(&self, world: &W) -> bool {
        if self.no_clip {
            return false;
        }

        let mut last = None;
        for i in 0..8 {
            let sy = ((i & 1) as f32 - 0.5) * 0.1;
            let sx = (((i >> 1) & 1) as f32 - 0.5) * self.width * 0.8;
            let sz = (((i >> 2) & 1) as f32 - 0.5) * self.width * 0.8;
            let cell = BlockPos::new(
                floor(self.pos.x + f64::from(sx)),
                floor(self.pos.y + f64::from(sy) + f64::from(self.eye_height())),
                floor(self.pos.z + f64::from(sz)),
            );
            if last == Some(cell) {
                continue;
            }
            last = Some(cell);
            if world.block_state(cell).causes_suffocation() {
                return true;
            }
        }
        false
    }

    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.pos.distance(point)
    }

    pub fn distance_sq(&self, point: DVec3) -> f64 {
        self.pos.distance_squared(point)
    }

    pub fn distance_sq_to_center(&self, pos: BlockPos) -> f64 {
        self.pos.distance_squared(pos.center())
    }

    /// Whether a viewer `distance_sq` away should still draw this entity.
    pub fn is_in_range_to_render_dist(&self, distance_sq: f64) -> bool {
        let mut edge = self.bb.average_edge_length();
        if edge.is_nan() {
            edge = 1.0;
        }
        let range = edge * 64.0 * self.config.render_distance_weight;
        distance_sq < range * range
    }

    /// Position between the previous and current tick.
    pub fn interpolated_position(&self, partial_ticks: f32) -> DVec3 {
        self.prev_pos.lerp(self.pos, f64::from(partial_ticks))
    }

    // -----------------------------------------------------------------------
    // Effects
    // -----------------------------------------------------------------------

    pub(crate) fn play_sound<W: World + ?Sized>(
        &self,
        world: &mut W,
        sound: SoundEvent,
        volume: f32,
        pitch: f32,
    ) {
        if !self.silent {
            world.play_sound(self.pos, sound, volume, pitch);
        }
    }

    /// Symmetric random spread in `(-0.4, 0.4)` for sound pitch.
    pub(crate) fn pitch_jitter(&mut self) -> f32 {
        (self.rng.random::<f32>() - self.rng.random::<f32>()) * 0.4
    }

    pub(crate) fn random_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    // -----------------------------------------------------------------------
    // Riding graph edges, mutated only by `EntityTable`
    // -----------------------------------------------------------------------

    pub(crate) fn attach_vehicle(&mut self, vehicle: Vehicle) {
        debug_assert!(self.vehicle.is_none(), "{} already rides", self.id);
        self.vehicle = Some(vehicle);
    }

    pub(crate) fn detach_vehicle(&mut self) -> Option<Vehicle> {
        self.vehicle.take()
    }

    pub(crate) fn add_passenger(&mut self, passenger: EntityId) {
        debug_assert!(!self.passengers.contains(&passenger));
        self.passengers.push(passenger);
    }

    pub(crate) fn remove_passenger(&mut self, passenger: EntityId) -> bool {
        let before = self.passengers.len();
        self.passengers.retain(|p| *p != passenger);
        self.passengers.len() != before
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
