//! Entity storage and the riding graph.
//!
//! Riders and vehicles refer to each other by [`EntityId`]. Both sides of an
//! edge are only ever changed together, by [`EntityTable::start_riding`] and
//! [`EntityTable::dismount`].

use rustc_hash::FxHashMap;
use tracing::debug;

use cinder_config::SimulationConfig;
use cinder_math::{DVec3, abs_max};

use crate::entity::{Entity, Vehicle};
use crate::hooks::{Capabilities, EntityHooks, NoHooks};
use crate::id::{EntityId, IdAllocator};
use crate::world::World;

/// Ticks a dismounted entity must wait before it can mount again.
pub const DISMOUNT_COOLDOWN: i32 = 60;
/// Entities closer than this (on the larger horizontal axis) are not pushed.
const MIN_PUSH_SEPARATION: f64 = 0.009999999776482582;
const PUSH_STRENGTH: f64 = 0.05000000074505806;
/// Passenger seat height as a fraction of the vehicle's height.
const MOUNTED_OFFSET: f64 = 0.75;

/// Owns every entity of a session and their id allocator.
#[derive(Debug)]
pub struct EntityTable<H: EntityHooks = NoHooks> {
    entities: FxHashMap<EntityId, Entity<H>>,
    ids: IdAllocator,
    config: SimulationConfig,
}

impl<H: EntityHooks> EntityTable<H> {
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_allocator(config, IdAllocator::new())
    }

    /// A table continuing an existing id sequence.
    pub fn with_allocator(config: SimulationConfig, ids: IdAllocator) -> Self {
        Self {
            entities: FxHashMap::default(),
            ids,
            config,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn spawn(&mut self, caps: impl Into<Capabilities>) -> EntityId
    where
        H: Default,
    {
        self.spawn_with_hooks(caps, H::default())
    }

    pub fn spawn_with_hooks(&mut self, caps: impl Into<Capabilities>, hooks: H) -> EntityId {
        let id = self.ids.allocate();
        let entity = Entity::with_hooks(id, caps, self.config.clone(), hooks);
        self.entities.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity<H>> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity<H>> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids of every entity, in spawn order.
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Take an entity out of the table, detaching it from the riding graph first.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity<H>> {
        if !self.contains(id) {
            return None;
        }
        self.remove_passengers(id);
        self.dismount(id);
        self.entities.remove(&id)
    }

    // -----------------------------------------------------------------------
    // Riding graph
    // -----------------------------------------------------------------------

    /// Mount `passenger` on `vehicle`.
    ///
    /// Refused when it would put an entity on itself or close a loop. Unless
    /// `force` is set, the passenger's ride cooldown must have run out and the
    /// vehicle must be empty. A passenger already riding something is
    /// dismounted first.
    pub fn start_riding(&mut self, passenger: EntityId, vehicle: EntityId, force: bool) -> bool {
        if passenger == vehicle {
            debug!(%passenger, "refusing to mount an entity on itself");
            return false;
        }
        let (Some(rider), Some(mount)) = (self.entities.get(&passenger), self.entities.get(&vehicle))
        else {
            return false;
        };
        if self.rides_on(vehicle, passenger) {
            debug!(%passenger, %vehicle, "refusing mount that would form a riding loop");
            return false;
        }
        if !force && (rider.ride_cooldown > 0 || mount.is_being_ridden()) {
            debug!(%passenger, %vehicle, cooldown = rider.ride_cooldown, "mount refused");
            return false;
        }
        let vehicle_kind = mount.kind();

        if rider.is_riding() {
            self.dismount(passenger);
        }

        if let Some(rider) = self.entities.get_mut(&passenger) {
            rider.attach_vehicle(Vehicle {
                id: vehicle,
                kind: vehicle_kind,
            });
        }
        if let Some(mount) = self.entities.get_mut(&vehicle) {
            mount.add_passenger(passenger);
        }
        true
    }

    /// Detach `passenger` from its vehicle. Returns whether it was riding.
    pub fn dismount(&mut self, passenger: EntityId) -> bool {
        let Some(rider) = self.entities.get_mut(&passenger) else {
            return false;
        };
        let Some(vehicle) = rider.detach_vehicle() else {
            return false;
        };
        rider.ride_cooldown = DISMOUNT_COOLDOWN;
        if let Some(mount) = self.entities.get_mut(&vehicle.id) {
            mount.remove_passenger(passenger);
        }
        true
    }

    /// Dismount every passenger of `vehicle`.
    pub fn remove_passengers(&mut self, vehicle: EntityId) {
        let passengers = match self.entities.get(&vehicle) {
            Some(mount) => mount.passengers().to_vec(),
            None => return,
        };
        for passenger in passengers.into_iter().rev() {
            self.dismount(passenger);
        }
    }

    /// Whether `id` sits somewhere above `ancestor` in a riding chain.
    fn rides_on(&self, id: EntityId, ancestor: EntityId) -> bool {
        let mut current = id;
        for _ in 0..self.entities.len() {
            match self.entities.get(&current).and_then(|e| e.vehicle()) {
                Some(vehicle) if vehicle.id == ancestor => return true,
                Some(vehicle) => current = vehicle.id,
                None => return false,
            }
        }
        false
    }

    /// Bottom of the riding chain `id` belongs to; `id` itself when not riding.
    pub fn lowest_riding_entity(&self, id: EntityId) -> EntityId {
        let mut current = id;
        for _ in 0..self.entities.len() {
            match self.entities.get(&current).and_then(|e| e.vehicle()) {
                Some(vehicle) => current = vehicle.id,
                None => break,
            }
        }
        current
    }

    /// The passenger steering `vehicle`, if its kind lets passengers steer.
    pub fn controlling_passenger(&self, vehicle: EntityId) -> Option<EntityId> {
        let mount = self.entities.get(&vehicle)?;
        if !mount.capabilities().passenger_controls {
            return None;
        }
        mount.passengers().first().copied()
    }

    /// Seat `passenger` on `vehicle`. Does nothing if it is not a passenger of it.
    pub fn update_passenger(&mut self, vehicle: EntityId, passenger: EntityId) -> bool {
        let Some(mount) = self.entities.get(&vehicle) else {
            return false;
        };
        if !mount.passengers().contains(&passenger) {
            return false;
        }
        let seat = mount.pos + DVec3::new(0.0, f64::from(mount.height()) * MOUNTED_OFFSET, 0.0);
        match self.entities.get_mut(&passenger) {
            Some(rider) => {
                rider.set_position(seat);
                true
            }
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Ticking
    // -----------------------------------------------------------------------

    /// Run the base tick of `id`, dismounting it first if its vehicle died.
    pub fn tick<W: World>(&mut self, id: EntityId, world: &mut W) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            return false;
        };
        if let Some(vehicle) = entity.vehicle() {
            let vehicle_gone = self.entities.get(&vehicle.id).is_none_or(|v| v.is_dead());
            if vehicle_gone {
                debug!(entity = %id, vehicle = %vehicle.id, "dismounting from dead vehicle");
                self.dismount(id);
            }
        }

        let controller_motion = self
            .controlling_passenger(id)
            .and_then(|p| self.entities.get(&p))
            .map(|p| p.motion);

        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        entity.controlling_passenger_motion = controller_motion;
        entity.base_tick(world);
        true
    }

    /// Tick a passenger: its own motion is cleared and it is re-seated on
    /// its vehicle afterwards.
    pub fn tick_ridden<W: World>(&mut self, id: EntityId, world: &mut W) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        entity.motion = DVec3::ZERO;
        self.tick(id, world);

        if let Some(vehicle) = self.entities.get(&id).and_then(|e| e.vehicle()) {
            self.update_passenger(vehicle.id, id);
        }
        true
    }

    /// Push two overlapping entities apart horizontally.
    ///
    /// The impulse is scaled by `a`'s collision reduction. Entities sharing a
    /// riding chain, or either one with no-clip, are left alone; an entity
    /// carrying passengers does not receive the push.
    pub fn apply_entity_collision(&mut self, a: EntityId, b: EntityId) {
        if a == b || self.lowest_riding_entity(a) == self.lowest_riding_entity(b) {
            return;
        }
        let (Some(first), Some(second)) = (self.entities.get(&a), self.entities.get(&b)) else {
            return;
        };
        if first.no_clip || second.no_clip {
            return;
        }

        let mut dx = second.pos.x - first.pos.x;
        let mut dz = second.pos.z - first.pos.z;
        let separation = abs_max(dx, dz);
        if separation < MIN_PUSH_SEPARATION {
            return;
        }

        let separation = separation.sqrt();
        dx /= separation;
        dz /= separation;
        let falloff = (1.0 / separation).min(1.0);
        let scale = falloff * PUSH_STRENGTH * f64::from(1.0 - first.entity_collision_reduction);
        dx *= scale;
        dz *= scale;

        if let Some(first) = self.entities.get_mut(&a).filter(|e| !e.is_being_ridden()) {
            first.add_velocity(-dx, 0.0, -dz);
        }
        if let Some(second) = self.entities.get_mut(&b).filter(|e| !e.is_being_ridden()) {
            second.add_velocity(dx, 0.0, dz);
        }
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
