//! Scripted demo scene.
//!
//! A stone floor with a raised snow terrace and a wall at its far end. A
//! player walks into the terrace and up to the wall, a mob drops from the
//! sky, a burning item cools down on the floor and a boat carries a rider
//! along the floor until the terrace edge stops it.

use cinder_block::{Block, BlockState};
use cinder_config::SimulationConfig;
use cinder_entity::{EntityId, EntityKind, EntityTable, GridWorld, MoverType, SimulationFault};
use cinder_math::{BlockPos, DVec3};
use tracing::{debug, info, trace};

const GRAVITY: f64 = 0.08;
const AIR_DRAG: f64 = 0.98;
const WALK_SPEED: f64 = 0.2;
const BOAT_SPEED: f64 = 0.1;

/// Counters gathered while the scene runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u32,
    pub sounds: usize,
    pub particles: usize,
}

pub struct Scene {
    pub world: GridWorld,
    pub table: EntityTable,
    pub walker: EntityId,
    pub faller: EntityId,
    pub ember: EntityId,
    pub boat: EntityId,
    pub rider: EntityId,
}

impl Scene {
    pub fn build(config: SimulationConfig) -> Self {
        let mut world = GridWorld::new();
        world.fill(
            BlockPos::new(-8, -1, -4),
            BlockPos::new(16, -1, 4),
            BlockState::of(Block::Stone),
        );
        world.fill(
            BlockPos::new(3, 0, -4),
            BlockPos::new(9, 0, 4),
            BlockState::with_level(Block::SnowLayer, 5),
        );
        world.fill(
            BlockPos::new(10, 0, -4),
            BlockPos::new(10, 1, 4),
            BlockState::of(Block::Stone),
        );

        let mut table = EntityTable::new(config);
        let walker = place(&mut table, EntityKind::Player, DVec3::new(0.5, 0.0, 0.5));
        let faller = place(&mut table, EntityKind::LivingBase, DVec3::new(-4.5, 12.0, 2.5));
        let ember = place(&mut table, EntityKind::Generic, DVec3::new(-6.5, 0.0, -0.5));
        let boat = place(&mut table, EntityKind::Boat, DVec3::new(-4.5, 0.0, -2.5));
        let rider = place(&mut table, EntityKind::Player, DVec3::new(-4.5, 0.0, -2.5));

        if let Some(ember) = table.get_mut(ember) {
            ember.set_fire(3);
        }
        if !table.start_riding(rider, boat, false) {
            debug!("Demo rider could not board");
        }

        Self {
            world,
            table,
            walker,
            faller,
            ember,
            boat,
            rider,
        }
    }

    /// Advance the scene by `ticks` world ticks.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimulationFault`] raised by a move.
    pub fn run(&mut self, ticks: u32) -> Result<RunStats, SimulationFault> {
        let mut stats = RunStats::default();
        for tick in 0..ticks {
            if let Some(walker) = self.table.get_mut(self.walker) {
                walker.motion.x = WALK_SPEED;
            }
            self.drive(self.walker, MoverType::Player)?;
            self.drive(self.faller, MoverType::SelfDriven)?;
            self.drive(self.ember, MoverType::SelfDriven)?;

            if let Some(boat) = self.table.get_mut(self.boat) {
                boat.motion.x = BOAT_SPEED;
            }
            self.drive(self.boat, MoverType::SelfDriven)?;
            self.table.tick_ridden(self.rider, &mut self.world);

            self.push_overlapping();

            stats.sounds += self.world.sounds().len();
            stats.particles += self.world.particles().len();
            self.world.clear_effects();
            self.world.advance_tick();
            stats.ticks += 1;
            trace!(tick, "Scene tick complete");
        }
        Ok(stats)
    }

    /// Log where every entity ended up.
    pub fn log_state(&self) {
        for id in self.table.ids() {
            let Some(entity) = self.table.get(id) else {
                continue;
            };
            info!(
                id = ?id,
                kind = ?entity.kind(),
                x = entity.pos.x,
                y = entity.pos.y,
                z = entity.pos.z,
                on_ground = entity.on_ground,
                fire = entity.fire_ticks(),
                riding = entity.is_riding(),
                "Entity state"
            );
        }
    }

    /// Tick one free entity and move it by its own motion.
    fn drive(&mut self, id: EntityId, mover: MoverType) -> Result<(), SimulationFault> {
        if !self.table.tick(id, &mut self.world) {
            return Ok(());
        }
        let Some(entity) = self.table.get_mut(id) else {
            return Ok(());
        };
        let delta = entity.motion;
        entity.move_entity(&mut self.world, mover, delta)?;
        if !entity.no_gravity {
            entity.motion.y -= GRAVITY;
        }
        entity.motion.y *= AIR_DRAG;
        Ok(())
    }

    fn push_overlapping(&mut self) {
        let ids = self.table.ids();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                let touching = match (self.table.get(a), self.table.get(b)) {
                    (Some(ea), Some(eb)) => ea.bounding_box().intersects(&eb.bounding_box()),
                    _ => false,
                };
                if touching {
                    self.table.apply_entity_collision(a, b);
                }
            }
        }
    }
}

fn place(table: &mut EntityTable, kind: EntityKind, at: DVec3) -> EntityId {
    let id = table.spawn(kind);
    if let Some(entity) = table.get_mut(id) {
        entity.set_location_and_angles(at, 0.0, 0.0);
    }
    id
}
