//! Entity kinds, their capability flags, and the callbacks an owner plugs in.
//!
//! The core never inspects concrete entity types. Each entity resolves a
//! [`Capabilities`] record once from its [`EntityKind`], and everything that
//! belongs to a richer entity model (health, damage formulas, dimension
//! travel) is delegated through [`EntityHooks`].

use cinder_block::BlockState;
use serde::{Deserialize, Serialize};

/// Broad classification of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Items, projectiles, falling blocks.
    Generic,
    /// Mobs and other entities with health.
    LivingBase,
    Player,
    /// Rideable water craft.
    Boat,
}

/// Behaviour switches resolved once per entity from its kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capabilities {
    pub kind: EntityKind,
    pub fire_immune: bool,
    /// Fire counter baseline after leaving a fire source is `-fire_immune_ticks`.
    pub fire_immune_ticks: i32,
    /// Ticks inside a portal before the dimension changes.
    pub max_in_portal_time: i32,
    /// Ticks before a portal can trigger again after use.
    pub portal_cooldown: i32,
    /// Whether movement advances step counters and plays step sounds.
    pub triggers_walking: bool,
    pub makes_fly_sound: bool,
    /// Grounded sneaking backs the entity away from ledges.
    pub sneak_creep: bool,
    /// Whether the entity has health and fire protection.
    pub living: bool,
    /// Riders of this kind are never considered in water.
    pub water_craft: bool,
    /// The first passenger steers this vehicle.
    pub passenger_controls: bool,
    /// Default step height for new entities of this kind.
    pub step_height: f32,
}

impl Capabilities {
    pub const fn for_kind(kind: EntityKind) -> Self {
        let generic = Self {
            kind,
            fire_immune: false,
            fire_immune_ticks: 1,
            max_in_portal_time: 1,
            portal_cooldown: 300,
            triggers_walking: true,
            makes_fly_sound: false,
            sneak_creep: false,
            living: false,
            water_craft: false,
            passenger_controls: false,
            step_height: 0.0,
        };
        match kind {
            EntityKind::Generic => generic,
            EntityKind::LivingBase => Self {
                living: true,
                step_height: 0.6,
                ..generic
            },
            EntityKind::Player => Self {
                fire_immune_ticks: 20,
                max_in_portal_time: 80,
                portal_cooldown: 10,
                sneak_creep: true,
                living: true,
                step_height: 0.6,
                ..generic
            },
            EntityKind::Boat => Self {
                triggers_walking: false,
                water_craft: true,
                passenger_controls: true,
                ..generic
            },
        }
    }

    /// Same kind, but immune to fire.
    #[must_use]
    pub const fn fire_immune(self) -> Self {
        Self {
            fire_immune: true,
            ..self
        }
    }
}

/// Cause passed to [`EntityHooks::attack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// Burning countdown.
    OnFire,
    /// Standing in a fire or lava cell.
    InFire,
    Lava,
    Cactus,
    /// Walking on magma.
    HotFloor,
}

/// Callbacks from the kinematics core into the owning entity model.
///
/// Every method has a default suitable for an inert entity.
pub trait EntityHooks {
    /// Apply damage; returns whether it landed.
    fn attack(&mut self, _source: DamageSource, _amount: f32) -> bool {
        false
    }

    /// Landed after falling `distance` blocks; `multiplier` scales damage.
    fn fall(&mut self, _distance: f32, _multiplier: f32) {}

    /// The entity moved between dimensions.
    fn change_dimension(&mut self, _from: i32, _to: i32) {}

    /// Reduce a fire duration for protected living entities.
    fn adjust_fire_ticks(&self, ticks: i32) -> i32 {
        ticks
    }

    /// Play a wing flap; returns the on-step distance of the next flap.
    fn play_fly_sound(&mut self, distance: f32) -> f32 {
        distance + 1.0
    }

    /// Called for every block cell the entity overlaps after a move.
    fn on_inside_block(&mut self, _state: &BlockState) {}
}

/// Hooks for entities that ignore every callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoHooks;

impl EntityHooks for NoHooks {}
