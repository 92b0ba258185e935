//! Entity kinematics: moving an axis-aligned box through a block world.
//!
//! [`Entity::move_entity`] turns a requested displacement into the actual one
//! by resolving block collisions axis by axis, stepping up ledges, creeping
//! back from edges while sneaking and clamping piston drag. Its side effects
//! (landing, fall bookkeeping, step sounds, block collision callbacks, fire
//! contact) follow from the achieved motion. [`Entity::base_tick`] runs the
//! environment state machine for portals, water, fire, lava and the void.
//!
//! The surrounding world is reached only through the [`World`] trait, and
//! everything belonging to a richer entity model through [`EntityHooks`].
//! [`EntityTable`] owns a session's entities and the riding graph between them.

pub mod collision;
mod entity;
mod environment;
mod error;
pub mod grid;
mod hooks;
mod id;
mod motion;
mod persist;
pub mod piston;
pub mod sneak;
mod table;
mod world;

pub use entity::{Entity, Vehicle};
pub use error::{BlockCallbackError, CrashCategory, CrashReport, SimulationFault, SnapshotError};
pub use grid::GridWorld;
pub use hooks::{Capabilities, DamageSource, EntityHooks, EntityKind, NoHooks};
pub use id::{EntityId, IdAllocator};
pub use motion::MoverType;
pub use persist::EntitySnapshot;
pub use piston::PistonDeltas;
pub use table::{DISMOUNT_COOLDOWN, EntityTable};
pub use world::{Particle, SoundEvent, World};
