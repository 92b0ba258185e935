//! Tests for the per-tick environment pass.

use cinder_block::{Block, BlockState};
use cinder_config::SimulationConfig;

use super::*;
use crate::entity::Vehicle;
use crate::grid::GridWorld;
use crate::hooks::{Capabilities, EntityKind};
use crate::id::EntityId;

#[derive(Clone, Debug, Default)]
struct Recorder {
    attacks: Vec<(DamageSource, f32)>,
    travels: Vec<(i32, i32)>,
}

impl EntityHooks for Recorder {
    fn attack(&mut self, source: DamageSource, amount: f32) -> bool {
        self.attacks.push((source, amount));
        true
    }

    fn change_dimension(&mut self, from: i32, to: i32) {
        self.travels.push((from, to));
    }
}

fn spawn_with(caps: impl Into<Capabilities>, config: SimulationConfig) -> Entity<Recorder> {
    let mut entity = Entity::with_hooks(EntityId(5), caps, config, Recorder::default());
    entity.set_position(DVec3::new(0.5, 0.0, 0.5));
    entity
}

fn spawn(caps: impl Into<Capabilities>) -> Entity<Recorder> {
    spawn_with(caps, SimulationConfig::default())
}

fn count(world: &GridWorld, particle: Particle) -> usize {
    world
        .particles()
        .iter()
        .filter(|p| p.particle == particle)
        .count()
}

#[test]
fn test_tick_copies_previous_state() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Player);
    e.yaw = 30.0;
    e.pitch = -10.0;
    e.distance_walked = 4.0;
    e.base_tick(&mut world);
    assert_eq!(e.prev_pos, e.pos);
    assert_eq!(e.prev_yaw, 30.0);
    assert_eq!(e.prev_pitch, -10.0);
    assert_eq!(e.prev_distance_walked, 4.0);
    assert!(!e.is_first_update());
}

#[test]
fn test_generic_portal_travel() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Generic);
    let portal = BlockPos::new(0, 0, 0);

    e.set_portal(portal);
    e.base_tick(&mut world);
    assert_eq!(e.portal_counter(), 1);
    assert!(!e.is_in_portal());
    assert!(e.hooks.travels.is_empty());

    e.set_portal(portal);
    e.base_tick(&mut world);
    assert_eq!(e.hooks.travels, vec![(0, -1)]);
    assert_eq!(e.dimension, -1);
    assert_eq!(e.time_until_portal(), 299);
    assert_eq!(e.last_portal_pos(), Some(portal));

    // Still standing in the portal: the cooldown is re-armed, nothing else.
    e.set_portal(portal);
    assert_eq!(e.time_until_portal(), 300);
    assert!(!e.is_in_portal());
}

#[test]
fn test_return_trip_goes_to_overworld() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Generic);
    e.dimension = -1;
    for _ in 0..2 {
        e.set_portal(BlockPos::new(0, 0, 0));
        e.base_tick(&mut world);
    }
    assert_eq!(e.dimension, 0);
    assert_eq!(e.hooks.travels, vec![(-1, 0)]);
}

#[test]
fn test_player_waits_full_portal_time() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Player);
    for _ in 0..80 {
        e.set_portal(BlockPos::new(0, 0, 0));
        e.base_tick(&mut world);
    }
    assert!(e.hooks.travels.is_empty());
    assert_eq!(e.portal_counter(), 80);

    e.set_portal(BlockPos::new(0, 0, 0));
    e.base_tick(&mut world);
    assert_eq!(e.hooks.travels.len(), 1);
    assert_eq!(e.time_until_portal(), 9);
}

#[test]
fn test_portal_counter_decays_outside() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Player);
    e.portal_counter = 10;
    e.base_tick(&mut world);
    assert_eq!(e.portal_counter(), 6);
    e.base_tick(&mut world);
    e.base_tick(&mut world);
    assert_eq!(e.portal_counter(), 0);
}

#[test]
fn test_disabled_nether_leaves_portal_flag() {
    let mut world = GridWorld::new();
    let config = SimulationConfig {
        allow_nether: false,
        ..SimulationConfig::default()
    };
    let mut e = spawn_with(EntityKind::Generic, config);
    for _ in 0..3 {
        e.set_portal(BlockPos::new(0, 0, 0));
        e.base_tick(&mut world);
    }
    assert!(e.is_in_portal());
    assert_eq!(e.portal_counter(), 0);
    assert!(e.hooks.travels.is_empty());
}

#[test]
fn test_riders_do_not_travel() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Generic);
    e.attach_vehicle(Vehicle {
        id: EntityId(99),
        kind: EntityKind::Generic,
    });
    for _ in 0..3 {
        e.set_portal(BlockPos::new(0, 0, 0));
        e.base_tick(&mut world);
    }
    assert!(e.hooks.travels.is_empty());
    assert_eq!(e.portal_counter(), 0);
}

#[test]
fn test_splash_once_per_entry_and_not_on_first_tick() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, 0, 0), BlockState::of(Block::Water));
    let mut e = spawn(EntityKind::Generic);
    let in_water = DVec3::new(0.5, 0.0, 0.5);
    let dry = DVec3::new(5.5, 0.0, 0.5);

    e.base_tick(&mut world);
    assert!(e.is_in_water());
    assert!(world.sounds().is_empty());

    e.set_position(dry);
    e.base_tick(&mut world);
    assert!(!e.is_in_water());

    e.set_position(in_water);
    e.motion = DVec3::new(0.0, -0.5, 0.0);
    e.base_tick(&mut world);
    e.base_tick(&mut world);

    let splashes: Vec<_> = world
        .sounds()
        .iter()
        .filter(|s| s.sound == SoundEvent::Splash)
        .collect();
    assert_eq!(splashes.len(), 1);
    assert!((splashes[0].volume - 0.1).abs() < 1e-6);
    assert_eq!(count(&world, Particle::WaterBubble), 13);
    assert_eq!(count(&world, Particle::WaterSplash), 13);
    assert!(world.particles().iter().all(|p| p.at.y == 1.0));
}

#[test]
fn test_water_extinguishes_and_cancels_fall() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, 0, 0), BlockState::of(Block::Water));
    let mut e = spawn(EntityKind::Generic);
    e.set_fire(5);
    e.fall_distance = 6.0;
    assert!(e.handle_water_movement(&mut world));
    assert_eq!(e.fire_ticks(), 0);
    assert_eq!(e.fall_distance, 0.0);
}

#[test]
fn test_boat_riders_stay_dry() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, 0, 0), BlockState::of(Block::Water));
    let mut e = spawn(EntityKind::Player);
    e.attach_vehicle(Vehicle {
        id: EntityId(1),
        kind: EntityKind::Boat,
    });
    assert!(!e.handle_water_movement(&mut world));
    assert!(!e.is_inside_of_material(&world, cinder_block::Material::Water));
}

#[test]
fn test_sprinting_kicks_up_dust() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, -1, 0), BlockState::of(Block::Dirt));
    let mut e = spawn(EntityKind::Player);
    e.sprinting = true;
    e.motion = DVec3::new(0.25, 0.0, -0.1);
    e.base_tick(&mut world);

    let dust = &world.particles()[0];
    assert_eq!(dust.particle, Particle::BlockCrack(BlockState::of(Block::Dirt)));
    assert_eq!(dust.velocity, DVec3::new(-1.0, 1.5, 0.4));
    assert!((dust.at.y - 0.1).abs() < 1e-9);
    assert!((dust.at.x - 0.5).abs() <= 0.3 + 1e-6);
}

#[test]
fn test_sprinting_over_air_is_clean() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Player);
    e.sprinting = true;
    e.base_tick(&mut world);
    assert!(world.particles().is_empty());
}

#[test]
fn test_fire_countdown_damages_every_second() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Generic);
    e.set_fire(1);
    e.base_tick(&mut world);
    assert!(e.burning_flag());
    assert_eq!(e.fire_ticks(), 19);

    for _ in 0..19 {
        e.base_tick(&mut world);
    }
    assert_eq!(e.fire_ticks(), 0);
    assert!(!e.burning_flag());
    assert_eq!(e.hooks.attacks, vec![(DamageSource::OnFire, 1.0)]);
}

#[test]
fn test_fire_immune_burns_out_fast() {
    let mut world = GridWorld::new();
    let mut e = spawn(Capabilities::for_kind(EntityKind::Generic).fire_immune());
    e.fire = 22;
    for _ in 0..6 {
        e.base_tick(&mut world);
    }
    assert_eq!(e.fire_ticks(), 0);
    assert!(e.hooks.attacks.is_empty());
}

#[test]
fn test_lava_ignites_and_halves_fall() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, 0, 0), BlockState::of(Block::Lava));
    let mut e = spawn(EntityKind::Generic);
    e.fall_distance = 4.0;
    e.base_tick(&mut world);
    assert_eq!(e.hooks.attacks, vec![(DamageSource::Lava, 4.0)]);
    assert_eq!(e.fire_ticks(), 300);
    assert_eq!(e.fall_distance, 2.0);
    assert!(e.burning_flag());
}

#[test]
fn test_out_of_world_kills() {
    let mut world = GridWorld::new();
    let mut e = spawn(EntityKind::Generic);
    e.set_position(DVec3::new(0.5, -64.0, 0.5));
    e.base_tick(&mut world);
    assert!(!e.is_dead());
    e.set_position(DVec3::new(0.5, -64.5, 0.5));
    e.base_tick(&mut world);
    assert!(e.is_dead());
}

#[test]
fn test_remote_world_skips_authoritative_work() {
    let mut world = GridWorld::new();
    world.set_remote(true);
    let mut e = spawn(EntityKind::Generic);
    e.set_fire(3);
    e.set_burning_flag(true);
    for _ in 0..2 {
        e.set_portal(BlockPos::new(0, 0, 0));
        e.base_tick(&mut world);
    }
    assert_eq!(e.fire_ticks(), 0);
    assert!(e.burning_flag());
    assert!(e.is_burning(&world));
    assert!(e.hooks.travels.is_empty());
}
