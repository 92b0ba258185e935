//! End-to-end tick scenarios driving entities through a `GridWorld`.

use cinder_block::{Block, BlockState};
use cinder_config::SimulationConfig;
use cinder_entity::{
    DamageSource, Entity, EntityHooks, EntityKind, EntitySnapshot, EntityTable, GridWorld,
    MoverType, SimulationFault,
};
use cinder_math::{BlockPos, DVec3};

#[derive(Clone, Debug, Default)]
struct Recorder {
    attacks: Vec<(DamageSource, f32)>,
    falls: Vec<(f32, f32)>,
}

impl EntityHooks for Recorder {
    fn attack(&mut self, source: DamageSource, amount: f32) -> bool {
        self.attacks.push((source, amount));
        true
    }

    fn fall(&mut self, distance: f32, multiplier: f32) {
        self.falls.push((distance, multiplier));
    }
}

fn plain(min: BlockPos, max: BlockPos) -> GridWorld {
    let mut world = GridWorld::new();
    world.fill(min, max, BlockState::of(Block::Stone));
    world
}

/// One tick of a simple falling body: environment pass, move, gravity.
fn step(entity: &mut Entity<Recorder>, world: &mut GridWorld) -> Result<(), SimulationFault> {
    entity.base_tick(world);
    let delta = entity.motion;
    entity.move_entity(world, MoverType::SelfDriven, delta)?;
    entity.motion.y = (entity.motion.y - 0.08) * 0.98;
    world.advance_tick();
    Ok(())
}

#[test]
fn walking_into_a_wall_leaves_the_exact_gap() {
    let mut world = plain(BlockPos::new(-4, -1, -4), BlockPos::new(4, -1, 4));
    world.fill(
        BlockPos::new(2, 0, -4),
        BlockPos::new(2, 1, 4),
        BlockState::of(Block::Stone),
    );
    let mut table: EntityTable<Recorder> = EntityTable::new(SimulationConfig::default());
    let id = table.spawn(EntityKind::Player);
    let player = table.get_mut(id).unwrap();
    player.set_location_and_angles(DVec3::new(0.5, 0.0, 0.5), 0.0, 0.0);

    for _ in 0..20 {
        player.motion.x = 0.2;
        step(player, &mut world).unwrap();
    }
    assert!((player.bounding_box().max.x - 2.0).abs() < 1e-9);
    assert!(player.collided_horizontally);
    assert_eq!(player.motion.x, 0.0);
    assert!(player.on_ground);
}

#[test]
fn falling_body_lands_once_with_total_distance() {
    let mut world = plain(BlockPos::new(-2, -1, -2), BlockPos::new(2, -1, 2));
    let mut table: EntityTable<Recorder> = EntityTable::new(SimulationConfig::default());
    let id = table.spawn(EntityKind::LivingBase);
    let mob = table.get_mut(id).unwrap();
    mob.set_location_and_angles(DVec3::new(0.5, 10.0, 0.5), 0.0, 0.0);

    for _ in 0..60 {
        step(mob, &mut world).unwrap();
    }
    assert!(mob.on_ground);
    assert_eq!(mob.pos.y, 0.0);
    assert_eq!(mob.hooks.falls.len(), 1);
    let (distance, multiplier) = mob.hooks.falls[0];
    // The landing segment itself is not counted.
    assert!(distance > 8.0 && distance < 10.0, "distance = {distance}");
    assert_eq!(multiplier, 1.0);
}

#[test]
fn one_touch_of_fire_burns_for_eight_seconds() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(0, 0, 0), BlockState::of(Block::Fire));
    let mut entity = Entity::with_hooks(
        cinder_entity::EntityId(1),
        EntityKind::Generic,
        SimulationConfig::default(),
        Recorder::default(),
    );
    entity.no_gravity = true;
    entity.set_position(DVec3::new(0.5, 0.0, 0.5));
    entity
        .move_entity(&mut world, MoverType::SelfDriven, DVec3::ZERO)
        .unwrap();
    assert_eq!(entity.fire_ticks(), 160);

    entity.set_position(DVec3::new(5.5, 0.0, 0.5));
    entity.hooks.attacks.clear();
    let mut burning_ticks = 0;
    while entity.fire_ticks() > 0 {
        entity.base_tick(&mut world);
        entity
            .move_entity(&mut world, MoverType::SelfDriven, DVec3::ZERO)
            .unwrap();
        burning_ticks += 1;
    }
    assert_eq!(burning_ticks, 160);
    assert_eq!(entity.fire_ticks(), -1);
    let on_fire = entity
        .hooks
        .attacks
        .iter()
        .filter(|(source, _)| *source == DamageSource::OnFire)
        .count();
    assert_eq!(on_fire, 8);
}

#[test]
fn water_resets_fire_to_baseline() {
    let mut world = GridWorld::new();
    world.set_block(BlockPos::new(3, 0, 0), BlockState::of(Block::Water));
    let mut entity = Entity::with_hooks(
        cinder_entity::EntityId(2),
        EntityKind::Player,
        SimulationConfig::default(),
        Recorder::default(),
    );
    entity.set_position(DVec3::new(0.5, 0.0, 0.5));
    entity.base_tick(&mut world);
    entity.set_fire(8);
    assert!(entity.is_burning(&world));

    entity.set_position(DVec3::new(3.5, 0.0, 0.5));
    entity.base_tick(&mut world);
    entity
        .move_entity(&mut world, MoverType::SelfDriven, DVec3::ZERO)
        .unwrap();
    assert!(entity.is_in_water());
    assert!(!entity.is_burning(&world));
    assert_eq!(entity.fire_ticks(), -20);
}

#[test]
fn snapshot_survives_a_save_file() {
    let mut world = plain(BlockPos::new(-2, -1, -2), BlockPos::new(2, -1, 2));
    let config = SimulationConfig::default();
    let mut table: EntityTable = EntityTable::new(config.clone());
    let id = table.spawn(EntityKind::Player);
    let player = table.get_mut(id).unwrap();
    player.set_location_and_angles(DVec3::new(0.5, 3.0, 0.5), 45.0, 10.0);
    player.set_fire(2);
    player.base_tick(&mut world);
    player
        .move_entity(&mut world, MoverType::SelfDriven, DVec3::new(0.0, -1.0, 0.0))
        .unwrap();

    let saved = ron::ser::to_string_pretty(&player.snapshot(), ron::ser::PrettyConfig::default())
        .unwrap();
    let loaded: EntitySnapshot = ron::from_str(&saved).unwrap();

    let mut other: EntityTable = EntityTable::new(config);
    let copy_id = other.spawn(EntityKind::Player);
    let copy = other.get_mut(copy_id).unwrap();
    copy.restore(&loaded).unwrap();

    let original = table.get(id).unwrap();
    assert_eq!(copy.pos, original.pos);
    let (restored, saved_bb) = (copy.bounding_box(), original.bounding_box());
    assert!((restored.max.y - saved_bb.max.y).abs() < 1e-9);
    assert_eq!(copy.fall_distance, original.fall_distance);
    assert_eq!(copy.fire_ticks(), original.fire_ticks());
    assert_eq!(copy.yaw, 45.0);
}

#[test]
fn faulty_block_aborts_the_update() {
    let mut world = plain(BlockPos::new(-2, -1, -2), BlockPos::new(2, -1, 2));
    world.mark_faulty(BlockPos::new(1, 0, 0));
    let mut table: EntityTable<Recorder> = EntityTable::new(SimulationConfig::default());
    let id = table.spawn(EntityKind::Player);
    let player = table.get_mut(id).unwrap();
    player.set_location_and_angles(DVec3::new(0.5, 0.0, 0.5), 0.0, 0.0);

    let err = player
        .move_entity(&mut world, MoverType::Player, DVec3::new(0.5, 0.0, 0.0))
        .unwrap_err();
    assert_eq!(err.to_string(), "simulation faulted: Checking entity block collision");
    let text = err.report().to_string();
    assert!(text.contains("-- Block being collided with --"));
    assert!(text.contains("Block location: (1, 0, 0)"));
    assert!(text.contains("-- Entity being checked for collision --"));
    // The move itself happened; only the callbacks were cut short.
    assert!((player.pos.x - 1.0).abs() < 1e-9);
}

#[test]
fn riders_follow_their_vehicle() {
    let mut world = plain(BlockPos::new(-4, -1, -4), BlockPos::new(4, -1, 4));
    let mut table: EntityTable = EntityTable::new(SimulationConfig::default());
    let rider = table.spawn(EntityKind::Player);
    let mount = table.spawn(EntityKind::LivingBase);
    assert!(table.start_riding(rider, mount, false));

    for _ in 0..5 {
        table.tick(mount, &mut world);
        let vehicle = table.get_mut(mount).unwrap();
        vehicle
            .move_entity(&mut world, MoverType::SelfDriven, DVec3::new(0.25, -0.08, 0.0))
            .unwrap();
        table.tick_ridden(rider, &mut world);
    }

    let vehicle_pos = table.get(mount).unwrap().pos;
    let rider_pos = table.get(rider).unwrap().pos;
    assert!((vehicle_pos.x - 1.25).abs() < 1e-9);
    assert_eq!(rider_pos.x, vehicle_pos.x);
    assert!((rider_pos.y - 1.8 * 0.75).abs() < 1e-6);

    table.dismount(rider);
    assert!(!table.start_riding(rider, mount, false));
}
