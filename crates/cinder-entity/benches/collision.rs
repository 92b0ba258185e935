use cinder_block::{Block, BlockState};
use cinder_config::SimulationConfig;
use cinder_entity::collision::resolve_axes;
use cinder_entity::{Entity, EntityId, EntityKind, GridWorld, MoverType, World};
use cinder_math::{Aabb, BlockPos, DVec3};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn floor_with_wall() -> GridWorld {
    let mut world = GridWorld::new();
    world.fill(
        BlockPos::new(-8, -1, -8),
        BlockPos::new(8, -1, 8),
        BlockState::of(Block::Stone),
    );
    world.fill(
        BlockPos::new(3, 0, -8),
        BlockPos::new(3, 2, 8),
        BlockState::of(Block::Stone),
    );
    world
}

fn bench_resolve_axes(c: &mut Criterion) {
    let world = floor_with_wall();
    let start = Aabb::new(0.2, 0.0, 0.2, 0.8, 1.8, 0.8);
    let delta = DVec3::new(2.5, -0.0784, 0.7);
    let obstacles = world.collision_boxes(&start.expand(delta.x, delta.y, delta.z));
    c.bench_function("resolve_axes_wall", |bencher| {
        bencher.iter(|| resolve_axes(black_box(&obstacles), black_box(start), black_box(delta)))
    });
}

fn bench_move_entity(c: &mut Criterion) {
    let mut world = floor_with_wall();
    let mut entity = Entity::new(EntityId(0), EntityKind::Player, SimulationConfig::default());
    c.bench_function("move_entity_walk", |bencher| {
        bencher.iter(|| {
            entity.set_position(DVec3::new(0.5, 0.0, 0.5));
            entity.on_ground = true;
            entity
                .move_entity(&mut world, MoverType::SelfDriven, black_box(DVec3::new(0.2, -0.0784, 0.1)))
                .ok();
            black_box(entity.pos)
        })
    });
}

criterion_group!(benches, bench_resolve_axes, bench_move_entity);
criterion_main!(benches);
