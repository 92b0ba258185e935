//! Sneak-edge creep: keeps a sneaking, grounded walker from stepping off ledges.

use cinder_math::{Aabb, DVec3};

use crate::world::World;

/// Shrink steps allowed per loop. A component still unsupported after this
/// many steps (or one too large for `step` to change) is dropped to zero.
pub const MAX_CREEP_STEPS: usize = 4096;

/// Back `delta` away from any ledge deeper than `step_height`.
///
/// X is reduced first, then Z, then both together for diagonal motion. Each
/// loop shrinks the component toward zero by `step` while the box, offset by
/// the candidate delta and dropped by `step_height`, finds nothing to stand
/// on; a component already inside `[-step, step)` snaps to zero. Each loop
/// gives up after [`MAX_CREEP_STEPS`] and zeroes what it was shrinking. The
/// vertical component is returned untouched.
pub fn creep_toward_edge<W: World + ?Sized>(
    world: &W,
    bb: &Aabb,
    delta: DVec3,
    step_height: f64,
    step: f64,
) -> DVec3 {
    let unsupported =
        |dx: f64, dz: f64| world.collision_boxes(&bb.offset(dx, -step_height, dz)).is_empty();

    let mut x = delta.x;
    let mut z = delta.z;

    let mut steps = 0;
    while x != 0.0 && unsupported(x, 0.0) {
        if steps == MAX_CREEP_STEPS {
            x = 0.0;
            break;
        }
        x = shrink_toward_zero(x, step);
        steps += 1;
    }

    steps = 0;
    while z != 0.0 && unsupported(0.0, z) {
        if steps == MAX_CREEP_STEPS {
            z = 0.0;
            break;
        }
        z = shrink_toward_zero(z, step);
        steps += 1;
    }

    steps = 0;
    while x != 0.0 && z != 0.0 && unsupported(x, z) {
        if steps == MAX_CREEP_STEPS {
            x = 0.0;
            z = 0.0;
            break;
        }
        x = shrink_toward_zero(x, step);
        z = shrink_toward_zero(z, step);
        steps += 1;
    }

    DVec3::new(x, delta.y, z)
}

fn shrink_toward_zero(value: f64, step: f64) -> f64 {
    if value < step && value >= -step {
        0.0
    } else if value > 0.0 {
        value - step
    } else {
        value + step
    }
}
