//! Swept box collision against static obstacles, and the step-up retry.
//!
//! Resolution is axis by axis in the fixed order Y, X, Z against a single
//! obstacle list gathered for the whole swept region. Vertical first means the
//! horizontal passes see the corrected floor and ceiling.

use cinder_math::{Aabb, DVec3};

use crate::world::World;

/// Outcome of a collision pass: the achieved delta and the moved box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved {
    pub delta: DVec3,
    pub bb: Aabb,
}

impl Resolved {
    fn horizontal_sq(&self) -> f64 {
        self.delta.x * self.delta.x + self.delta.z * self.delta.z
    }
}

fn clamp_y(obstacles: &[Aabb], bb: &Aabb, dy: f64) -> f64 {
    obstacles
        .iter()
        .fold(dy, |dy, obstacle| obstacle.calculate_y_offset(bb, dy))
}

fn clamp_x(obstacles: &[Aabb], bb: &Aabb, dx: f64) -> f64 {
    obstacles
        .iter()
        .fold(dx, |dx, obstacle| obstacle.calculate_x_offset(bb, dx))
}

fn clamp_z(obstacles: &[Aabb], bb: &Aabb, dz: f64) -> f64 {
    obstacles
        .iter()
        .fold(dz, |dz, obstacle| obstacle.calculate_z_offset(bb, dz))
}

/// Move `bb` by at most `delta`, stopping at `obstacles`, in Y, X, Z order.
///
/// Each achieved component has the sign of the requested one and never a
/// larger magnitude.
pub fn resolve_axes(obstacles: &[Aabb], bb: Aabb, delta: DVec3) -> Resolved {
    let dy = clamp_y(obstacles, &bb, delta.y);
    let mut bb = bb.offset(0.0, dy, 0.0);

    let mut dx = delta.x;
    if dx != 0.0 {
        dx = clamp_x(obstacles, &bb, dx);
        if dx != 0.0 {
            bb = bb.offset(dx, 0.0, 0.0);
        }
    }

    let mut dz = delta.z;
    if dz != 0.0 {
        dz = clamp_z(obstacles, &bb, dz);
        if dz != 0.0 {
            bb = bb.offset(0.0, 0.0, dz);
        }
    }

    Resolved {
        delta: DVec3::new(dx, dy, dz),
        bb,
    }
}

/// Whether a flat resolution should be retried as a step up.
///
/// Requires a step height, horizontal motion that was cut short, and an
/// entity that is either grounded or had its downward motion stopped.
pub fn should_step_up(step_height: f64, on_ground: bool, requested: DVec3, flat: DVec3) -> bool {
    let landed = requested.y != flat.y && requested.y < 0.0;
    step_height > 0.0 && (on_ground || landed) && (requested.x != flat.x || requested.z != flat.z)
}

/// Retry a blocked horizontal move by lifting the box up to `step_height`.
///
/// Two lifted paths are tried from `start_bb`: one whose lift is limited by
/// ceilings over the whole horizontal sweep, and one limited only above the
/// starting footprint. The path covering more horizontal distance is lowered
/// back onto whatever it stepped on. If the flat result already covers at
/// least as much ground, it is returned unchanged.
///
/// The returned `delta.y` is the final vertical resolution (the settle), not
/// the net height change; the box carries the net position.
pub fn step_up<W: World + ?Sized>(
    world: &W,
    start_bb: Aabb,
    requested: DVec3,
    flat: Resolved,
    step_height: f64,
) -> Resolved {
    let (dx, dz) = (requested.x, requested.z);
    let obstacles = world.collision_boxes(&start_bb.expand(dx, step_height, dz));

    let sweep = start_bb.expand(dx, 0.0, dz);
    let swept_lift = clamp_y(&obstacles, &sweep, step_height);
    let swept = horizontal_after_lift(&obstacles, start_bb, swept_lift, dx, dz);

    let plain_lift = clamp_y(&obstacles, &start_bb, step_height);
    let plain = horizontal_after_lift(&obstacles, start_bb, plain_lift, dx, dz);

    let (chosen, lift) = if swept.horizontal_sq() > plain.horizontal_sq() {
        (swept, swept_lift)
    } else {
        (plain, plain_lift)
    };

    let settle = clamp_y(&obstacles, &chosen.bb, -lift);
    let stepped = Resolved {
        delta: DVec3::new(chosen.delta.x, settle, chosen.delta.z),
        bb: chosen.bb.offset(0.0, settle, 0.0),
    };

    if flat.horizontal_sq() >= stepped.horizontal_sq() {
        flat
    } else {
        stepped
    }
}

fn horizontal_after_lift(obstacles: &[Aabb], start_bb: Aabb, lift: f64, dx: f64, dz: f64) -> Resolved {
    let bb = start_bb.offset(0.0, lift, 0.0);
    let dx = clamp_x(obstacles, &bb, dx);
    let bb = bb.offset(dx, 0.0, 0.0);
    let dz = clamp_z(obstacles, &bb, dz);
    Resolved {
        delta: DVec3::new(dx, lift, dz),
        bb: bb.offset(0.0, 0.0, dz),
    }
}

#[cfg(test)]
#[path = "collision_tests.rs"]
mod tests;
