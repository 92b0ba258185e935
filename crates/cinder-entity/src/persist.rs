//! Saving and restoring the persistent part of an entity.

use serde::{Deserialize, Serialize};

use cinder_math::DVec3;

use crate::entity::Entity;
use crate::error::SnapshotError;
use crate::hooks::EntityHooks;

/// The persistent state of an entity.
///
/// Transient per-tick state (collision flags, walk counters, the piston
/// cache, riding edges) is not part of it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub pos: [f64; 3],
    pub motion: [f64; 3],
    /// Yaw then pitch, in degrees.
    pub rotation: [f32; 2],
    pub fall_distance: f32,
    pub fire: i32,
    pub air: i32,
    pub on_ground: bool,
    pub dimension: i32,
    pub invulnerable: bool,
    pub portal_cooldown: i32,
    #[serde(default)]
    pub silent: bool,
    #[serde(default)]
    pub no_gravity: bool,
}

impl<H: EntityHooks> Entity<H> {
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            pos: self.pos.to_array(),
            motion: self.motion.to_array(),
            rotation: [self.yaw, self.pitch],
            fall_distance: self.fall_distance,
            fire: self.fire,
            air: self.air,
            on_ground: self.on_ground,
            dimension: self.dimension,
            invulnerable: self.invulnerable,
            portal_cooldown: self.time_until_portal,
            silent: self.silent,
            no_gravity: self.no_gravity,
        }
    }

    /// Load `snapshot` into this entity.
    ///
    /// Motion components larger than `max_motion_on_load` are dropped. The
    /// previous-tick position and rotation are reset to the loaded values so
    /// nothing interpolates from the old state. Nothing is changed when the
    /// position or rotation is not finite.
    ///
    /// Yaw and pitch are reduced modulo 360 on load, so a yaw of 600 comes
    /// back as 240. The previous-tick rotation keeps the unreduced value.
    pub fn restore(&mut self, snapshot: &EntitySnapshot) -> Result<(), SnapshotError> {
        let pos = DVec3::from_array(snapshot.pos);
        if !pos.is_finite() {
            return Err(SnapshotError::InvalidPosition);
        }
        let [yaw, pitch] = snapshot.rotation;
        if !yaw.is_finite() || !pitch.is_finite() {
            return Err(SnapshotError::InvalidRotation);
        }

        let limit = self.config.max_motion_on_load;
        let keep = |v: f64| if v.abs() <= limit { v } else { 0.0 };
        let [mx, my, mz] = snapshot.motion;
        self.motion = DVec3::new(keep(mx), keep(my), keep(mz));

        self.pos = pos;
        self.prev_pos = pos;
        self.last_tick_pos = pos;
        self.yaw = yaw;
        self.pitch = pitch;
        self.prev_yaw = yaw;
        self.prev_pitch = pitch;

        self.fall_distance = snapshot.fall_distance;
        self.fire = snapshot.fire;
        self.air = snapshot.air;
        self.on_ground = snapshot.on_ground;
        self.dimension = snapshot.dimension;
        self.invulnerable = snapshot.invulnerable;
        self.time_until_portal = snapshot.portal_cooldown;
        self.silent = snapshot.silent;
        self.no_gravity = snapshot.no_gravity;

        self.set_position(pos);
        self.set_rotation(yaw, pitch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EntityKind;
    use crate::id::EntityId;
    use cinder_config::SimulationConfig;

    fn entity() -> Entity {
        Entity::new(EntityId(1), EntityKind::LivingBase, SimulationConfig::default())
    }

    fn sample() -> EntitySnapshot {
        EntitySnapshot {
            pos: [10.5, 64.0, -3.25],
            motion: [0.1, -0.08, 0.0],
            rotation: [90.0, 15.0],
            fall_distance: 2.5,
            fire: 40,
            air: 300,
            on_ground: false,
            dimension: -1,
            invulnerable: true,
            portal_cooldown: 120,
            silent: true,
            no_gravity: false,
        }
    }

    #[test]
    fn test_restore_applies_fields() {
        let mut e = entity();
        e.restore(&sample()).unwrap();
        assert_eq!(e.pos, DVec3::new(10.5, 64.0, -3.25));
        assert_eq!(e.prev_pos, e.pos);
        assert_eq!(e.last_tick_pos, e.pos);
        assert_eq!(e.bounding_box().min.y, 64.0);
        assert_eq!(e.fire_ticks(), 40);
        assert_eq!(e.time_until_portal(), 120);
        assert_eq!(e.dimension, -1);
        assert_eq!(e.yaw, 90.0);
        assert_eq!(e.prev_pitch, 15.0);
        assert!(e.silent && e.invulnerable);
    }

    #[test]
    fn test_restore_drops_excessive_motion() {
        let mut e = entity();
        let mut snap = sample();
        snap.motion = [12.0, -0.5, f64::NAN];
        e.restore(&snap).unwrap();
        assert_eq!(e.motion, DVec3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_restore_rejects_non_finite() {
        let mut e = entity();
        let mut snap = sample();
        snap.pos[1] = f64::INFINITY;
        assert_eq!(e.restore(&snap), Err(SnapshotError::InvalidPosition));
        assert_eq!(e.pos, DVec3::ZERO);

        let mut snap = sample();
        snap.rotation[0] = f32::NAN;
        assert_eq!(e.restore(&snap), Err(SnapshotError::InvalidRotation));
    }

    #[test]
    fn test_long_fire_and_air_survive_restore() {
        let mut e = entity();
        e.set_fire(2000);
        e.air = 70_000;
        let mut copy = entity();
        copy.restore(&e.snapshot()).unwrap();
        assert_eq!(copy.fire_ticks(), 40_000);
        assert_eq!(copy.air, 70_000);
        assert_eq!(copy.snapshot(), e.snapshot());
    }

    #[test]
    fn test_restore_wraps_rotation() {
        let mut e = entity();
        let mut snap = sample();
        snap.rotation = [600.0, -15.0];
        e.restore(&snap).unwrap();
        assert_eq!(e.yaw, 240.0);
        assert_eq!(e.pitch, -15.0);
        assert_eq!(e.prev_yaw, 600.0);
    }

    #[test]
    fn test_snapshot_ron_round_trip() {
        let mut e = entity();
        e.restore(&sample()).unwrap();
        let text = ron::to_string(&e.snapshot()).unwrap();
        let parsed: EntitySnapshot = ron::from_str(&text).unwrap();

        let mut other = entity();
        other.restore(&parsed).unwrap();
        assert_eq!(other.snapshot(), e.snapshot());
    }

    #[test]
    fn test_missing_optional_flags_default() {
        let text = "(pos: (0.0, 1.0, 0.0), motion: (0.0, 0.0, 0.0), rotation: (0.0, 0.0), \
                    fall_distance: 0.0, fire: -1, air: 300, on_ground: true, dimension: 0, \
                    invulnerable: false, portal_cooldown: 0)";
        let snap: EntitySnapshot = ron::from_str(text).unwrap();
        assert!(!snap.silent && !snap.no_gravity);
    }
}
