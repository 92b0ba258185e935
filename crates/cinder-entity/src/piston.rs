//! Per-tick accumulator limiting how far pistons can drag an entity.

use cinder_math::{Axis, DVec3};
use tracing::trace;

/// Cumulative piston displacement applied to one entity in the current
/// world tick, per axis.
///
/// The cache resets whenever a call arrives with a different world time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PistonDeltas {
    cumulative: [f64; 3],
    tick: i64,
}

impl PistonDeltas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a piston-driven `delta`.
    ///
    /// Only the first non-zero axis (X, then Y, then Z) is limited; its new
    /// cumulative value is held inside `[-limit, limit]` and the returned
    /// vector carries the difference from the previous cumulative value.
    /// Other components pass through unchanged. Returns `None` when the
    /// move should be skipped: the delta is all zero, or the applied part
    /// is within `epsilon` of zero.
    pub fn clamp(
        &mut self,
        world_time: i64,
        delta: DVec3,
        limit: f64,
        epsilon: f64,
    ) -> Option<DVec3> {
        if world_time != self.tick {
            self.cumulative = [0.0; 3];
            self.tick = world_time;
        }

        let axis = Axis::ALL
            .into_iter()
            .find(|axis| axis.component(delta) != 0.0)?;
        let i = axis.index();
        let previous = self.cumulative[i];
        let next = (previous + delta[i]).clamp(-limit, limit);
        self.cumulative[i] = next;

        let applied = next - previous;
        if applied.abs() <= epsilon {
            trace!(?axis, previous, "piston push saturated for this tick");
            return None;
        }

        let mut out = delta;
        out[i] = applied;
        Some(out)
    }

    /// Cumulative displacement on `axis` in the current tick.
    pub fn cumulative(&self, axis: Axis) -> f64 {
        self.cumulative[axis.index()]
    }

    /// World time of the last reset.
    pub fn tick(&self) -> i64 {
        self.tick
    }
}
