use glam::DVec3;

use crate::BlockPos;

/// Axis-Aligned Bounding Box in f64 block space.
///
/// Invariant: min.x <= max.x, min.y <= max.y, min.z <= max.z.
/// [`Aabb::new`] enforces this by sorting components; the transforms below
/// preserve it for non-negative growth. Every transform returns a new box.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    /// Create an AABB from two corners given as six coordinates.
    /// Automatically sorts components so that min <= max on every axis.
    pub fn new(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Self {
            min: DVec3::new(x1.min(x2), y1.min(y2), z1.min(z2)),
            max: DVec3::new(x1.max(x2), y1.max(y2), z1.max(z2)),
        }
    }

    /// Create an AABB from corners that are already ordered.
    pub const fn from_min_max(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// The unit cube occupying the block cell at `pos`.
    pub fn from_block(pos: BlockPos) -> Self {
        let min = pos.as_dvec3();
        Self {
            min,
            max: min + DVec3::ONE,
        }
    }

    /// Translate all six coordinates.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        self.offset_vec(DVec3::new(dx, dy, dz))
    }

    /// Translate by a vector.
    #[must_use]
    pub fn offset_vec(&self, delta: DVec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Grow the box toward the sign of each delta only.
    ///
    /// A positive `dx` moves `max.x`, a negative `dx` moves `min.x`, zero
    /// leaves the axis untouched. Used to build the swept query region of a
    /// candidate motion.
    #[must_use]
    pub fn expand(&self, dx: f64, dy: f64, dz: f64) -> Self {
        let mut out = *self;

        if dx < 0.0 {
            out.min.x += dx;
        } else if dx > 0.0 {
            out.max.x += dx;
        }

        if dy < 0.0 {
            out.min.y += dy;
        } else if dy > 0.0 {
            out.max.y += dy;
        }

        if dz < 0.0 {
            out.min.z += dz;
        } else if dz > 0.0 {
            out.max.z += dz;
        }

        out
    }

    /// Grow symmetrically on both faces of each axis.
    #[must_use]
    pub fn grow(&self, dx: f64, dy: f64, dz: f64) -> Self {
        let d = DVec3::new(dx, dy, dz);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Grow every face by `d`.
    #[must_use]
    pub fn grow_all(&self, d: f64) -> Self {
        self.grow(d, d, d)
    }

    /// Pull every face inward by `d`.
    #[must_use]
    pub fn shrink(&self, d: f64) -> Self {
        self.grow_all(-d)
    }

    /// Strict overlap test: touching faces do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }


    /// Returns the center point of the box.
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Mean of the three edge lengths.
    pub fn average_edge_length(&self) -> f64 {
        let size = self.max - self.min;
        (size.x + size.y + size.z) / 3.0
    }

    /// Clamp `dx` so that `entity`, moved along X, stops at this obstacle.
    ///
    /// `entity` is assumed to already sit at its final Y and Z. If the two
    /// boxes do not overlap on Y and Z the delta is returned unchanged.
    /// The result keeps the sign of `dx` and never grows in magnitude.
    pub fn calculate_x_offset(&self, entity: &Aabb, mut dx: f64) -> f64 {
        if entity.max.y <= self.min.y
            || entity.min.y >= self.max.y
            || entity.max.z <= self.min.z
            || entity.min.z >= self.max.z
        {
            return dx;
        }

        if dx > 0.0 && entity.max.x <= self.min.x {
            let gap = self.min.x - entity.max.x;
            if gap < dx {
                dx = gap;
            }
        } else if dx < 0.0 && entity.min.x >= self.max.x {
            let gap = self.max.x - entity.min.x;
            if gap > dx {
                dx = gap;
            }
        }

        dx
    }

    /// Clamp `dy` so that `entity`, moved along Y, stops at this obstacle.
    ///
    /// See [`Aabb::calculate_x_offset`]; the overlap test runs on X and Z.
    pub fn calculate_y_offset(&self, entity: &Aabb, mut dy: f64) -> f64 {
        if entity.max.x <= self.min.x
            || entity.min.x >= self.max.x
            || entity.max.z <= self.min.z
            || entity.min.z >= self.max.z
        {
            return dy;
        }

        if dy > 0.0 && entity.max.y <= self.min.y {
            let gap = self.min.y - entity.max.y;
            if gap < dy {
                dy = gap;
            }
        } else if dy < 0.0 && entity.min.y >= self.max.y {
            let gap = self.max.y - entity.min.y;
            if gap > dy {
                dy = gap;
            }
        }

        dy
    }

    /// Clamp `dz` so that `entity`, moved along Z, stops at this obstacle.
    ///
    /// See [`Aabb::calculate_x_offset`]; the overlap test runs on X and Y.
    pub fn calculate_z_offset(&self, entity: &Aabb, mut dz: f64) -> f64 {
        if entity.max.x <= self.min.x
            || entity.min.x >= self.max.x
            || entity.max.y <= self.min.y
            || entity.min.y >= self.max.y
        {
            return dz;
        }

        if dz > 0.0 && entity.max.z <= self.min.z {
            let gap = self.min.z - entity.max.z;
            if gap < dz {
                dz = gap;
            }
        } else if dz < 0.0 && entity.min.z >= self.max.z {
            let gap = self.max.z - entity.min.z;
            if gap > dz {
                dz = gap;
            }
        }

        dz
    }

    /// Inclusive range of block cells this box touches, suitable for
    /// material scans: `floor(min)` to `ceil(max) - 1` on every axis.
    pub fn block_span(&self) -> (BlockPos, BlockPos) {
        let min = BlockPos::floored(self.min);
        let max = BlockPos::new(
            (self.max.x.ceil() as i32).saturating_sub(1),
            (self.max.y.ceil() as i32).saturating_sub(1),
            (self.max.z.ceil() as i32).saturating_sub(1),
        );
        (min, max)
    }
}
