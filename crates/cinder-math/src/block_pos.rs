use std::fmt;

use glam::DVec3;

use crate::floor;

/// Integer coordinates of a block cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Create a new BlockPos with the given coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell containing `p` (each component floored).
    pub fn floored(p: DVec3) -> Self {
        Self::new(floor(p.x), floor(p.y), floor(p.z))
    }

    /// Neighbouring cell; saturates at the edge of the `i32` range.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.z.saturating_add(dz),
        )
    }

    pub fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    pub fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// Minimum corner of the cell as a float vector.
    pub fn as_dvec3(self) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64)
    }

    /// Center of the cell.
    pub fn center(self) -> DVec3 {
        self.as_dvec3() + DVec3::splat(0.5)
    }

    /// Iterate every cell in the inclusive range `min..=max`, X fastest.
    ///
    /// Yields nothing if any component of `min` exceeds `max`.
    pub fn iter_span(min: BlockPos, max: BlockPos) -> impl Iterator<Item = BlockPos> {
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y)
                .flat_map(move |y| (min.x..=max.x).map(move |x| BlockPos::new(x, y, z)))
        })
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three world axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in a 3-element array.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Component of `v` along this axis.
    pub fn component(self, v: DVec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// A vector that is `value` along this axis and zero elsewhere.
    pub fn unit_scaled(self, value: f64) -> DVec3 {
        match self {
            Axis::X => DVec3::new(value, 0.0, 0.0),
            Axis::Y => DVec3::new(0.0, value, 0.0),
            Axis::Z => DVec3::new(0.0, 0.0, value),
        }
    }
}
