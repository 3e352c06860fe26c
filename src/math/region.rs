//! Axis-aligned region in double precision

use crate::core::types::DVec3;

/// Horizontal split axis. Z is carried through bounds but never split on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component index into a `DVec3`
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Axis-aligned box defined by `low` and `high` corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Region {
    pub low: DVec3,
    pub high: DVec3,
}

impl Region {
    /// Create region from low and high corners
    pub fn new(low: DVec3, high: DVec3) -> Self {
        Self { low, high }
    }

    /// Extent along X
    pub fn width(&self) -> f64 {
        self.high.x - self.low.x
    }

    /// Extent along Y
    pub fn height(&self) -> f64 {
        self.high.y - self.low.y
    }

    /// Extent along a split axis
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.height(),
        }
    }

    /// XY footprint area
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Return merged region containing both
    pub fn merged(&self, other: &Region) -> Region {
        Region {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }

    /// Divide at `position` on `axis`.
    ///
    /// The left half keeps `low` and clamps `high` to the split; the right half
    /// clamps `low`. Z is untouched.
    pub fn split(&self, axis: Axis, position: f64) -> (Region, Region) {
        let mut left = *self;
        let mut right = *self;
        match axis {
            Axis::X => {
                left.high.x = position;
                right.low.x = position;
            }
            Axis::Y => {
                left.high.y = position;
                right.low.y = position;
            }
        }
        (left, right)
    }
}
