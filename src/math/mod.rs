//! Mathematical utilities and data structures

pub mod grid;
pub mod region;

pub use grid::{any_in_region, point_in_region, snap, snap_vector};
pub use region::{Axis, Region};
