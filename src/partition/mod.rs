//! World partition tree: a grid-aligned binary split of a level's XY footprint.
//!
//! Markers scattered over a level drive where the tree needs resolution.
//! The world bounds are snapped outwards to the grid, then split alternately
//! on X and Y until every region is at most one grid cell, except regions
//! that hold no markers, which are left whole.

pub mod bounds;
pub mod builder;
pub mod config;
pub mod tree;

pub use bounds::{collect_bounds, validate_markers};
pub use builder::PartitionBuilder;
pub use config::{TreeConfig, DEFAULT_GRID_SIZE};
pub use tree::{NodeId, PartitionNode, PartitionTree, Split};
