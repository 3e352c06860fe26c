//! Partition tree builder: recursive grid-aligned splitting of the world bounds.
//!
//! Each pending region is handled in four steps:
//! 1. Both extents at or below the grid size: leaf.
//! 2. No active marker inside the region (Z ignored): pruned leaf, whatever
//!    its size.
//! 3. Exactly one extent above the grid size: split that axis only. Both
//!    children inherit the parent's marker list unfiltered.
//! 4. Both extents above the grid size: split on X, partition the markers
//!    into `x <= split` / `x > split`, then split each half on Y when it is
//!    still too tall and holds one of its own markers, partitioning again on
//!    `y <= split` / `y > split`.
//!
//! Split positions are `snap(low + extent / 2, grid, down)`, evaluated in whole
//! grid cells as `low + (cells / 2) * grid`. Pending regions
//! are kept on an explicit work stack instead of the call stack, so depth is
//! bounded only by memory.

use std::time::Instant;

use crate::core::types::DVec3;
use crate::core::Result;
use crate::math::{any_in_region, Axis, Region};
use super::bounds::{collect_bounds, validate_markers};
use super::config::TreeConfig;
use super::tree::{NodeId, PartitionTree};

/// A region waiting to be split, with the markers it is judged against.
type Pending = (NodeId, Vec<DVec3>);

/// Builds a [`PartitionTree`] from a marker set.
pub struct PartitionBuilder {
    grid_size: f64,
}

impl PartitionBuilder {
    /// Create a builder; fails if the configured grid size is not positive.
    pub fn new(config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { grid_size: config.grid_size })
    }

    /// Build a partition tree over `markers`.
    ///
    /// Fails on an empty or non-finite marker set. Duplicate markers are
    /// allowed and do not change the tree shape.
    pub fn build(&self, markers: &[DVec3]) -> Result<PartitionTree> {
        let start = Instant::now();
        validate_markers(markers)?;
        let bounds = collect_bounds(markers, self.grid_size)?;
        log::debug!(
            "Partitioning {} markers over {:?} .. {:?} (grid {})",
            markers.len(), bounds.low, bounds.high, self.grid_size
        );

        let mut tree = PartitionTree::new(bounds.low, bounds.high);
        let mut pending: Vec<Pending> = vec![(tree.root(), markers.to_vec())];
        while let Some((id, active)) = pending.pop() {
            self.split_node(&mut tree, id, active, &mut pending);
        }

        log::info!(
            "Built partition tree: {} nodes, {} leaves, depth {} in {:.3}s",
            tree.node_count(),
            tree.leaves().count(),
            tree.depth(),
            start.elapsed().as_secs_f64()
        );
        Ok(tree)
    }

    /// Extent of `region` on `axis` in whole grid cells.
    ///
    /// Region bounds are grid multiples, so the quotient is an integer up to
    /// rounding error.
    fn cells(&self, region: &Region, axis: Axis) -> i64 {
        (region.extent(axis) / self.grid_size).round() as i64
    }

    /// Split position on `axis`: half the extent from the low corner, snapped
    /// down to the grid. `None` when rounding would put it on or outside an
    /// edge of the region.
    fn split_position(&self, region: &Region, axis: Axis) -> Option<f64> {
        let low = region.low[axis.index()];
        let high = region.high[axis.index()];
        let position = low + (self.cells(region, axis) / 2) as f64 * self.grid_size;
        (position > low && position < high).then_some(position)
    }

    fn split_node(
        &self,
        tree: &mut PartitionTree,
        id: NodeId,
        markers: Vec<DVec3>,
        pending: &mut Vec<Pending>,
    ) {
        let region = tree.node(id).region;
        let narrow_x = self.cells(&region, Axis::X) <= 1;
        let narrow_y = self.cells(&region, Axis::Y) <= 1;

        if narrow_x && narrow_y {
            return;
        }
        if !any_in_region(&markers, &region) {
            return;
        }

        if narrow_x != narrow_y {
            let axis = if narrow_x { Axis::Y } else { Axis::X };
            let Some(position) = self.split_position(&region, axis) else {
                log::warn!("Region {:?} cannot be split on {:?}; kept as a leaf", region, axis);
                return;
            };
            let (left, right) = tree.split(id, axis, position);
            pending.push((right, markers.clone()));
            pending.push((left, markers));
            return;
        }

        let Some(x) = self.split_position(&region, Axis::X) else {
            log::warn!("Region {:?} cannot be split on X; kept as a leaf", region);
            return;
        };
        let (left, right) = tree.split(id, Axis::X, x);
        let (left_markers, right_markers): (Vec<DVec3>, Vec<DVec3>) =
            markers.into_iter().partition(|m| m.x <= x);

        // Right first so the left half is popped first
        self.split_half(tree, right, right_markers, pending);
        self.split_half(tree, left, left_markers, pending);
    }

    /// Second stage of a full split: divide an X half on Y if it still needs it.
    fn split_half(
        &self,
        tree: &mut PartitionTree,
        id: NodeId,
        markers: Vec<DVec3>,
        pending: &mut Vec<Pending>,
    ) {
        let region = tree.node(id).region;
        let tall = self.cells(&region, Axis::Y) > 1;
        let y = if tall && any_in_region(&markers, &region) {
            self.split_position(&region, Axis::Y)
        } else {
            None
        };
        if let Some(y) = y {
            let (low, high) = tree.split(id, Axis::Y, y);
            let (low_markers, high_markers): (Vec<DVec3>, Vec<DVec3>) =
                markers.into_iter().partition(|m| m.y <= y);
            pending.push((high, high_markers));
            pending.push((low, low_markers));
        } else {
            pending.push((id, markers));
        }
    }
}
