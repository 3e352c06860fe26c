//! Partition tree arena.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. The root
//! is always node 0. Splitting a node appends its two children; nothing is
//! ever removed, so ids stay stable for the lifetime of the tree.

use std::fmt;

use crate::core::types::DVec3;
use crate::math::{Axis, Region};

/// Index of a node in the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: Self = Self(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Where and along which axis a node is divided.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub axis: Axis,
    pub position: f64,
}

/// A single region of the partition.
///
/// A node is a leaf iff `split` is `None`, in which case `children` is `None`
/// as well.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionNode {
    pub region: Region,
    pub split: Option<Split>,
    pub parent: Option<NodeId>,
    /// (left, right); left holds the low side of the split
    pub children: Option<(NodeId, NodeId)>,
}

impl PartitionNode {
    fn leaf(region: Region, parent: Option<NodeId>) -> Self {
        Self {
            region,
            split: None,
            parent,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn split_axis(&self) -> Option<Axis> {
        self.split.map(|s| s.axis)
    }

    pub fn split_position(&self) -> Option<f64> {
        self.split.map(|s| s.position)
    }

    pub fn left(&self) -> Option<NodeId> {
        self.children.map(|(l, _)| l)
    }

    pub fn right(&self) -> Option<NodeId> {
        self.children.map(|(_, r)| r)
    }
}

/// Binary partition of the grid-snapped world bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
    world_min: DVec3,
    world_max: DVec3,
}

impl PartitionTree {
    /// Create a tree holding only the root leaf spanning the world bounds.
    pub fn new(world_min: DVec3, world_max: DVec3) -> Self {
        Self {
            nodes: vec![PartitionNode::leaf(Region::new(world_min, world_max), None)],
            world_min,
            world_max,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn world_min(&self) -> DVec3 {
        self.world_min
    }

    pub fn world_max(&self) -> DVec3 {
        self.world_max
    }

    pub fn world_region(&self) -> Region {
        Region::new(self.world_min, self.world_max)
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id.index()]
    }

    /// All node ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Leaf node ids in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|id| self.node(*id).is_leaf())
    }

    /// Divide a leaf at `position` on `axis`, returning (left, right).
    ///
    /// Panics if `id` is already split; the builder only splits fresh leaves.
    pub(crate) fn split(&mut self, id: NodeId, axis: Axis, position: f64) -> (NodeId, NodeId) {
        assert!(self.node(id).is_leaf(), "node {:?} is already split", id);

        let (left_region, right_region) = self.node(id).region.split(axis, position);
        let left = NodeId(self.nodes.len() as u32);
        let right = NodeId(left.0 + 1);
        self.nodes.push(PartitionNode::leaf(left_region, Some(id)));
        self.nodes.push(PartitionNode::leaf(right_region, Some(id)));

        let node = &mut self.nodes[id.index()];
        node.split = Some(Split { axis, position });
        node.children = Some((left, right));
        (left, right)
    }

    /// Node ids in pre-order: self, left subtree, right subtree.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some((left, right)) = self.node(id).children {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }

    /// Size of the subtree rooted at `id`, including `id` itself.
    pub fn children_count(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            count += 1;
            if let Some((left, right)) = self.node(id).children {
                stack.push(left);
                stack.push(right);
            }
        }
        count
    }

    /// Subtree sizes for every node, indexed by arena position.
    pub(crate) fn subtree_sizes(&self, preorder: &[NodeId]) -> Vec<usize> {
        let mut sizes = vec![1usize; self.nodes.len()];
        // Children always follow their parent in pre-order
        for id in preorder.iter().rev() {
            if let Some((left, right)) = self.node(*id).children {
                sizes[id.index()] += sizes[left.index()] + sizes[right.index()];
            }
        }
        sizes
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some((left, right)) = self.node(id).children {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Rebuild from a pre-order arena; used by record import.
    pub(crate) fn from_nodes(world_min: DVec3, world_max: DVec3, nodes: Vec<PartitionNode>) -> Self {
        Self { nodes, world_min, world_max }
    }
}

impl fmt::Display for PartitionTree {
    /// One line per split node, in pre-order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.preorder();
        let sizes = self.subtree_sizes(&order);
        for id in order {
            let node = self.node(id);
            let (Some(split), Some((left, right))) = (node.split, node.children) else {
                continue;
            };
            let parent = match node.parent {
                Some(p) => format!("{:>6}", p.0),
                None => "  ROOT".to_string(),
            };
            writeln!(
                f,
                "node #{:<6} parent = {}  lc = {}, rc = {}  split = {:?} @ {}  subtree = {}  bounds = ({:?}, {:?})",
                id.0,
                parent,
                left.0,
                right.0,
                split.axis,
                split.position,
                sizes[id.index()],
                node.region.low.to_array(),
                node.region.high.to_array(),
            )?;
        }
        Ok(())
    }
}
