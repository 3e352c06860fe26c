//! Pre-order record layout of a partition tree, as consumed by the engine.
//!
//! Every node becomes one [`NodeRecord`] in pre-order (self, left subtree,
//! right subtree). `ChildCount` is the number of descendants, so a reader can
//! skip a subtree without following links, and `ParentOffset` is the signed
//! distance back to the parent record (0 at the root).
//!
//! The engine stores vectors as (x, z, y) relative to the editor. Split axis Y
//! is therefore written as engine axis 2 and world bounds are swizzled on the
//! way out. Positions are written as-is.

use serde::{Deserialize, Serialize, Serializer};

use crate::core::types::DVec3;
use crate::core::{Error, Result};
use crate::math::{Axis, Region};
use crate::partition::{NodeId, PartitionNode, PartitionTree, Split};

/// `Axis` value written for leaves.
pub const LEAF_AXIS: i32 = -1;
/// `Position` value written for leaves.
pub const LEAF_POSITION: f64 = -1.0;

/// Engine axis code for an editor split axis.
pub fn engine_axis(axis: Axis) -> i32 {
    match axis {
        Axis::X => 0,
        Axis::Y => 2,
    }
}

/// Editor (x, y, z) to engine (x, z, y).
pub fn to_engine_coords(v: DVec3) -> [f64; 3] {
    [v.x, v.z, v.y]
}

/// Engine (x, z, y) to editor (x, y, z).
pub fn from_engine_coords(c: [f64; 3]) -> DVec3 {
    DVec3::new(c[0], c[2], c[1])
}

/// Split data nested in each node record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    #[serde(rename = "Axis")]
    pub axis: i32,
    #[serde(rename = "Position", serialize_with = "serialize_position")]
    pub position: f64,
}

/// Leaf positions are written as the integer `-1`.
fn serialize_position<S: Serializer>(position: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if *position == LEAF_POSITION {
        serializer.serialize_i64(LEAF_POSITION as i64)
    } else {
        serializer.serialize_f64(*position)
    }
}

impl SplitRecord {
    pub fn leaf() -> Self {
        Self { axis: LEAF_AXIS, position: LEAF_POSITION }
    }

    pub fn is_leaf(&self) -> bool {
        self.axis == LEAF_AXIS
    }
}

/// One node of the flattened tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Number of descendants (subtree size minus one).
    #[serde(rename = "ChildCount")]
    pub child_count: u32,
    /// Index of the parent record minus index of this record; 0 at the root.
    #[serde(rename = "ParentOffset")]
    pub parent_offset: i32,
    #[serde(rename = "Split")]
    pub split: SplitRecord,
}

/// Flattened tree: world bounds plus node records in pre-order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeRecords {
    #[serde(rename = "WorldBoundsMinimum")]
    pub world_bounds_minimum: [f64; 3],
    #[serde(rename = "WorldBoundsMaximum")]
    pub world_bounds_maximum: [f64; 3],
    #[serde(rename = "Nodes")]
    pub nodes: Vec<NodeRecord>,
}

impl TreeRecords {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Flatten a built tree into engine records.
pub fn flatten(tree: &PartitionTree) -> TreeRecords {
    let order = tree.preorder();
    let sizes = tree.subtree_sizes(&order);

    let mut flat_index = vec![0usize; tree.node_count()];
    for (i, id) in order.iter().enumerate() {
        flat_index[id.index()] = i;
    }

    let nodes = order
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let node = tree.node(*id);
            let parent_offset = match node.parent {
                Some(parent) => flat_index[parent.index()] as i32 - i as i32,
                None => 0,
            };
            let split = match node.split {
                Some(split) => SplitRecord {
                    axis: engine_axis(split.axis),
                    position: split.position,
                },
                None => SplitRecord::leaf(),
            };
            NodeRecord {
                child_count: (sizes[id.index()] - 1) as u32,
                parent_offset,
                split,
            }
        })
        .collect();

    TreeRecords {
        world_bounds_minimum: to_engine_coords(tree.world_min()),
        world_bounds_maximum: to_engine_coords(tree.world_max()),
        nodes,
    }
}

fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedRecords(msg.into())
}

/// Decode a record's split, `None` for leaves.
fn decode_split(index: usize, record: &SplitRecord) -> Result<Option<Axis>> {
    match record.axis {
        LEAF_AXIS => {
            if record.position != LEAF_POSITION {
                return Err(malformed(format!(
                    "leaf record {} has position {}", index, record.position
                )));
            }
            Ok(None)
        }
        0 => Ok(Some(Axis::X)),
        2 => Ok(Some(Axis::Y)),
        1 => Err(malformed(format!("record {} splits on the vertical axis", index))),
        other => Err(malformed(format!("record {} has unknown axis {}", index, other))),
    }
}

/// Rebuild a tree from records produced by [`flatten`] (or read back from a
/// scene file).
///
/// Regions are recomputed from the world bounds and split positions. The
/// result's arena order equals the record order. Any inconsistency in child
/// counts, parent offsets or split placement is rejected.
pub fn rebuild_tree(records: &TreeRecords) -> Result<PartitionTree> {
    let count = records.nodes.len();
    if count == 0 {
        return Err(malformed("no node records"));
    }
    if records.nodes[0].parent_offset != 0 {
        return Err(malformed("first record is not a root"));
    }
    if records.nodes[0].child_count as usize != count - 1 {
        return Err(malformed(format!(
            "root has {} descendants but {} records follow",
            records.nodes[0].child_count,
            count - 1
        )));
    }

    let world_min = from_engine_coords(records.world_bounds_minimum);
    let world_max = from_engine_coords(records.world_bounds_maximum);

    // (region, parent) for each record, filled in as parents are visited
    let mut slots: Vec<Option<(Region, Option<NodeId>)>> = vec![None; count];
    slots[0] = Some((Region::new(world_min, world_max), None));

    let mut nodes = Vec::with_capacity(count);
    for (i, record) in records.nodes.iter().enumerate() {
        let (region, parent) = slots[i]
            .ok_or_else(|| malformed(format!("record {} is not reachable from the root", i)))?;

        if let Some(parent) = parent {
            let expected = parent.index() as i64 - i as i64;
            if record.parent_offset as i64 != expected {
                return Err(malformed(format!(
                    "record {} has parent offset {}, expected {}",
                    i, record.parent_offset, expected
                )));
            }
        }

        let Some(axis) = decode_split(i, &record.split)? else {
            if record.child_count != 0 {
                return Err(malformed(format!("leaf record {} claims {} descendants", i, record.child_count)));
            }
            nodes.push(PartitionNode { region, split: None, parent, children: None });
            continue;
        };

        let left = i + 1;
        let right = left + records.nodes.get(left).map_or(0, |r| r.child_count as usize) + 1;
        if right >= count {
            return Err(malformed(format!("split record {} runs past the end", i)));
        }
        let expected_count = records.nodes[left].child_count as u64 + records.nodes[right].child_count as u64 + 2;
        if record.child_count as u64 != expected_count {
            return Err(malformed(format!(
                "record {} claims {} descendants, children hold {}",
                i, record.child_count, expected_count
            )));
        }

        let position = record.split.position;
        let low = region.low[axis.index()];
        let high = region.high[axis.index()];
        if !(position > low && position < high) {
            return Err(malformed(format!(
                "record {} splits at {} outside ({}, {})", i, position, low, high
            )));
        }

        let (left_region, right_region) = region.split(axis, position);
        let id = NodeId(i as u32);
        for (slot, child_region) in [(left, left_region), (right, right_region)] {
            if slots[slot].is_some() {
                return Err(malformed(format!("record {} has two parents", slot)));
            }
            slots[slot] = Some((child_region, Some(id)));
        }

        nodes.push(PartitionNode {
            region,
            split: Some(Split { axis, position }),
            parent,
            children: Some((NodeId(left as u32), NodeId(right as u32))),
        });
    }

    Ok(PartitionTree::from_nodes(world_min, world_max, nodes))
}
