//! Worldtree - grid-aligned world partition trees for level spatial indexing
//!
//! ```
//! use worldtree::core::DVec3;
//! use worldtree::export::flatten;
//! use worldtree::partition::{PartitionBuilder, TreeConfig};
//!
//! let markers = [DVec3::new(0.0, 0.0, 0.0), DVec3::new(25.0, 0.0, 0.0)];
//! let tree = PartitionBuilder::new(&TreeConfig::default())?.build(&markers)?;
//! let records = flatten(&tree);
//! assert_eq!(records.node_count(), 3);
//! # Ok::<(), worldtree::core::Error>(())
//! ```

pub mod core;
pub mod math;
pub mod partition;
pub mod export;
pub mod markers;
