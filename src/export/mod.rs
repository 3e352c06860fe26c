//! Export of a built partition tree to the engine's record layout.

pub mod disk_io;
pub mod records;

pub use disk_io::{compress_records, decompress_records, load_json, save_json};
pub use records::{flatten, rebuild_tree, NodeRecord, SplitRecord, TreeRecords};
