//! Tree record persistence: pretty JSON for hand-off to the scene writer and
//! a compact LZ4-compressed archive for caching.

use std::path::Path;

use rkyv::{Archive, Deserialize, Serialize};

use crate::core::{Error, Result};
use super::records::{NodeRecord, SplitRecord, TreeRecords};

/// File extension for compressed record archives
pub const RECORDS_FILE_EXTENSION: &str = "wtr";

/// Serializable node record data.
#[derive(Archive, Deserialize, Serialize)]
struct NodeRecordData {
    child_count: u32,
    parent_offset: i32,
    axis: i32,
    position: f64,
}

/// Serializable tree record data.
#[derive(Archive, Deserialize, Serialize)]
struct TreeRecordsData {
    world_min: [f64; 3],
    world_max: [f64; 3],
    nodes: Vec<NodeRecordData>,
}

/// Write records as pretty JSON, creating parent directories.
pub fn save_json(records: &TreeRecords, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| Error::Format(e.to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, json)?;
    Ok(())
}

/// Read records written by [`save_json`].
pub fn load_json(path: &Path) -> Result<TreeRecords> {
    let json = std::fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| Error::Format(e.to_string()))
}

/// Serialize records to bytes (uncompressed)
pub fn serialize_records(records: &TreeRecords) -> Result<Vec<u8>> {
    let data = TreeRecordsData {
        world_min: records.world_bounds_minimum,
        world_max: records.world_bounds_maximum,
        nodes: records
            .nodes
            .iter()
            .map(|n| NodeRecordData {
                child_count: n.child_count,
                parent_offset: n.parent_offset,
                axis: n.split.axis,
                position: n.split.position,
            })
            .collect(),
    };

    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&data)
        .map_err(|e| Error::Format(e.to_string()))?;

    Ok(bytes.to_vec())
}

/// Deserialize records from bytes (uncompressed)
pub fn deserialize_records(data: &[u8]) -> Result<TreeRecords> {
    // Archive access needs an aligned buffer
    let mut aligned = rkyv::util::AlignedVec::<16>::new();
    aligned.extend_from_slice(data);

    let archived = rkyv::access::<ArchivedTreeRecordsData, rkyv::rancor::Error>(&aligned)
        .map_err(|e| Error::Format(e.to_string()))?;

    let data: TreeRecordsData = rkyv::deserialize::<TreeRecordsData, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::Format(e.to_string()))?;

    Ok(TreeRecords {
        world_bounds_minimum: data.world_min,
        world_bounds_maximum: data.world_max,
        nodes: data
            .nodes
            .into_iter()
            .map(|n| NodeRecord {
                child_count: n.child_count,
                parent_offset: n.parent_offset,
                split: SplitRecord { axis: n.axis, position: n.position },
            })
            .collect(),
    })
}

/// Serialize and compress records using LZ4
pub fn compress_records(records: &TreeRecords) -> Result<Vec<u8>> {
    let serialized = serialize_records(records)?;
    Ok(lz4_flex::compress_prepend_size(&serialized))
}

/// Decompress and deserialize records
pub fn decompress_records(data: &[u8]) -> Result<TreeRecords> {
    let decompressed = lz4_flex::decompress_size_prepended(data)
        .map_err(|e| Error::Format(format!("LZ4 decompression failed: {}", e)))?;
    deserialize_records(&decompressed)
}

/// Save compressed records to disk
pub fn save_compressed(records: &TreeRecords, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, compress_records(records)?)?;
    Ok(())
}

/// Load compressed records from disk
pub fn load_compressed(path: &Path) -> Result<TreeRecords> {
    let data = std::fs::read(path)?;
    decompress_records(&data)
}
