//! Marker files: a JSON array of `[x, y, z]` triples.

use std::path::Path;

use crate::core::types::DVec3;
use crate::core::{Error, Result};

/// Load markers from a JSON file.
pub fn load_markers(path: &Path) -> Result<Vec<DVec3>> {
    let json = std::fs::read_to_string(path)?;
    let points: Vec<[f64; 3]> = serde_json::from_str(&json)
        .map_err(|e| Error::Format(format!("{}: {}", path.display(), e)))?;
    Ok(points.into_iter().map(DVec3::from_array).collect())
}

/// Save markers to a JSON file, creating parent directories.
pub fn save_markers(markers: &[DVec3], path: &Path) -> Result<()> {
    let points: Vec<[f64; 3]> = markers.iter().map(|m| m.to_array()).collect();
    let json = serde_json::to_string(&points)
        .map_err(|e| Error::Format(e.to_string()))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, json)?;
    Ok(())
}
