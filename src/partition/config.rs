//! Partition tree build configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

/// Grid cell size used by the level editor when none is given.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Configuration for [`PartitionBuilder`](super::PartitionBuilder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Smallest cell extent in X and Y. Regions at or below this size in both
    /// axes are never split.
    pub grid_size: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
        }
    }
}

impl TreeConfig {
    pub fn with_grid_size(grid_size: f64) -> Self {
        Self { grid_size }
    }

    /// Reject zero, negative and non-finite grid sizes.
    pub fn validate(&self) -> Result<()> {
        if !self.grid_size.is_finite() || self.grid_size <= 0.0 {
            return Err(Error::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Format(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync); the loaded config is validated.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| Error::Format(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_grid_size() {
        let config = TreeConfig::default();
        assert_eq!(config.grid_size, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_grid() {
        for grid in [0.0, -20.0, f64::NAN, f64::INFINITY] {
            let err = TreeConfig::with_grid_size(grid).validate().unwrap_err();
            assert!(matches!(err, Error::InvalidGridSize(_)));
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("configs").join("tree.json");

        let config = TreeConfig::with_grid_size(12.5);
        config.save_sync(&path).expect("save failed");

        let loaded = TreeConfig::load_sync(&path).expect("load failed");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_field_uses_default() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("tree.json");
        std::fs::write(&path, "{}").unwrap();

        let loaded = TreeConfig::load_sync(&path).expect("load failed");
        assert_eq!(loaded.grid_size, DEFAULT_GRID_SIZE);
    }

    #[test]
    fn test_load_invalid_grid_rejected() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("tree.json");
        std::fs::write(&path, r#"{ "grid_size": -1.0 }"#).unwrap();

        assert!(matches!(TreeConfig::load_sync(&path), Err(Error::InvalidGridSize(_))));
    }
}
