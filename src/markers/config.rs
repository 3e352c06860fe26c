//! Marker sampling configuration.

use serde::{Deserialize, Serialize};

/// Configuration for grid and probe marker sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Lattice spacing in X and Y. Usually the tree grid size.
    pub spacing: f64,
    /// XY offset of the four markers placed around each probe hit.
    pub salt: f64,
    /// Probes start this far above the top of the sampled bounds.
    pub probe_margin: f64,
    /// One lattice per input region (`true`) or one over their union.
    pub individual: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            salt: 3.0,
            probe_margin: 5.0,
            individual: false,
        }
    }
}
