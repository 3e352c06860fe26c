//! Marker sources: the sample points that tell the partition builder where a
//! level needs resolution.
//!
//! Markers come from existing intersect boxes in a scene file, from plain XY
//! lattices over object bounds, or from probing level geometry from above.
//! All sources produce plain `DVec3` lists. Sampled bounds are checked before
//! a lattice is laid out; the builder validates whatever it is given.

pub mod config;
pub mod intersect;
pub mod io;
pub mod sampling;

pub use config::SamplingConfig;
pub use intersect::from_intersect_boxes;
pub use io::{load_markers, save_markers};
pub use sampling::{grid_markers, probe_markers, salt, SampledObject, SurfaceProbe};
