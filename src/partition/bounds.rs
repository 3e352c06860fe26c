//! World bounds collection over a marker set.

use crate::core::types::DVec3;
use crate::core::{Error, Result};
use crate::math::{snap_vector, Region};

/// Reject markers with NaN or infinite coordinates.
pub fn validate_markers(markers: &[DVec3]) -> Result<()> {
    match markers.iter().position(|m| !m.is_finite()) {
        Some(index) => {
            let m = markers[index];
            Err(Error::NonFiniteMarker { index, x: m.x, y: m.y, z: m.z })
        }
        None => Ok(()),
    }
}

/// Tight bounds of `markers` expanded outwards to whole multiples of `grid`.
///
/// The minimum corner is snapped down and the maximum corner up, each axis
/// independently. Z is carried along but never split on.
pub fn collect_bounds(markers: &[DVec3], grid: f64) -> Result<Region> {
    if !grid.is_finite() || grid <= 0.0 {
        return Err(Error::InvalidGridSize(grid));
    }
    let (first, rest) = markers.split_first().ok_or(Error::EmptyInput)?;

    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), m| (min.min(*m), max.max(*m)));

    Ok(Region::new(
        snap_vector(min, grid, false),
        snap_vector(max, grid, true),
    ))
}
