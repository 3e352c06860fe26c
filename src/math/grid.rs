//! Grid snapping and point containment helpers

use crate::core::types::DVec3;
use super::Region;

/// Snap `value` to a multiple of `grid`.
///
/// Exact multiples are returned unchanged. Otherwise the next lower multiple is
/// returned, plus one `grid` step when `round_up` is set. Negative values snap
/// towards negative infinity, matching a floored remainder.
pub fn snap(value: f64, grid: f64, round_up: bool) -> f64 {
    let rem = value.rem_euclid(grid);
    if rem == 0.0 {
        return value;
    }
    let lower = value - rem;
    if round_up { lower + grid } else { lower }
}

/// Component-wise [`snap`]
pub fn snap_vector(v: DVec3, grid: f64, round_up: bool) -> DVec3 {
    DVec3::new(
        snap(v.x, grid, round_up),
        snap(v.y, grid, round_up),
        snap(v.z, grid, round_up),
    )
}

/// Inclusive containment test. With `ignore_z` only X and Y are compared.
pub fn point_in_region(p: DVec3, region: &Region, ignore_z: bool) -> bool {
    if p.x < region.low.x || p.y < region.low.y || p.x > region.high.x || p.y > region.high.y {
        return false;
    }
    ignore_z || (p.z >= region.low.z && p.z <= region.high.z)
}

/// True if any point lies in `region`, Z ignored
pub fn any_in_region(points: &[DVec3], region: &Region) -> bool {
    points.iter().any(|p| point_in_region(*p, region, true))
}
