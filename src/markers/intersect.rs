//! Markers recovered from existing intersect boxes.

use std::collections::HashSet;

use crate::core::types::DVec3;
use crate::math::Region;

/// XY key with -0.0 folded into 0.0
fn xy_key(p: DVec3) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

/// Both corners of every box, skipping any corner whose XY was already taken.
///
/// Output order follows input order, low corner before high corner.
pub fn from_intersect_boxes(boxes: &[Region]) -> Vec<DVec3> {
    let mut seen = HashSet::with_capacity(boxes.len() * 2);
    let mut markers = Vec::with_capacity(boxes.len() * 2);
    for b in boxes {
        for corner in [b.low, b.high] {
            if seen.insert(xy_key(corner)) {
                markers.push(corner);
            }
        }
    }

    let dropped = boxes.len() * 2 - markers.len();
    if dropped > 0 {
        log::debug!("Dropped {} intersect corners with duplicate XY", dropped);
    }
    markers
}
