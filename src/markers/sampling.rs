//! Marker sampling over object bounds: plain XY lattices and downward probes.

use rayon::prelude::*;

use crate::core::types::DVec3;
use crate::core::{Error, Result};
use crate::math::{snap, Region};
use crate::partition::validate_markers;
use super::config::SamplingConfig;

/// Downward ray query against level geometry.
///
/// Implemented by whatever owns the meshes (a BVH, a heightfield, ...).
pub trait SurfaceProbe: Send + Sync {
    /// First surface hit casting straight down from `(x, y, from_z)`.
    fn cast_down(&self, x: f64, y: f64, from_z: f64) -> Option<DVec3>;
}

/// A piece of level geometry to sample: its world bounds and vertices.
#[derive(Clone, Debug, Default)]
pub struct SampledObject {
    pub bounds: Region,
    pub vertices: Vec<DVec3>,
}

/// Four points around `p`, offset by `amount` along +X, -X, +Y and -Y.
pub fn salt(p: DVec3, amount: f64) -> [DVec3; 4] {
    [
        p + DVec3::new(amount, 0.0, 0.0),
        p + DVec3::new(-amount, 0.0, 0.0),
        p + DVec3::new(0.0, amount, 0.0),
        p + DVec3::new(0.0, -amount, 0.0),
    ]
}

fn validate_spacing(config: &SamplingConfig) -> Result<()> {
    if !config.spacing.is_finite() || config.spacing <= 0.0 {
        return Err(Error::InvalidGridSize(config.spacing));
    }
    Ok(())
}

/// Upper bound on lattice points per region
pub const MAX_LATTICE_POINTS: usize = 1 << 26;

fn invalid_region(region: &Region, reason: impl Into<String>) -> Error {
    Error::InvalidRegion {
        low: region.low.to_array(),
        high: region.high.to_array(),
        reason: reason.into(),
    }
}

/// Lattice columns between two snapped bounds, `None` if it does not fit.
fn lattice_steps(min: f64, max: f64, spacing: f64) -> Option<usize> {
    let steps = ((max - min) / spacing).round();
    if !steps.is_finite() || steps < 0.0 || steps >= MAX_LATTICE_POINTS as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}

/// XY lattice over `region` snapped outwards to `spacing`, X-major.
///
/// Fails on non-finite or inverted bounds and on lattices larger than
/// [`MAX_LATTICE_POINTS`].
fn lattice(region: &Region, spacing: f64) -> Result<Vec<(f64, f64)>> {
    if !region.low.is_finite() || !region.high.is_finite() {
        return Err(invalid_region(region, "non-finite bounds"));
    }
    if region.low.x > region.high.x || region.low.y > region.high.y {
        return Err(invalid_region(region, "inverted bounds"));
    }

    let min_x = snap(region.low.x, spacing, false);
    let min_y = snap(region.low.y, spacing, false);
    let max_x = snap(region.high.x, spacing, true);
    let max_y = snap(region.high.y, spacing, true);

    let too_large = || invalid_region(region, format!("more than {} lattice points", MAX_LATTICE_POINTS));
    let nx = lattice_steps(min_x, max_x, spacing).ok_or_else(too_large)?;
    let ny = lattice_steps(min_y, max_y, spacing).ok_or_else(too_large)?;
    let total = nx.checked_mul(ny).filter(|n| *n <= MAX_LATTICE_POINTS).ok_or_else(too_large)?;

    let mut points = Vec::with_capacity(total);
    for i in 0..nx {
        for j in 0..ny {
            points.push((min_x + i as f64 * spacing, min_y + j as f64 * spacing));
        }
    }
    Ok(points)
}

/// Lattice markers covering object bounds, at Z = 0.
///
/// With `individual` set each region gets its own lattice (regions are
/// processed in parallel, output stays in input order); otherwise one lattice
/// spans the union of all regions.
pub fn grid_markers(regions: &[Region], config: &SamplingConfig) -> Result<Vec<DVec3>> {
    validate_spacing(config)?;
    let to_markers = |region: &Region| -> Result<Vec<DVec3>> {
        Ok(lattice(region, config.spacing)?
            .into_iter()
            .map(|(x, y)| DVec3::new(x, y, 0.0))
            .collect())
    };

    let markers = if config.individual {
        regions.par_iter().map(to_markers).collect::<Result<Vec<_>>>()?.concat()
    } else {
        match regions.iter().copied().reduce(|a, b| a.merged(&b)) {
            Some(union) => to_markers(&union)?,
            None => Vec::new(),
        }
    };

    log::debug!("Grid sampling produced {} markers from {} regions", markers.len(), regions.len());
    Ok(markers)
}

/// Probe each object's lattice from above and collect salted hits plus the
/// object's own vertices.
///
/// Probes start `probe_margin` above the object's top. Every hit contributes
/// four salted markers; misses contribute nothing.
pub fn probe_markers(
    objects: &[SampledObject],
    probe: &dyn SurfaceProbe,
    config: &SamplingConfig,
) -> Result<Vec<DVec3>> {
    validate_spacing(config)?;

    let per_object: Vec<Vec<DVec3>> = objects
        .par_iter()
        .map(|object| -> Result<Vec<DVec3>> {
            let from_z = object.bounds.high.z + config.probe_margin;
            let mut markers: Vec<DVec3> = lattice(&object.bounds, config.spacing)?
                .into_iter()
                .filter_map(|(x, y)| probe.cast_down(x, y, from_z))
                .flat_map(|hit| salt(hit, config.salt))
                .collect();
            markers.extend_from_slice(&object.vertices);
            Ok(markers)
        })
        .collect::<Result<_>>()?;

    let markers = per_object.concat();
    validate_markers(&markers)?;
    log::info!("Probe sampling produced {} markers from {} objects", markers.len(), objects.len());
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat floor at a fixed height over an XY rectangle.
    struct FlatFloor {
        area: Region,
        height: f64,
    }

    impl SurfaceProbe for FlatFloor {
        fn cast_down(&self, x: f64, y: f64, from_z: f64) -> Option<DVec3> {
            let inside = x >= self.area.low.x && x <= self.area.high.x
                && y >= self.area.low.y && y <= self.area.high.y;
            (inside && from_z >= self.height).then(|| DVec3::new(x, y, self.height))
        }
    }

    fn region(x0: f64, y0: f64, x1: f64, y1: f64) -> Region {
        Region::new(DVec3::new(x0, y0, 0.0), DVec3::new(x1, y1, 10.0))
    }

    #[test]
    fn test_salt() {
        let points = salt(DVec3::new(10.0, 10.0, 1.0), 3.0);
        assert_eq!(points, [
            DVec3::new(13.0, 10.0, 1.0),
            DVec3::new(7.0, 10.0, 1.0),
            DVec3::new(10.0, 13.0, 1.0),
            DVec3::new(10.0, 7.0, 1.0),
        ]);
    }

    #[test]
    fn test_grid_single_region() {
        let config = SamplingConfig::default();
        let markers = grid_markers(&[region(5.0, 5.0, 35.0, 15.0)], &config).unwrap();
        // x: 0, 20, 40; y: 0, 20
        assert_eq!(markers.len(), 6);
        assert_eq!(markers[0], DVec3::new(0.0, 0.0, 0.0));
        assert_eq!(markers[1], DVec3::new(0.0, 20.0, 0.0));
        assert_eq!(markers[5], DVec3::new(40.0, 20.0, 0.0));
    }

    #[test]
    fn test_grid_individual_vs_merged() {
        let regions = [region(0.0, 0.0, 20.0, 20.0), region(100.0, 0.0, 120.0, 20.0)];

        let individual = SamplingConfig { individual: true, ..Default::default() };
        let markers = grid_markers(&regions, &individual).unwrap();
        assert_eq!(markers.len(), 8);
        assert_eq!(markers[4], DVec3::new(100.0, 0.0, 0.0));

        let merged = SamplingConfig::default();
        let markers = grid_markers(&regions, &merged).unwrap();
        // x: 0..=120 step 20 (7) by y: 0, 20 (2)
        assert_eq!(markers.len(), 14);
    }

    #[test]
    fn test_grid_empty_regions() {
        assert!(grid_markers(&[], &SamplingConfig::default()).unwrap().is_empty());
    }

    #[test]
    fn test_grid_rejects_bad_spacing() {
        let config = SamplingConfig { spacing: 0.0, ..Default::default() };
        assert!(matches!(grid_markers(&[region(0.0, 0.0, 1.0, 1.0)], &config), Err(Error::InvalidGridSize(_))));
    }

    #[test]
    fn test_grid_rejects_non_finite_bounds() {
        let config = SamplingConfig { individual: true, ..Default::default() };
        let open = region(0.0, 0.0, f64::INFINITY, 20.0);
        assert!(matches!(grid_markers(&[open], &config), Err(Error::InvalidRegion { .. })));

        let nan = region(0.0, f64::NAN, 20.0, 20.0);
        assert!(matches!(grid_markers(&[nan], &SamplingConfig::default()), Err(Error::InvalidRegion { .. })));
    }

    #[test]
    fn test_grid_rejects_inverted_bounds() {
        let inverted = region(40.0, 0.0, 0.0, 20.0);
        assert!(matches!(grid_markers(&[inverted], &SamplingConfig::default()), Err(Error::InvalidRegion { .. })));
    }

    #[test]
    fn test_grid_rejects_huge_region() {
        let huge = region(0.0, 0.0, 1e300, 20.0);
        assert!(matches!(grid_markers(&[huge], &SamplingConfig::default()), Err(Error::InvalidRegion { .. })));

        // Each axis fits on its own but the product does not
        let wide = region(0.0, 0.0, 1e6, 1e6);
        assert!(matches!(grid_markers(&[wide], &SamplingConfig::default()), Err(Error::InvalidRegion { .. })));
    }

    #[test]
    fn test_probe_rejects_non_finite_bounds() {
        let floor = FlatFloor { area: region(0.0, 0.0, 20.0, 20.0), height: 0.0 };
        let object = SampledObject { bounds: region(f64::NEG_INFINITY, 0.0, 20.0, 20.0), vertices: Vec::new() };
        let result = probe_markers(&[object], &floor, &SamplingConfig::default());
        assert!(matches!(result, Err(Error::InvalidRegion { .. })));
    }

    #[test]
    fn test_probe_rejects_non_finite_vertices() {
        let floor = FlatFloor { area: region(0.0, 0.0, 20.0, 20.0), height: 0.0 };
        let object = SampledObject {
            bounds: region(0.0, 0.0, 20.0, 20.0),
            vertices: vec![DVec3::new(1.0, f64::NAN, 0.0)],
        };
        let result = probe_markers(&[object], &floor, &SamplingConfig::default());
        assert!(matches!(result, Err(Error::NonFiniteMarker { .. })));
    }

    #[test]
    fn test_probe_hits_are_salted_and_vertices_appended() {
        let floor = FlatFloor { area: region(0.0, 0.0, 20.0, 0.0), height: 2.0 };
        let object = SampledObject {
            bounds: region(0.0, 0.0, 40.0, 0.0),
            vertices: vec![DVec3::new(1.0, 1.0, 2.0)],
        };
        let markers = probe_markers(&[object], &floor, &SamplingConfig::default()).unwrap();

        // Lattice x = 0, 20, 40 at y = 0; the floor only covers x <= 20
        assert_eq!(markers.len(), 2 * 4 + 1);
        assert_eq!(markers[0], DVec3::new(3.0, 0.0, 2.0));
        assert_eq!(markers[4], DVec3::new(23.0, 0.0, 2.0));
        assert_eq!(*markers.last().unwrap(), DVec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_probe_starts_above_bounds() {
        // Floor above the object's top but within the probe margin
        let floor = FlatFloor { area: region(-100.0, -100.0, 100.0, 100.0), height: 14.0 };
        let object = SampledObject { bounds: region(0.0, 0.0, 0.0, 0.0), vertices: Vec::new() };

        let markers = probe_markers(&[object.clone()], &floor, &SamplingConfig::default()).unwrap();
        assert_eq!(markers.len(), 4);

        let low_margin = SamplingConfig { probe_margin: 1.0, ..Default::default() };
        assert!(probe_markers(&[object], &floor, &low_margin).unwrap().is_empty());
    }
}
