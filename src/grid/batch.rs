//! Parallel conversion of coordinate slices.
//!
//! The converters are immutable, so a single instance is shared across the
//! rayon pool. Every helper returns one result per input, in input order.

use rayon::prelude::*;

use crate::error::ProjError;
use crate::grid::coords::{MgrsCoord, UtmCoord};
use crate::grid::mgrs::Mgrs;
use crate::grid::utm::Utm;

/// Geodetic `(lon, lat)` pairs in radians to MGRS.
pub fn geodetic_to_mgrs_batch(
    mgrs: &Mgrs,
    points: &[(f64, f64)],
    precision: u8,
) -> Vec<Result<MgrsCoord, ProjError>> {
    points
        .par_iter()
        .map(|&(lon, lat)| mgrs.geodetic_to_mgrs(lon, lat, precision))
        .collect()
}

pub fn mgrs_to_geodetic_batch<S>(mgrs: &Mgrs, references: &[S]) -> Vec<Result<(f64, f64), ProjError>>
where
    S: AsRef<str> + Sync,
{
    references
        .par_iter()
        .map(|s| mgrs.mgrs_to_geodetic(s.as_ref()))
        .collect()
}

pub fn geodetic_to_utm_batch(utm: &Utm, points: &[(f64, f64)]) -> Vec<Result<UtmCoord, ProjError>> {
    points
        .par_iter()
        .map(|&(lon, lat)| utm.geodetic_to_utm(lon, lat))
        .collect()
}

pub fn utm_to_geodetic_batch(utm: &Utm, coords: &[UtmCoord]) -> Vec<Result<(f64, f64), ProjError>> {
    coords
        .par_iter()
        .map(|c| utm.utm_to_geodetic(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::common::fold_longitude;
    use crate::proj::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    fn points() -> Vec<(f64, f64)> {
        (0..200)
            .map(|i| {
                let lon = -179.0 + 1.79 * i as f64;
                let lat = -79.0 + 0.8 * i as f64;
                (lon.to_radians(), lat.to_radians())
            })
            .collect()
    }

    #[test]
    fn test_mgrs_batch_matches_serial() {
        let mgrs = Mgrs::new(WGS84).unwrap();
        let pts = points();
        let batch = geodetic_to_mgrs_batch(&mgrs, &pts, 5);
        assert_eq!(batch.len(), pts.len());
        for (&(lon, lat), result) in pts.iter().zip(&batch) {
            assert_eq!(result, &mgrs.geodetic_to_mgrs(lon, lat, 5));
        }
    }

    #[test]
    fn test_mgrs_batch_keeps_errors_in_place() {
        let mgrs = Mgrs::new(WGS84).unwrap();
        let refs = ["33UWT0000061038", "33UIT00", "ZAH0000000000"];
        let out = mgrs_to_geodetic_batch(&mgrs, &refs);
        assert!(out[0].is_ok());
        assert!(matches!(out[1], Err(ProjError::MgrsString(_))));
        let (_, lat) = out[2].as_ref().unwrap();
        assert_relative_eq!(*lat, 90.0_f64.to_radians(), epsilon = 1e-9);
    }

    #[test]
    fn test_utm_batch_roundtrip() {
        let utm = Utm::new(WGS84).unwrap();
        let pts = points();
        let coords: Vec<UtmCoord> = geodetic_to_utm_batch(&utm, &pts)
            .into_iter()
            .map(Result::unwrap)
            .collect();
        let back = utm_to_geodetic_batch(&utm, &coords);
        for (&(lon, lat), result) in pts.iter().zip(back) {
            let (lon2, lat2) = result.unwrap();
            assert_relative_eq!(fold_longitude(lon2), lon, epsilon = 1e-7);
            assert_relative_eq!(lat2, lat, epsilon = 1e-7);
        }
    }
}
