//! Universal Polar Stereographic, built on the polar stereographic projection.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::ProjError;
use crate::grid::coords::{Hemisphere, UpsCoord};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::stereographic::{PolarStereographic, PolarStereographicParams};
use crate::proj::Projection;

/// Latitude of true scale giving a scale factor of 0.994 at the pole.
pub const ORIGIN_LAT: f64 = 81.114_528 * PI / 180.0;
pub const MIN_NORTH_LAT: f64 = 83.5 * PI / 180.0;
pub const MIN_SOUTH_LAT: f64 = -79.5 * PI / 180.0;
pub const MIN_EAST_NORTH: f64 = 0.0;
pub const MAX_EAST_NORTH: f64 = 4_000_000.0;

const FALSE_EASTING: f64 = 2_000_000.0;
const FALSE_NORTHING: f64 = 2_000_000.0;

#[derive(Clone, Debug)]
pub struct Ups {
    ellipsoid: Ellipsoid,
}

fn in_polar_band(lat: f64) -> bool {
    if lat < 0.0 {
        lat <= MIN_SOUTH_LAT
    } else {
        lat >= MIN_NORTH_LAT
    }
}

impl Ups {
    pub fn new(ellipsoid: Ellipsoid) -> Result<Self, ProjError> {
        ellipsoid.validate()?;
        Ok(Self { ellipsoid })
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    fn projection(&self, hemisphere: Hemisphere, false_origin: f64) -> Result<PolarStereographic, ProjError> {
        let lat_true_scale = match hemisphere {
            Hemisphere::North => ORIGIN_LAT,
            Hemisphere::South => -ORIGIN_LAT,
        };
        PolarStereographic::new(
            self.ellipsoid,
            PolarStereographicParams {
                lat_true_scale,
                lon_down_from_pole: 0.0,
                false_easting: false_origin,
                false_northing: false_origin,
            },
        )
    }

    /// Geodetic (radians) to UPS. Only latitudes poleward of 83.5°N or 79.5°S are accepted.
    pub fn geodetic_to_ups(&self, lon: f64, lat: f64) -> Result<UpsCoord, ProjError> {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat) || !in_polar_band(lat) {
            return Err(ProjError::Lat(format!(
                "{:.6} degrees is outside the UPS latitude range",
                lat.to_degrees()
            )));
        }
        if !(-PI..=TAU).contains(&lon) {
            return Err(ProjError::Lon(format!("{:.6} degrees", lon.to_degrees())));
        }

        let hemisphere = Hemisphere::from_latitude(lat);
        let (x, y) = self.projection(hemisphere, 0.0)?.forward(lon, lat)?;
        Ok(UpsCoord {
            hemisphere,
            easting: FALSE_EASTING + x,
            northing: FALSE_NORTHING + y,
        })
    }

    /// UPS to geodetic (radians).
    pub fn ups_to_geodetic(&self, ups: &UpsCoord) -> Result<(f64, f64), ProjError> {
        validate_ups(ups)?;

        let proj = self.projection(ups.hemisphere, FALSE_EASTING)?;
        let (lon, lat) = proj.inverse(ups.easting, ups.northing)?;
        if !in_polar_band(lat) {
            return Err(ProjError::Lat(format!(
                "{:.6} degrees is outside the UPS latitude range",
                lat.to_degrees()
            )));
        }
        Ok((lon, lat))
    }
}

pub(crate) fn validate_ups(ups: &UpsCoord) -> Result<(), ProjError> {
    if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&ups.easting) {
        return Err(ProjError::Easting(format!("{}", ups.easting)));
    }
    if !(MIN_EAST_NORTH..=MAX_EAST_NORTH).contains(&ups.northing) {
        return Err(ProjError::Northing(format!("{}", ups.northing)));
    }
    Ok(())
}
