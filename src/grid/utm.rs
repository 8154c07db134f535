//! Universal Transverse Mercator: zone selection and zone-wise TM conversion.

use std::f64::consts::{PI, TAU};

use crate::error::ProjError;
use crate::grid::coords::{Hemisphere, UtmCoord};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::transverse_mercator::{TransverseMercator, TransverseMercatorParams};
use crate::proj::Checked;

pub const MIN_LAT: f64 = -80.5 * PI / 180.0;
pub const MAX_LAT: f64 = 84.5 * PI / 180.0;
pub const MIN_EASTING: f64 = 100_000.0;
pub const MAX_EASTING: f64 = 900_000.0;
pub const MIN_NORTHING: f64 = 0.0;
pub const MAX_NORTHING: f64 = 10_000_000.0;

const FALSE_EASTING: f64 = 500_000.0;
const SOUTH_FALSE_NORTHING: f64 = 10_000_000.0;
const SCALE_FACTOR: f64 = 0.9996;

/// Central meridian of a UTM zone, radians.
pub fn central_meridian(zone: u8) -> f64 {
    let zone = f64::from(zone);
    let degrees = if zone >= 31.0 {
        6.0 * zone - 183.0
    } else {
        6.0 * zone + 177.0
    };
    degrees.to_radians()
}

/// Zone a geodetic position falls in, including the Norway and Svalbard exceptions.
///
/// `lon` must already be in [0, 2pi).
fn natural_zone(lon: f64, lat: f64) -> u8 {
    let lat_deg = lat.to_degrees() as i64;
    let lon_deg = lon.to_degrees() as i64;

    let mut zone = if lon < PI {
        (31.0 + lon.to_degrees() / 6.0) as i64
    } else {
        (lon.to_degrees() / 6.0 - 29.0) as i64
    };
    if zone > 60 {
        zone = 1;
    }

    if (56..64).contains(&lat_deg) {
        match lon_deg {
            0..=2 => zone = 31,
            3..=11 => zone = 32,
            _ => {}
        }
    }
    if lat_deg > 71 {
        match lon_deg {
            0..=8 => zone = 31,
            9..=20 => zone = 33,
            21..=32 => zone = 35,
            33..=41 => zone = 37,
            _ => {}
        }
    }
    zone as u8
}

/// UTM converter on one ellipsoid, optionally pinned to a neighbouring zone.
#[derive(Clone, Debug)]
pub struct Utm {
    ellipsoid: Ellipsoid,
    zone_override: Option<u8>,
}

impl Utm {
    pub fn new(ellipsoid: Ellipsoid) -> Result<Self, ProjError> {
        ellipsoid.validate()?;
        Ok(Self {
            ellipsoid,
            zone_override: None,
        })
    }

    /// Force conversions into `zone` when it is the natural zone or adjacent to it.
    pub fn with_zone_override(mut self, zone: u8) -> Result<Self, ProjError> {
        if !(1..=60).contains(&zone) {
            return Err(ProjError::UtmZoneOverride(format!(
                "zone {zone} is not between 1 and 60"
            )));
        }
        self.zone_override = Some(zone);
        Ok(self)
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn zone_override(&self) -> Option<u8> {
        self.zone_override
    }

    fn projection(&self, zone: u8, hemisphere: Hemisphere) -> Result<TransverseMercator, ProjError> {
        let false_northing = match hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => SOUTH_FALSE_NORTHING,
        };
        TransverseMercator::new(
            self.ellipsoid,
            TransverseMercatorParams {
                origin_lat: 0.0,
                central_meridian: central_meridian(zone),
                false_easting: FALSE_EASTING,
                false_northing,
                scale_factor: SCALE_FACTOR,
            },
        )
    }

    /// Geodetic (radians) to UTM.
    pub fn geodetic_to_utm(&self, lon: f64, lat: f64) -> Result<UtmCoord, ProjError> {
        Ok(self.geodetic_to_utm_checked(lon, lat)?.logged())
    }

    pub fn geodetic_to_utm_checked(&self, lon: f64, lat: f64) -> Result<Checked<UtmCoord>, ProjError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(ProjError::Lat(format!(
                "{:.6} degrees is outside the UTM latitude range",
                lat.to_degrees()
            )));
        }
        if !(-PI..=TAU).contains(&lon) {
            return Err(ProjError::Lon(format!("{:.6} degrees", lon.to_degrees())));
        }

        let lon = if lon < 0.0 { lon + TAU + 1.0e-10 } else { lon };
        let natural = natural_zone(lon, lat);

        let zone = match self.zone_override {
            None => natural,
            Some(forced) => {
                let wraps = (natural == 1 && forced == 60) || (natural == 60 && forced == 1);
                if wraps || (natural.saturating_sub(1)..=natural + 1).contains(&forced) {
                    forced
                } else {
                    return Err(ProjError::UtmZoneOverride(format!(
                        "zone {forced} is not adjacent to zone {natural}"
                    )));
                }
            }
        };

        let hemisphere = Hemisphere::from_latitude(lat);
        let tm = self.projection(zone, hemisphere)?;
        let checked = tm.forward_checked(lon, lat)?;
        let (easting, northing) = checked.value;

        if !(MIN_EASTING..=MAX_EASTING).contains(&easting) {
            return Err(ProjError::Easting(format!("{easting}")));
        }
        if !(MIN_NORTHING..=MAX_NORTHING).contains(&northing) {
            return Err(ProjError::Northing(format!("{northing}")));
        }

        Ok(checked.map(|_| UtmCoord {
            zone,
            hemisphere,
            easting,
            northing,
        }))
    }

    /// UTM to geodetic (radians).
    pub fn utm_to_geodetic(&self, utm: &UtmCoord) -> Result<(f64, f64), ProjError> {
        Ok(self.utm_to_geodetic_checked(utm)?.logged())
    }

    pub fn utm_to_geodetic_checked(&self, utm: &UtmCoord) -> Result<Checked<(f64, f64)>, ProjError> {
        validate_utm(utm)?;

        let tm = self.projection(utm.zone, utm.hemisphere)?;
        let checked = tm.inverse_checked(utm.easting, utm.northing)?;
        let (_, lat) = checked.value;
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(ProjError::Northing(format!(
                "{} maps to latitude {:.6} degrees",
                utm.northing,
                lat.to_degrees()
            )));
        }
        Ok(checked)
    }
}

/// Range checks shared by every conversion that starts from a UTM coordinate.
pub(crate) fn validate_utm(utm: &UtmCoord) -> Result<(), ProjError> {
    if !(1..=60).contains(&utm.zone) {
        return Err(ProjError::UtmZone(utm.zone));
    }
    if !(MIN_EASTING..=MAX_EASTING).contains(&utm.easting) {
        return Err(ProjError::Easting(format!("{}", utm.easting)));
    }
    if !(MIN_NORTHING..=MAX_NORTHING).contains(&utm.northing) {
        return Err(ProjError::Northing(format!("{}", utm.northing)));
    }
    Ok(())
}
