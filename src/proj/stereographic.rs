//! Polar Stereographic projection, the base of the Universal Polar
//! Stereographic grid.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::error::ProjError;
use crate::proj::common::{fold_longitude, wrap_delta};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::Projection;

const POLE_TOLERANCE: f64 = 1.0e-10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolarStereographicParams {
    /// Latitude of true scale (radians). Its sign selects the hemisphere.
    pub lat_true_scale: f64,
    /// Longitude pointing straight down from the pole (radians).
    pub lon_down_from_pole: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// Polar Stereographic projection.
#[derive(Clone, Debug)]
pub struct PolarStereographic {
    ellipsoid: Ellipsoid,
    // Origin mirrored into the northern hemisphere
    origin_lat: f64,
    origin_lon: f64,
    is_south: bool,
    false_easting: f64,
    false_northing: f64,
    // Precomputed
    mc: f64,
    tc: f64,
    e4: f64,
    delta_easting: f64,
    delta_northing: f64,
}

impl PolarStereographic {
    /// Create a Polar Stereographic projection from latitude of true scale.
    pub fn new(ellipsoid: Ellipsoid, params: PolarStereographicParams) -> Result<Self, ProjError> {
        ellipsoid.validate()?;

        let PolarStereographicParams {
            lat_true_scale,
            lon_down_from_pole,
            false_easting,
            false_northing,
        } = params;

        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat_true_scale) {
            return Err(ProjError::Lat(format!(
                "latitude of true scale {:.6} degrees",
                lat_true_scale.to_degrees()
            )));
        }
        if !(-PI..=TAU).contains(&lon_down_from_pole) {
            return Err(ProjError::Lon(format!(
                "longitude down from pole {:.6} degrees",
                lon_down_from_pole.to_degrees()
            )));
        }

        let lon = fold_longitude(lon_down_from_pole);
        let is_south = lat_true_scale < 0.0;
        let (origin_lat, origin_lon) = if is_south {
            (-lat_true_scale, -lon)
        } else {
            (lat_true_scale, lon)
        };

        let e = ellipsoid.eccentricity();
        let (mut mc, mut tc, mut e4) = (1.0, 1.0, 1.0);
        if (origin_lat.abs() - FRAC_PI_2).abs() > POLE_TOLERANCE {
            let essin = e * origin_lat.sin();
            mc = origin_lat.cos() / (1.0 - essin * essin).sqrt();
            tc = (FRAC_PI_4 - origin_lat / 2.0).tan() / pow_es(e, essin);
        } else {
            let one_plus_e = 1.0 + e;
            let one_minus_e = 1.0 - e;
            e4 = (one_plus_e.powf(one_plus_e) * one_minus_e.powf(one_minus_e)).sqrt();
        }

        let mut proj = Self {
            ellipsoid,
            origin_lat,
            origin_lon,
            is_south,
            false_easting,
            false_northing,
            mc,
            tc,
            e4,
            delta_easting: 0.0,
            delta_northing: 0.0,
        };

        // The accepted radius reaches the equator along the origin meridian
        let equator = if is_south { -origin_lon } else { origin_lon };
        let (_, northing) = proj.forward(equator, 0.0)?;
        proj.delta_northing = (northing - false_northing).abs() + 1.0e-2;
        proj.delta_easting = proj.delta_northing;
        Ok(proj)
    }

    pub fn is_south(&self) -> bool {
        self.is_south
    }

    pub fn false_easting(&self) -> f64 {
        self.false_easting
    }

    pub fn false_northing(&self) -> f64 {
        self.false_northing
    }

    /// Maximum (easting, northing) variance around the false origin.
    pub fn max_variance(&self) -> (f64, f64) {
        (self.delta_easting, self.delta_northing)
    }

    fn true_scale_at_pole(&self) -> bool {
        (self.origin_lat.abs() - FRAC_PI_2).abs() <= POLE_TOLERANCE
    }
}

fn pow_es(e: f64, essin: f64) -> f64 {
    ((1.0 - essin) / (1.0 + essin)).powf(e / 2.0)
}

impl Projection for PolarStereographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat) {
            return Err(ProjError::Lat(format!("{:.6} degrees", lat.to_degrees())));
        }
        if (lat < 0.0 && !self.is_south) || (lat > 0.0 && self.is_south) {
            return Err(ProjError::Lat(format!(
                "{:.6} degrees is in the other hemisphere",
                lat.to_degrees()
            )));
        }
        if !(-PI..=TAU).contains(&lon) {
            return Err(ProjError::Lon(format!("{:.6} degrees", lon.to_degrees())));
        }

        if (lat.abs() - FRAC_PI_2).abs() < POLE_TOLERANCE {
            return Ok((self.false_easting, self.false_northing));
        }

        let (lon, lat) = if self.is_south { (-lon, -lat) } else { (lon, lat) };
        let dlam = wrap_delta(lon - self.origin_lon);

        let e = self.ellipsoid.eccentricity();
        let t = (FRAC_PI_4 - lat / 2.0).tan() / pow_es(e, e * lat.sin());
        let a = self.ellipsoid.a;
        let rho = if self.true_scale_at_pole() {
            2.0 * a * t / self.e4
        } else {
            a * self.mc * t / self.tc
        };

        if self.is_south {
            let x = -(rho * dlam.sin()) + self.false_easting;
            let y = rho * dlam.cos() + self.false_northing;
            Ok((x, y))
        } else {
            let x = rho * dlam.sin() + self.false_easting;
            let y = -rho * dlam.cos() + self.false_northing;
            Ok((x, y))
        }
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (fe, fnorth) = (self.false_easting, self.false_northing);
        if x > fe + self.delta_easting || x < fe - self.delta_easting {
            return Err(ProjError::Easting(format!("{x}")));
        }
        if y > fnorth + self.delta_northing || y < fnorth - self.delta_northing {
            return Err(ProjError::Northing(format!("{y}")));
        }

        // Radius of the raw coordinates, not of the offsets
        let radius = (x * x + y * y).sqrt();
        if radius > fe + self.delta_easting
            || radius > fnorth + self.delta_northing
            || radius < fe - self.delta_easting
            || radius < fnorth - self.delta_northing
        {
            return Err(ProjError::PolarRadius(format!("{radius}")));
        }

        let mut dx = x - fe;
        let mut dy = y - fnorth;
        if dx == 0.0 && dy == 0.0 {
            let lat = if self.is_south { -FRAC_PI_2 } else { FRAC_PI_2 };
            let lon = if self.is_south {
                -self.origin_lon
            } else {
                self.origin_lon
            };
            return Ok((lon, lat));
        }
        if self.is_south {
            dx = -dx;
            dy = -dy;
        }

        let a = self.ellipsoid.a;
        let e = self.ellipsoid.eccentricity();
        let rho = (dx * dx + dy * dy).sqrt();
        let t = if self.true_scale_at_pole() {
            rho * self.e4 / (2.0 * a)
        } else {
            rho * self.tc / (a * self.mc)
        };

        let mut phi = FRAC_PI_2 - 2.0 * t.atan();
        let mut prev = 0.0;
        while (phi - prev).abs() > 1.0e-10 {
            prev = phi;
            phi = FRAC_PI_2 - 2.0 * (t * pow_es(e, e * phi.sin())).atan();
        }

        let mut lon = self.origin_lon + dx.atan2(-dy);
        if lon > PI {
            lon -= TAU;
        } else if lon < -PI {
            lon += TAU;
        }

        let lat = phi.clamp(-FRAC_PI_2, FRAC_PI_2);
        let lon = lon.clamp(-PI, PI);

        if self.is_south {
            Ok((-lon, -lat))
        } else {
            Ok((lon, lat))
        }
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
