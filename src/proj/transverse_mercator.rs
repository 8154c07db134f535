//! Transverse Mercator projection: 8th-order series in longitude difference.
//!
//! Forward uses the true meridional distance plus odd/even power series in Δλ;
//! inverse recovers the footpoint latitude by fixed-point iteration and applies
//! the inverse series in powers of the easting offset. This is the projection
//! underlying all UTM zones.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::{ProjError, ProjWarning};
use crate::proj::common::{
    fold_longitude, meridian_radius, meridional_distance, prime_vertical_radius, wrap_delta,
};
use crate::proj::ellipsoid::Ellipsoid;
use crate::proj::{Checked, Projection};

/// 89.99 degrees, the largest usable latitude.
pub const MAX_LAT: f64 = 89.99 * PI / 180.0;
/// Largest longitude difference from the central meridian.
pub const MAX_DELTA_LON: f64 = FRAC_PI_2;
pub const MIN_SCALE_FACTOR: f64 = 0.3;
pub const MAX_SCALE_FACTOR: f64 = 3.0;

/// Beyond this longitude difference a distortion warning is raised.
const DISTORTION_DELTA_LON: f64 = 9.0 * PI / 180.0;

/// User-facing projection parameters, all angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransverseMercatorParams {
    pub origin_lat: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
    pub scale_factor: f64,
}

impl Default for TransverseMercatorParams {
    fn default() -> Self {
        Self {
            origin_lat: 0.0,
            central_meridian: 0.0,
            false_easting: 0.0,
            false_northing: 0.0,
            scale_factor: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransverseMercator {
    ellipsoid: Ellipsoid,
    origin_lat: f64,
    central_meridian: f64,
    false_easting: f64,
    false_northing: f64,
    k0: f64,
    // Maximum variance accepted by the inverse
    delta_easting: f64,
    delta_northing: f64,
}

impl TransverseMercator {
    /// Validate the parameters and build the projection.
    ///
    /// The central meridian may be given in [-pi, 2pi]; it is stored in (-pi, pi].
    pub fn new(ellipsoid: Ellipsoid, params: TransverseMercatorParams) -> Result<Self, ProjError> {
        ellipsoid.validate()?;

        let TransverseMercatorParams {
            origin_lat,
            central_meridian,
            false_easting,
            false_northing,
            scale_factor,
        } = params;

        if !(-MAX_LAT..=MAX_LAT).contains(&origin_lat) {
            return Err(ProjError::OriginLat(format!(
                "{:.6} degrees",
                origin_lat.to_degrees()
            )));
        }
        if !(-PI..=TAU).contains(&central_meridian) {
            return Err(ProjError::CentralMeridian(format!(
                "{:.6} degrees",
                central_meridian.to_degrees()
            )));
        }
        if !(MIN_SCALE_FACTOR..=MAX_SCALE_FACTOR).contains(&scale_factor) {
            return Err(ProjError::ScaleFactor(format!("{scale_factor}")));
        }

        // The variance bounds come from the extreme corner of a unit projection
        // centred on (0, 0).
        let unit = Self::unbounded(ellipsoid, TransverseMercatorParams::default());
        let (_, delta_northing) = unit.forward_series(MAX_DELTA_LON, MAX_LAT)?.value;
        let (delta_easting, _) = unit.forward_series(MAX_DELTA_LON, 0.0)?.value;

        Ok(Self {
            ellipsoid,
            origin_lat,
            central_meridian: fold_longitude(central_meridian),
            false_easting,
            false_northing,
            k0: scale_factor,
            delta_easting,
            delta_northing,
        })
    }

    fn unbounded(ellipsoid: Ellipsoid, params: TransverseMercatorParams) -> Self {
        Self {
            ellipsoid,
            origin_lat: params.origin_lat,
            central_meridian: params.central_meridian,
            false_easting: params.false_easting,
            false_northing: params.false_northing,
            k0: params.scale_factor,
            delta_easting: f64::INFINITY,
            delta_northing: f64::INFINITY,
        }
    }

    pub fn origin_lat(&self) -> f64 {
        self.origin_lat
    }

    pub fn central_meridian(&self) -> f64 {
        self.central_meridian
    }

    pub fn false_easting(&self) -> f64 {
        self.false_easting
    }

    pub fn false_northing(&self) -> f64 {
        self.false_northing
    }

    pub fn scale_factor(&self) -> f64 {
        self.k0
    }

    /// Maximum (easting, northing) variance around the false origin.
    pub fn max_variance(&self) -> (f64, f64) {
        (self.delta_easting, self.delta_northing)
    }

    /// Geodetic (radians) to easting/northing, returning distortion warnings alongside.
    pub fn forward_checked(&self, lon: f64, lat: f64) -> Result<Checked<(f64, f64)>, ProjError> {
        if !(-MAX_LAT..=MAX_LAT).contains(&lat) {
            return Err(ProjError::Lat(format!("{:.6} degrees", lat.to_degrees())));
        }
        self.forward_series(lon, lat)
    }

    fn forward_series(&self, lon: f64, lat: f64) -> Result<Checked<(f64, f64)>, ProjError> {
        let lon = fold_longitude(lon);
        let cm = self.central_meridian;

        if lon < cm - MAX_DELTA_LON || lon > cm + MAX_DELTA_LON {
            // Retry with both angles in [0, 2pi) before rejecting
            let temp_lon = if lon < 0.0 { lon + TAU } else { lon };
            let temp_origin = if cm < 0.0 { cm + TAU } else { cm };
            if temp_lon < temp_origin - MAX_DELTA_LON || temp_lon > temp_origin + MAX_DELTA_LON {
                return Err(ProjError::Lon(format!(
                    "{:.6} degrees is more than 90 degrees from the central meridian",
                    lon.to_degrees()
                )));
            }
        }

        let mut dlam = lon - cm;
        let mut out = Checked::new((0.0, 0.0));
        if dlam.abs() > DISTORTION_DELTA_LON {
            out.warn(ProjWarning::LongitudeDistortion { delta_lon: dlam });
        }
        dlam = wrap_delta(dlam);
        if dlam.abs() < 2.0e-10 {
            dlam = 0.0;
        }

        let k0 = self.k0;
        let s = lat.sin();
        let c = lat.cos();
        let c2 = c * c;
        let c3 = c2 * c;
        let c5 = c3 * c2;
        let c7 = c5 * c2;
        let t = lat.tan();
        let tan2 = t * t;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let eta = self.ellipsoid.ep2 * c2;
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;

        let sn = prime_vertical_radius(&self.ellipsoid, lat);
        let tmd = meridional_distance(&self.ellipsoid, lat);
        let tmdo = meridional_distance(&self.ellipsoid, self.origin_lat);

        // northing
        let t1 = (tmd - tmdo) * k0;
        let t2 = sn * s * c * k0 / 2.0;
        let t3 = sn * s * c3 * k0 * (5.0 - tan2 + 9.0 * eta + 4.0 * eta2) / 24.0;
        let t4 = sn
            * s
            * c5
            * k0
            * (61.0 - 58.0 * tan2 + tan4 + 270.0 * eta - 330.0 * tan2 * eta + 445.0 * eta2
                + 324.0 * eta3
                - 680.0 * tan2 * eta2
                + 88.0 * eta4
                - 600.0 * tan2 * eta3
                - 192.0 * tan2 * eta4)
            / 720.0;
        let t5 = sn * s * c7 * k0 * (1385.0 - 3111.0 * tan2 + 543.0 * tan4 - tan6) / 40320.0;

        let northing = self.false_northing
            + t1
            + dlam.powi(2) * t2
            + dlam.powi(4) * t3
            + dlam.powi(6) * t4
            + dlam.powi(8) * t5;

        // easting
        let t6 = sn * c * k0;
        let t7 = sn * c3 * k0 * (1.0 - tan2 + eta) / 6.0;
        let t8 = sn
            * c5
            * k0
            * (5.0 - 18.0 * tan2 + tan4 + 14.0 * eta - 58.0 * tan2 * eta + 13.0 * eta2
                + 4.0 * eta3
                - 64.0 * tan2 * eta2
                - 24.0 * tan2 * eta3)
            / 120.0;
        let t9 = sn * c7 * k0 * (61.0 - 479.0 * tan2 + 179.0 * tan4 - tan6) / 5040.0;

        let easting = self.false_easting
            + dlam * t6
            + dlam.powi(3) * t7
            + dlam.powi(5) * t8
            + dlam.powi(7) * t9;

        out.value = (easting, northing);
        Ok(out)
    }

    /// Easting/northing to geodetic (radians), returning distortion warnings alongside.
    pub fn inverse_checked(&self, easting: f64, northing: f64) -> Result<Checked<(f64, f64)>, ProjError> {
        if easting < self.false_easting - self.delta_easting
            || easting > self.false_easting + self.delta_easting
        {
            return Err(ProjError::Easting(format!("{easting}")));
        }
        if northing < self.false_northing - self.delta_northing
            || northing > self.false_northing + self.delta_northing
        {
            return Err(ProjError::Northing(format!("{northing}")));
        }

        let k0 = self.k0;
        let tmdo = meridional_distance(&self.ellipsoid, self.origin_lat);
        let tmd = tmdo + (northing - self.false_northing) / k0;

        // Footpoint latitude: first estimate, then five refinement steps
        let mut sr = meridian_radius(&self.ellipsoid, 0.0);
        let mut ftphi = tmd / sr;
        for _ in 0..5 {
            let t10 = meridional_distance(&self.ellipsoid, ftphi);
            sr = meridian_radius(&self.ellipsoid, ftphi);
            ftphi += (tmd - t10) / sr;
        }

        let sr = meridian_radius(&self.ellipsoid, ftphi);
        let sn = prime_vertical_radius(&self.ellipsoid, ftphi);

        let c = ftphi.cos();
        let t = ftphi.tan();
        let tan2 = t * t;
        let tan4 = tan2 * tan2;
        let tan6 = tan4 * tan2;
        let eta = self.ellipsoid.ep2 * c * c;
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;

        let mut de = easting - self.false_easting;
        if de.abs() < 0.0001 {
            de = 0.0;
        }

        // latitude
        let t10 = t / (2.0 * sr * sn * k0.powi(2));
        let t11 = t * (5.0 + 3.0 * tan2 + eta - 4.0 * eta2 - 9.0 * tan2 * eta)
            / (24.0 * sr * sn.powi(3) * k0.powi(4));
        let t12 = t
            * (61.0 + 90.0 * tan2 + 46.0 * eta + 45.0 * tan4 - 252.0 * tan2 * eta - 3.0 * eta2
                + 100.0 * eta3
                - 66.0 * tan2 * eta2
                - 90.0 * tan4 * eta
                + 88.0 * eta4
                + 225.0 * tan4 * eta2
                + 84.0 * tan2 * eta3
                - 192.0 * tan2 * eta4)
            / (720.0 * sr * sn.powi(5) * k0.powi(6));
        let t13 = t * (1385.0 + 3633.0 * tan2 + 4095.0 * tan4 + 1575.0 * tan6)
            / (40320.0 * sr * sn.powi(7) * k0.powi(8));

        let mut lat = ftphi - de.powi(2) * t10 + de.powi(4) * t11 - de.powi(6) * t12
            + de.powi(8) * t13;

        // longitude
        let t14 = 1.0 / (sn * c * k0);
        let t15 = (1.0 + 2.0 * tan2 + eta) / (6.0 * sn.powi(3) * c * k0.powi(3));
        let t16 = (5.0 + 6.0 * eta + 28.0 * tan2 - 3.0 * eta2 + 8.0 * tan2 * eta + 24.0 * tan4
            - 4.0 * eta3
            + 4.0 * tan2 * eta2
            + 24.0 * tan2 * eta3)
            / (120.0 * sn.powi(5) * c * k0.powi(5));
        let t17 = (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6)
            / (5040.0 * sn.powi(7) * c * k0.powi(7));

        let dlam = de * t14 - de.powi(3) * t15 + de.powi(5) * t16 - de.powi(7) * t17;
        let mut lon = self.central_meridian + dlam;

        // Fold latitudes past a pole back onto the sphere
        while lat > FRAC_PI_2 {
            lat = PI - lat;
            lon = fold_longitude(lon + PI);
        }
        while lat < -FRAC_PI_2 {
            lat = -(lat + PI);
            lon = fold_longitude(lon + PI);
        }
        if lon > PI {
            lon -= TAU;
        } else if lon <= -PI {
            lon += TAU;
        }

        let mut out = Checked::new((lon, lat));
        if dlam.abs() > DISTORTION_DELTA_LON {
            out.warn(ProjWarning::LongitudeDistortion { delta_lon: dlam });
        }
        Ok(out)
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        Ok(self.forward_checked(lon, lat)?.logged())
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        Ok(self.inverse_checked(x, y)?.logged())
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
