//! Military Grid Reference System on top of the UTM and UPS converters.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::error::ProjError;
use crate::grid::bands::{
    grid_values, latitude_band, latitude_letter, ups_letters, LETTER_A, LETTER_B, LETTER_C,
    LETTER_D, LETTER_E, LETTER_H, LETTER_I, LETTER_J, LETTER_L, LETTER_M, LETTER_N, LETTER_O,
    LETTER_U, LETTER_V, LETTER_W, LETTER_X, LETTER_Y, LETTER_Z,
};
use crate::grid::coords::{Hemisphere, MgrsCoord, UpsCoord, UtmCoord};
use crate::grid::ups::{validate_ups, Ups};
use crate::grid::utm::{validate_utm, Utm, MAX_EASTING};
use crate::proj::ellipsoid::Ellipsoid;

/// Latitude limits of the UTM part of the grid; beyond them MGRS uses UPS.
pub const MIN_UTM_LAT: f64 = -80.0 * PI / 180.0;
pub const MAX_UTM_LAT: f64 = 84.0 * PI / 180.0;

const ONE_HT: f64 = 100_000.0;
const TWO_MIL: f64 = 2_000_000.0;

/// Round to the nearest integer, ties to even.
pub fn round_mgrs(value: f64) -> f64 {
    let ival = value.floor();
    let fraction = value - ival;
    if fraction > 0.5 || (fraction == 0.5 && ival % 2.0 == 1.0) {
        ival + 1.0
    } else {
        ival
    }
}

fn check_precision(precision: u8) -> Result<(), ProjError> {
    if precision > MgrsCoord::MAX_PRECISION {
        return Err(ProjError::MgrsPrecision(precision));
    }
    Ok(())
}

/// Round easting/northing to the 10^(5 - precision) metre grid.
fn round_to_precision(easting: f64, northing: f64, precision: u8) -> (f64, f64) {
    let divisor = 10f64.powi(5 - i32::from(precision));
    (
        round_mgrs(easting / divisor) * divisor,
        round_mgrs(northing / divisor) * divisor,
    )
}

/// Eastern part of 31V belongs to zone 32.
fn in_truncated_31v(zone: u8, lon: f64, lat: f64) -> bool {
    zone == 31
        && (56.0_f64.to_radians()..64.0_f64.to_radians()).contains(&lat)
        && lon >= 3.0_f64.to_radians()
}

/// MGRS converter bound to one ellipsoid.
#[derive(Clone, Debug)]
pub struct Mgrs {
    ellipsoid: Ellipsoid,
    utm: Utm,
    ups: Ups,
}

impl Mgrs {
    pub fn new(ellipsoid: Ellipsoid) -> Result<Self, ProjError> {
        Ok(Self {
            ellipsoid,
            utm: Utm::new(ellipsoid)?,
            ups: Ups::new(ellipsoid)?,
        })
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn utm(&self) -> &Utm {
        &self.utm
    }

    pub fn ups(&self) -> &Ups {
        &self.ups
    }

    /// Geodetic (radians) to MGRS at `precision` digits per coordinate (0..=5).
    pub fn geodetic_to_mgrs(&self, lon: f64, lat: f64, precision: u8) -> Result<MgrsCoord, ProjError> {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat) {
            return Err(ProjError::Lat(format!("{:.6} degrees", lat.to_degrees())));
        }
        if !(-PI..=TAU).contains(&lon) {
            return Err(ProjError::Lon(format!("{:.6} degrees", lon.to_degrees())));
        }
        check_precision(precision)?;

        if !(MIN_UTM_LAT..=MAX_UTM_LAT).contains(&lat) {
            let ups = self.ups.geodetic_to_ups(lon, lat)?;
            return self.ups_to_mgrs(&ups, precision);
        }

        let mut utm = self.utm.geodetic_to_utm(lon, lat)?;
        if in_truncated_31v(utm.zone, lon, lat) {
            utm = self.utm.clone().with_zone_override(32)?.geodetic_to_utm(lon, lat)?;
        }
        self.utm_grid_reference(&utm, lat, precision)
    }

    /// MGRS string to geodetic (radians).
    pub fn mgrs_to_geodetic(&self, mgrs: &str) -> Result<(f64, f64), ProjError> {
        self.mgrs_coord_to_geodetic(&MgrsCoord::parse(mgrs)?)
    }

    pub fn mgrs_coord_to_geodetic(&self, mgrs: &MgrsCoord) -> Result<(f64, f64), ProjError> {
        if mgrs.is_polar() {
            let ups = self.mgrs_to_ups(mgrs)?;
            self.ups.ups_to_geodetic(&ups)
        } else {
            let utm = self.mgrs_to_utm(mgrs)?;
            self.utm.utm_to_geodetic(&utm)
        }
    }

    /// UTM coordinate to MGRS.
    pub fn utm_to_mgrs(&self, utm: &UtmCoord, precision: u8) -> Result<MgrsCoord, ProjError> {
        validate_utm(utm)?;
        check_precision(precision)?;

        let (lon, lat) = self.utm.utm_to_geodetic(utm)?;
        if in_truncated_31v(utm.zone, lon, lat) {
            let rezoned = self.utm.clone().with_zone_override(32)?.geodetic_to_utm(lon, lat)?;
            return self.utm_grid_reference(&rezoned, lat, precision);
        }
        self.utm_grid_reference(utm, lat, precision)
    }

    /// Letters and in-square offsets for a UTM coordinate at latitude `lat`.
    fn utm_grid_reference(&self, utm: &UtmCoord, lat: f64, precision: u8) -> Result<MgrsCoord, ProjError> {
        let (mut easting, northing) = round_to_precision(utm.easting, utm.northing, precision);
        // The 900 km line has no column of its own; keep it in the last square
        let last_column = MAX_EASTING - 10f64.powi(5 - i32::from(precision));
        if easting > last_column {
            easting = last_column;
        }
        let grid = grid_values(utm.zone, self.ellipsoid.code());
        let band = latitude_letter(lat)?;

        let mut grid_northing = if northing == 1.0e7 { northing - 1.0 } else { northing };
        grid_northing %= TWO_MIL;
        grid_northing -= grid.false_northing;
        if grid_northing < 0.0 {
            grid_northing += TWO_MIL;
        }
        let mut ltr3 = (grid_northing / ONE_HT) as u8;
        if ltr3 > LETTER_H {
            ltr3 += 1;
        }
        if ltr3 > LETTER_N {
            ltr3 += 1;
        }

        let mut grid_easting = easting;
        if band == LETTER_V && utm.zone == 31 && grid_easting == 500_000.0 {
            grid_easting -= 1.0;
        }
        let mut ltr2 = grid.ltr2_low + (grid_easting / ONE_HT) as u8 - 1;
        if grid.ltr2_low == LETTER_J && ltr2 > LETTER_N {
            ltr2 += 1;
        }

        Ok(MgrsCoord::from_grid(
            utm.zone,
            [band, ltr2, ltr3],
            easting,
            northing,
            precision,
        ))
    }

    /// MGRS reference with a zone to UTM. The result is checked against the band's latitudes.
    pub fn mgrs_to_utm(&self, mgrs: &MgrsCoord) -> Result<UtmCoord, ProjError> {
        let zone = mgrs.zone();
        let [band, ltr2, ltr3] = mgrs.letters();
        let bad = |why: &str| ProjError::MgrsString(format!("{mgrs}: {why}"));

        if zone == 0 {
            return Err(bad("polar references have no UTM zone"));
        }
        if band == LETTER_X && matches!(zone, 32 | 34 | 36) {
            return Err(bad("zones 32X, 34X and 36X do not exist"));
        }
        let band_info = latitude_band(band)?;
        let hemisphere = if band < LETTER_N {
            Hemisphere::South
        } else {
            Hemisphere::North
        };

        let grid = grid_values(zone, self.ellipsoid.code());
        if ltr2 < grid.ltr2_low || ltr2 > grid.ltr2_high || ltr3 > LETTER_V {
            return Err(bad("grid square letters do not exist in this zone"));
        }

        let mut grid_northing = f64::from(ltr3) * ONE_HT + grid.false_northing;
        let mut grid_easting = f64::from(ltr2 - grid.ltr2_low + 1) * ONE_HT;
        if grid.ltr2_low == LETTER_J && ltr2 > LETTER_O {
            grid_easting -= ONE_HT;
        }
        if ltr3 > LETTER_O {
            grid_northing -= ONE_HT;
        }
        if ltr3 > LETTER_I {
            grid_northing -= ONE_HT;
        }
        if grid_northing >= TWO_MIL {
            grid_northing -= TWO_MIL;
        }

        let min_northing = band_info.min_northing;
        grid_northing -= min_northing % TWO_MIL;
        if grid_northing < 0.0 {
            grid_northing += TWO_MIL;
        }
        grid_northing += min_northing;

        let utm = UtmCoord {
            zone,
            hemisphere,
            easting: grid_easting + mgrs.easting(),
            northing: grid_northing + mgrs.northing(),
        };

        let (_, lat) = self.utm.utm_to_geodetic(&utm)?;
        let tolerance = 1.0_f64.to_radians() / 10f64.powi(i32::from(mgrs.precision()));
        let north = band_info.north.to_radians() + tolerance;
        let south = band_info.south.to_radians() - tolerance;
        if !(south..=north).contains(&lat) {
            return Err(bad("position lies outside its latitude band"));
        }
        Ok(utm)
    }

    /// UPS coordinate to MGRS.
    pub fn ups_to_mgrs(&self, ups: &UpsCoord, precision: u8) -> Result<MgrsCoord, ProjError> {
        validate_ups(ups)?;
        check_precision(precision)?;

        let (easting, northing) = round_to_precision(ups.easting, ups.northing, precision);
        let east_half = easting >= TWO_MIL;
        let band = match (ups.hemisphere, east_half) {
            (Hemisphere::North, true) => LETTER_Z,
            (Hemisphere::North, false) => LETTER_Y,
            (Hemisphere::South, true) => LETTER_B,
            (Hemisphere::South, false) => LETTER_A,
        };
        let table = ups_letters(band)
            .ok_or_else(|| ProjError::MgrsString(format!("no UPS lettering for band {band}")))?;

        let row = (northing - table.false_northing) / ONE_HT;
        if row < 0.0 {
            return Err(ProjError::Northing(format!("{ups} lies below the first polar grid row")));
        }
        let mut ltr3 = row as u8;
        if ltr3 > LETTER_H {
            ltr3 += 1;
        }
        if ltr3 > LETTER_N {
            ltr3 += 1;
        }
        if ltr3 > table.ltr3_high {
            return Err(ProjError::Northing(format!("{ups} lies past the last polar grid row")));
        }

        let column = (easting - table.false_easting) / ONE_HT;
        if column < 0.0 {
            return Err(ProjError::Easting(format!("{ups} lies left of the first polar grid column")));
        }
        let mut ltr2 = (f64::from(table.ltr2_low) + column) as u8;
        if east_half {
            if ltr2 > LETTER_C {
                ltr2 += 2;
            }
            if ltr2 > LETTER_H {
                ltr2 += 1;
            }
            if ltr2 > LETTER_L {
                ltr2 += 3;
            }
        } else {
            if ltr2 > LETTER_L {
                ltr2 += 3;
            }
            if ltr2 > LETTER_U {
                ltr2 += 2;
            }
        }

        if ltr2 > table.ltr2_high {
            return Err(ProjError::Easting(format!("{ups} lies past the last polar grid column")));
        }

        Ok(MgrsCoord::from_grid(
            0,
            [band, ltr2, ltr3],
            easting,
            northing,
            precision,
        ))
    }

    /// Polar MGRS reference to UPS.
    pub fn mgrs_to_ups(&self, mgrs: &MgrsCoord) -> Result<UpsCoord, ProjError> {
        let [band, ltr2, ltr3] = mgrs.letters();
        let bad = |why: &str| ProjError::MgrsString(format!("{mgrs}: {why}"));

        if !mgrs.is_polar() {
            return Err(bad("UTM references cannot be converted to UPS"));
        }
        let table = ups_letters(band).ok_or_else(|| bad("polar band must be A, B, Y or Z"))?;
        let hemisphere = if band >= LETTER_Y {
            Hemisphere::North
        } else {
            Hemisphere::South
        };

        let skipped = matches!(
            ltr2,
            LETTER_D | LETTER_E | LETTER_M | LETTER_N | LETTER_V | LETTER_W
        );
        if ltr2 < table.ltr2_low || ltr2 > table.ltr2_high || skipped || ltr3 > table.ltr3_high {
            return Err(bad("grid square letters do not exist in this polar area"));
        }

        let mut grid_northing = f64::from(ltr3) * ONE_HT + table.false_northing;
        if ltr3 > LETTER_I {
            grid_northing -= ONE_HT;
        }
        if ltr3 > LETTER_O {
            grid_northing -= ONE_HT;
        }

        let mut grid_easting = f64::from(ltr2 - table.ltr2_low) * ONE_HT + table.false_easting;
        if table.ltr2_low != LETTER_A {
            if ltr2 > LETTER_L {
                grid_easting -= 300_000.0;
            }
            if ltr2 > LETTER_U {
                grid_easting -= 200_000.0;
            }
        } else {
            if ltr2 > LETTER_C {
                grid_easting -= 200_000.0;
            }
            if ltr2 > LETTER_I {
                grid_easting -= ONE_HT;
            }
            if ltr2 > LETTER_L {
                grid_easting -= 300_000.0;
            }
        }

        Ok(UpsCoord {
            hemisphere,
            easting: grid_easting + mgrs.easting(),
            northing: grid_northing + mgrs.northing(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::common::fold_longitude;
    use crate::proj::ellipsoid::WGS84;
    use approx::assert_relative_eq;

    fn mgrs() -> Mgrs {
        Mgrs::new(WGS84).unwrap()
    }

    fn to_mgrs(lon_deg: f64, lat_deg: f64, precision: u8) -> String {
        mgrs()
            .geodetic_to_mgrs(lon_deg.to_radians(), lat_deg.to_radians(), precision)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_round_half_to_even() {
        assert_relative_eq!(round_mgrs(2.5), 2.0);
        assert_relative_eq!(round_mgrs(3.5), 4.0);
        assert_relative_eq!(round_mgrs(2.4999), 2.0);
        assert_relative_eq!(round_mgrs(2.5001), 3.0);
        assert_relative_eq!(round_mgrs(0.5), 0.0);
        assert_relative_eq!(round_mgrs(7.0), 7.0);
    }

    #[test]
    fn test_known_references() {
        // Points on a central meridian sit at the 500 km column
        assert_eq!(to_mgrs(15.0, 52.0, 5), "33UWT0000061038");
        assert_eq!(to_mgrs(15.0, 0.0, 0), "33NWA");
        assert_eq!(to_mgrs(-177.0, 0.5, 1), "01NEA06");
        assert_eq!(to_mgrs(3.0, -45.0, 5), "31GEL0000017050");
        assert_eq!(to_mgrs(-73.9857, 40.7484, 5), "18TWL8562811322");
    }

    #[test]
    fn test_zone_31v_reroutes_to_32() {
        let s = to_mgrs(3.5, 60.0, 5);
        assert!(s.starts_with("32V"), "got {s}");
        let s = to_mgrs(2.5, 60.0, 5);
        assert!(s.starts_with("31V"), "got {s}");
    }

    #[test]
    fn test_utm_to_mgrs_reroutes_31v() {
        let m = mgrs();
        let (lon, lat) = (3.5_f64.to_radians(), 60.0_f64.to_radians());
        let utm31 = m.utm().clone().with_zone_override(31).unwrap().geodetic_to_utm(lon, lat).unwrap();
        assert_eq!(utm31.zone, 31);
        let reference = m.utm_to_mgrs(&utm31, 5).unwrap();
        assert_eq!(reference.zone(), 32);
    }

    #[test]
    fn test_letters_never_i_or_o() {
        let m = mgrs();
        let mut lat = -79.5;
        while lat <= 83.5 {
            let mut lon = -179.5;
            while lon < 180.0 {
                let r = m
                    .geodetic_to_mgrs(f64::to_radians(lon), f64::to_radians(lat), 5)
                    .unwrap();
                for l in r.letters() {
                    assert!(l != LETTER_I && l != LETTER_O, "{r} at ({lon}, {lat})");
                }
                lon += 7.3;
            }
            lat += 3.1;
        }
        for lat in [-89.0, -85.0, -81.0, 84.5, 87.0, 89.9] {
            let mut lon = -180.0;
            while lon < 180.0 {
                let r = m
                    .geodetic_to_mgrs(f64::to_radians(lon), f64::to_radians(lat), 5)
                    .unwrap();
                for l in r.letters() {
                    assert!(l != LETTER_I && l != LETTER_O, "{r} at ({lon}, {lat})");
                }
                lon += 15.0;
            }
        }
    }

    #[test]
    fn test_roundtrip_one_metre() {
        let m = mgrs();
        let cases = [
            (15.0, 52.0),
            (-73.9857, 40.7484),
            (151.2093, -33.8688),
            (2.2945, 48.8584),
            (-155.5, 19.6),
            (3.5, 60.0),
            (20.0, 78.0),
            (0.0, -79.9),
            (0.0, 86.0),
            (-120.0, -85.0),
            (100.0, 84.2),
        ];
        for (lon_deg, lat_deg) in cases {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let s = m.geodetic_to_mgrs(lon, lat, 5).unwrap().to_string();
            let (lon2, lat2) = m.mgrs_to_geodetic(&s).unwrap();
            // 1 m is about 1.6e-7 rad; allow for truncation to the metre
            let tol = 1.0e-6;
            assert_relative_eq!(lat2, lat, epsilon = tol);
            assert_relative_eq!(fold_longitude(lon2) * lat.cos(), lon * lat.cos(), epsilon = tol);
        }
    }

    #[test]
    fn test_polar_routes_through_ups() {
        let s = to_mgrs(0.0, 85.0, 5);
        assert!(s.starts_with('Y') || s.starts_with('Z'), "got {s}");
        assert!(!s.starts_with(char::is_numeric));

        let s = to_mgrs(45.0, -85.0, 5);
        assert!(s.starts_with('A') || s.starts_with('B'), "got {s}");

        // Poleward of 84°N the UTM bands are not used even though band X reaches 84.5°
        assert!(to_mgrs(100.0, 84.2, 5).starts_with('Z'));
        assert!(to_mgrs(0.0, 84.5, 5).starts_with('Z'));
        assert!(to_mgrs(0.0, -80.2, 5).starts_with('B'));
    }

    #[test]
    fn test_north_pole() {
        assert_eq!(to_mgrs(0.0, 90.0, 5), "ZAH0000000000");
        let (_, lat) = mgrs().mgrs_to_geodetic("ZAH0000000000").unwrap();
        assert_relative_eq!(lat, FRAC_PI_2);
    }

    #[test]
    fn test_precision_validation() {
        assert_eq!(
            mgrs().geodetic_to_mgrs(0.0, 0.0, 6),
            Err(ProjError::MgrsPrecision(6))
        );
        assert!(matches!(
            mgrs().geodetic_to_mgrs(0.0, 1.6, 5),
            Err(ProjError::Lat(_))
        ));
        assert!(matches!(
            mgrs().geodetic_to_mgrs(-3.2, 0.0, 5),
            Err(ProjError::Lon(_))
        ));
    }

    #[test]
    fn test_reduced_precision_truncates() {
        let full = to_mgrs(15.0, 52.0, 5);
        let coarse = to_mgrs(15.0, 52.0, 2);
        assert_eq!(&coarse[..5], &full[..5]);
        assert_eq!(coarse.len(), 9);
    }

    #[test]
    fn test_mgrs_to_utm_checks() {
        let m = mgrs();
        let x32 = MgrsCoord::parse("32XMH0000000000").unwrap();
        assert!(matches!(m.mgrs_to_utm(&x32), Err(ProjError::MgrsString(_))));

        // Zone 33 uses second letters S..Z
        let wrong_column = MgrsCoord::parse("33UAB0000000000").unwrap();
        assert!(matches!(m.mgrs_to_utm(&wrong_column), Err(ProjError::MgrsString(_))));

        // Band N square far south of the equator
        let out_of_band = MgrsCoord::parse("33NVV0000000000").unwrap();
        assert!(matches!(m.mgrs_to_utm(&out_of_band), Err(ProjError::MgrsString(_))));

        let polar = MgrsCoord::parse("ZAH0000000000").unwrap();
        assert!(matches!(m.mgrs_to_utm(&polar), Err(ProjError::MgrsString(_))));
    }

    #[test]
    fn test_mgrs_to_ups_checks() {
        let m = mgrs();
        let zoned = MgrsCoord::parse("33UWT0000000000").unwrap();
        assert!(matches!(m.mgrs_to_ups(&zoned), Err(ProjError::MgrsString(_))));

        let not_polar_band = MgrsCoord::parse("CAH0000000000").unwrap();
        assert!(matches!(m.mgrs_to_ups(&not_polar_band), Err(ProjError::MgrsString(_))));

        let skipped_column = MgrsCoord::parse("ZDH0000000000").unwrap();
        assert!(matches!(m.mgrs_to_ups(&skipped_column), Err(ProjError::MgrsString(_))));

        let row_too_high = MgrsCoord::parse("YZQ0000000000").unwrap();
        assert!(matches!(m.mgrs_to_ups(&row_too_high), Err(ProjError::MgrsString(_))));
    }

    #[test]
    fn test_ups_mgrs_roundtrip() {
        let m = mgrs();
        let pole = UpsCoord {
            hemisphere: Hemisphere::North,
            easting: 1_234_567.0,
            northing: 2_345_678.0,
        };
        assert_eq!(m.ups_to_mgrs(&pole, 5).unwrap().to_string(), "YQL3456745678");

        for (hemisphere, easting, northing) in [
            (Hemisphere::North, 2_000_000.0, 2_000_000.0),
            (Hemisphere::North, 1_234_567.0, 2_345_678.0),
            (Hemisphere::North, 2_600_000.0, 1_500_000.0),
            (Hemisphere::South, 1_500_000.0, 2_500_000.0),
            (Hemisphere::South, 2_950_000.0, 1_050_000.0),
        ] {
            let ups = UpsCoord {
                hemisphere,
                easting,
                northing,
            };
            let reference = m.ups_to_mgrs(&ups, 5).unwrap();
            let back = m.mgrs_to_ups(&reference).unwrap();
            assert_eq!(back.hemisphere, hemisphere);
            assert_relative_eq!(back.easting, easting, epsilon = 1e-6);
            assert_relative_eq!(back.northing, northing, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_utm_mgrs_roundtrip() {
        let m = mgrs();
        let utm = UtmCoord {
            zone: 18,
            hemisphere: Hemisphere::North,
            easting: 585_628.0,
            northing: 4_511_322.0,
        };
        let reference = m.utm_to_mgrs(&utm, 5).unwrap();
        assert_eq!(reference.to_string(), "18TWL8562811322");
        let back = m.mgrs_to_utm(&reference).unwrap();
        assert_eq!(back, utm);
    }

    #[test]
    fn test_utm_to_mgrs_at_easting_limits() {
        let m = mgrs();
        for zone in 1..=60 {
            let grid = grid_values(zone, WGS84.code());
            for easting in [100_000.0, 899_999.5, 899_999.6, 900_000.0] {
                let utm = UtmCoord {
                    zone,
                    hemisphere: Hemisphere::North,
                    easting,
                    northing: 5_000_000.0,
                };
                let reference = m.utm_to_mgrs(&utm, 5).unwrap();
                let [_, ltr2, _] = reference.letters();
                assert!((grid.ltr2_low..=grid.ltr2_high).contains(&ltr2), "{reference}");
                let back = m.mgrs_to_utm(&reference).unwrap();
                assert!((back.easting - easting).abs() <= 1.0, "{reference}: {}", back.easting);
            }
        }

        let edge = UtmCoord {
            zone: 1,
            hemisphere: Hemisphere::North,
            easting: 900_000.0,
            northing: 5_000_000.0,
        };
        assert_eq!(m.utm_to_mgrs(&edge, 5).unwrap().to_string(), "01THL9999900000");

        // Rounding to the 100 km square must not spill into a tenth column
        let coarse = UtmCoord {
            zone: 33,
            easting: 860_000.0,
            ..edge
        };
        assert_eq!(m.utm_to_mgrs(&coarse, 0).unwrap().to_string(), "33TZL");
    }

    #[test]
    fn test_utm_to_mgrs_letters_stay_in_alphabet() {
        let m = mgrs();
        let rows = [
            (Hemisphere::North, 0.0),
            (Hemisphere::North, 2_500_000.0),
            (Hemisphere::North, 5_000_000.0),
            (Hemisphere::North, 8_000_000.0),
            (Hemisphere::South, 2_000_000.0),
            (Hemisphere::South, 5_000_000.0),
            (Hemisphere::South, 9_900_000.0),
        ];
        for zone in 1..=60 {
            for (hemisphere, northing) in rows {
                let mut easting = 100_000.0;
                while easting <= 900_000.0 {
                    let utm = UtmCoord {
                        zone,
                        hemisphere,
                        easting,
                        northing,
                    };
                    let r = m.utm_to_mgrs(&utm, 5).unwrap();
                    for l in r.letters() {
                        assert!(l <= LETTER_Z && l != LETTER_I && l != LETTER_O, "{r} from {utm}");
                    }
                    easting += 50_000.0;
                }
            }
        }
    }

    #[test]
    fn test_mgrs_longitude_across_antimeridian() {
        let (lon, _) = mgrs().mgrs_to_geodetic("60PZQ5000000000").unwrap();
        assert!(lon > -PI && lon <= PI, "lon = {lon}");
        assert_relative_eq!(lon.to_degrees(), -179.824, epsilon = 1e-3);
    }

    #[test]
    fn test_ups_to_mgrs_rejects_squares_outside_the_grid() {
        let m = mgrs();
        let ups = |hemisphere, easting, northing| UpsCoord {
            hemisphere,
            easting,
            northing,
        };

        // Below the Y/Z false northing
        assert!(matches!(
            m.ups_to_mgrs(&ups(Hemisphere::North, 1_500_000.0, 1_250_000.0), 5),
            Err(ProjError::Northing(_))
        ));
        // Past row P in the north
        assert!(matches!(
            m.ups_to_mgrs(&ups(Hemisphere::North, 1_500_000.0, 2_750_000.0), 5),
            Err(ProjError::Northing(_))
        ));
        // West of the A/B false easting
        assert!(matches!(
            m.ups_to_mgrs(&ups(Hemisphere::South, 500_000.0, 2_000_000.0), 5),
            Err(ProjError::Easting(_))
        ));
        // Past column J in band Z
        assert!(matches!(
            m.ups_to_mgrs(&ups(Hemisphere::North, 2_750_000.0, 2_000_000.0), 5),
            Err(ProjError::Easting(_))
        ));
    }
}
