//! MGRS lettering tables: latitude bands, UPS grid letters, and the
//! per-zone 100 km square lettering sets.
//!
//! Letters are handled as alphabet indices (`A` = 0 .. `Z` = 25).

use crate::error::ProjError;

pub const LETTER_A: u8 = 0;
pub const LETTER_B: u8 = 1;
pub const LETTER_C: u8 = 2;
pub const LETTER_D: u8 = 3;
pub const LETTER_E: u8 = 4;
pub const LETTER_F: u8 = 5;
pub const LETTER_G: u8 = 6;
pub const LETTER_H: u8 = 7;
pub const LETTER_I: u8 = 8;
pub const LETTER_J: u8 = 9;
pub const LETTER_K: u8 = 10;
pub const LETTER_L: u8 = 11;
pub const LETTER_M: u8 = 12;
pub const LETTER_N: u8 = 13;
pub const LETTER_O: u8 = 14;
pub const LETTER_P: u8 = 15;
pub const LETTER_Q: u8 = 16;
pub const LETTER_R: u8 = 17;
pub const LETTER_S: u8 = 18;
pub const LETTER_T: u8 = 19;
pub const LETTER_U: u8 = 20;
pub const LETTER_V: u8 = 21;
pub const LETTER_W: u8 = 22;
pub const LETTER_X: u8 = 23;
pub const LETTER_Y: u8 = 24;
pub const LETTER_Z: u8 = 25;

/// Alphabet index of an ASCII letter, case-insensitive.
pub fn letter_index(c: char) -> Option<u8> {
    c.is_ascii_alphabetic()
        .then(|| c.to_ascii_uppercase() as u8 - b'A')
}

pub fn letter_char(index: u8) -> char {
    (b'A' + index) as char
}

/// One 8-degree (12 for X) latitude band of the UTM part of MGRS.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatitudeBand {
    pub letter: u8,
    /// Smallest northing found in the band, metres.
    pub min_northing: f64,
    /// Upper latitude, degrees.
    pub north: f64,
    /// Lower latitude, degrees.
    pub south: f64,
}

const fn band(letter: u8, min_northing: f64, north: f64, south: f64) -> LatitudeBand {
    LatitudeBand {
        letter,
        min_northing,
        north,
        south,
    }
}

pub const LATITUDE_BANDS: [LatitudeBand; 20] = [
    band(LETTER_C, 1_100_000.0, -72.0, -80.5),
    band(LETTER_D, 2_000_000.0, -64.0, -72.0),
    band(LETTER_E, 2_800_000.0, -56.0, -64.0),
    band(LETTER_F, 3_700_000.0, -48.0, -56.0),
    band(LETTER_G, 4_600_000.0, -40.0, -48.0),
    band(LETTER_H, 5_500_000.0, -32.0, -40.0),
    band(LETTER_J, 6_400_000.0, -24.0, -32.0),
    band(LETTER_K, 7_300_000.0, -16.0, -24.0),
    band(LETTER_L, 8_200_000.0, -8.0, -16.0),
    band(LETTER_M, 9_100_000.0, 0.0, -8.0),
    band(LETTER_N, 0.0, 8.0, 0.0),
    band(LETTER_P, 800_000.0, 16.0, 8.0),
    band(LETTER_Q, 1_700_000.0, 24.0, 16.0),
    band(LETTER_R, 2_600_000.0, 32.0, 24.0),
    band(LETTER_S, 3_500_000.0, 40.0, 32.0),
    band(LETTER_T, 4_400_000.0, 48.0, 40.0),
    band(LETTER_U, 5_300_000.0, 56.0, 48.0),
    band(LETTER_V, 6_200_000.0, 64.0, 56.0),
    band(LETTER_W, 7_000_000.0, 72.0, 64.0),
    band(LETTER_X, 7_900_000.0, 84.5, 72.0),
];

/// Band letter for a latitude in radians.
pub fn latitude_letter(lat: f64) -> Result<u8, ProjError> {
    let lat_deg = lat.to_degrees();
    if (72.0..84.5).contains(&lat_deg) {
        Ok(LETTER_X)
    } else if lat_deg > -80.5 && lat_deg < 72.0 {
        let index = (lat + 80.0_f64.to_radians()) / 8.0_f64.to_radians() + 1.0e-12;
        Ok(LATITUDE_BANDS[index as usize].letter)
    } else {
        Err(ProjError::Lat(format!(
            "{lat_deg:.6} degrees has no MGRS latitude band"
        )))
    }
}

/// Table entry for a band letter; I and O are skipped, A, B, Y and Z are polar.
pub fn latitude_band(letter: u8) -> Result<&'static LatitudeBand, ProjError> {
    let index = match letter {
        LETTER_C..=LETTER_H => letter - 2,
        LETTER_J..=LETTER_N => letter - 3,
        LETTER_P..=LETTER_X => letter - 4,
        _ => {
            return Err(ProjError::MgrsString(format!(
                "{} is not a latitude band",
                letter_char(letter)
            )))
        }
    };
    Ok(&LATITUDE_BANDS[index as usize])
}

pub fn latitude_band_min_northing(letter: u8) -> Result<f64, ProjError> {
    Ok(latitude_band(letter)?.min_northing)
}

/// `(north, south)` limits of a band, radians.
pub fn latitude_range(letter: u8) -> Result<(f64, f64), ProjError> {
    let band = latitude_band(letter)?;
    Ok((band.north.to_radians(), band.south.to_radians()))
}

/// Lettering constants of one UPS quadrant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpsLetters {
    pub letter: u8,
    pub ltr2_low: u8,
    pub ltr2_high: u8,
    pub ltr3_high: u8,
    pub false_easting: f64,
    pub false_northing: f64,
}

pub const UPS_LETTERS: [UpsLetters; 4] = [
    UpsLetters {
        letter: LETTER_A,
        ltr2_low: LETTER_J,
        ltr2_high: LETTER_Z,
        ltr3_high: LETTER_Z,
        false_easting: 800_000.0,
        false_northing: 800_000.0,
    },
    UpsLetters {
        letter: LETTER_B,
        ltr2_low: LETTER_A,
        ltr2_high: LETTER_R,
        ltr3_high: LETTER_Z,
        false_easting: 2_000_000.0,
        false_northing: 800_000.0,
    },
    UpsLetters {
        letter: LETTER_Y,
        ltr2_low: LETTER_J,
        ltr2_high: LETTER_Z,
        ltr3_high: LETTER_P,
        false_easting: 800_000.0,
        false_northing: 1_300_000.0,
    },
    UpsLetters {
        letter: LETTER_Z,
        ltr2_low: LETTER_A,
        ltr2_high: LETTER_J,
        ltr3_high: LETTER_P,
        false_easting: 2_000_000.0,
        false_northing: 1_300_000.0,
    },
];

pub fn ups_letters(letter: u8) -> Option<&'static UpsLetters> {
    UPS_LETTERS.iter().find(|u| u.letter == letter)
}

/// Second-letter range and third-letter false northing of a UTM zone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridValues {
    pub ltr2_low: u8,
    pub ltr2_high: u8,
    pub false_northing: f64,
}

const CLARKE_1866: [u8; 2] = *b"CC";
const CLARKE_1880: [u8; 2] = *b"CD";
const BESSEL_1841: [u8; 2] = *b"BR";
const BESSEL_1841_NAMIBIA: [u8; 2] = *b"BN";

pub fn grid_values(zone: u8, ellipsoid_code: [u8; 2]) -> GridValues {
    let set_number = match zone % 6 {
        0 => 6,
        n => n,
    };

    // A code would have to match all four old ellipsoids at once, so the
    // AA lettering scheme is never selected.
    let aa_pattern = [CLARKE_1866, CLARKE_1880, BESSEL_1841, BESSEL_1841_NAMIBIA]
        .iter()
        .all(|code| *code == ellipsoid_code);

    let (ltr2_low, ltr2_high) = match set_number {
        1 | 4 => (LETTER_A, LETTER_H),
        2 | 5 => (LETTER_J, LETTER_R),
        _ => (LETTER_S, LETTER_Z),
    };

    let even = set_number % 2 == 0;
    let false_northing = match (aa_pattern, even) {
        (false, true) => 1_500_000.0,
        (false, false) => 0.0,
        (true, true) => 500_000.0,
        (true, false) => 1_000_000.0,
    };

    GridValues {
        ltr2_low,
        ltr2_high,
        false_northing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_band_table_is_contiguous() {
        for pair in LATITUDE_BANDS.windows(2) {
            assert_relative_eq!(pair[0].north, pair[1].south);
            assert!(pair[0].letter < pair[1].letter);
            assert_ne!(pair[1].letter, LETTER_I);
            assert_ne!(pair[1].letter, LETTER_O);
        }
    }

    #[test]
    fn test_latitude_letter() {
        let cases = [
            (0.0, 'N'),
            (-0.1, 'M'),
            (-80.0, 'C'),
            (52.0, 'U'),
            (60.0, 'V'),
            (71.9, 'W'),
            (72.0, 'X'),
            (84.4, 'X'),
        ];
        for (lat_deg, expected) in cases {
            let letter = latitude_letter(f64::to_radians(lat_deg)).unwrap();
            assert_eq!(letter_char(letter), expected, "lat = {lat_deg}");
        }
    }

    #[test]
    fn test_latitude_letter_cutoffs() {
        assert!(matches!(
            latitude_letter(84.5_f64.to_radians()),
            Err(ProjError::Lat(_))
        ));
        assert!(matches!(
            latitude_letter((-80.5_f64).to_radians()),
            Err(ProjError::Lat(_))
        ));
    }

    #[test]
    fn test_band_lookup() {
        assert_relative_eq!(latitude_band_min_northing(LETTER_C).unwrap(), 1_100_000.0);
        assert_relative_eq!(latitude_band_min_northing(LETTER_X).unwrap(), 7_900_000.0);
        let (north, south) = latitude_range(LETTER_U).unwrap();
        assert_relative_eq!(north, 56.0_f64.to_radians());
        assert_relative_eq!(south, 48.0_f64.to_radians());

        for bad in [LETTER_A, LETTER_B, LETTER_I, LETTER_O, LETTER_Y, LETTER_Z] {
            assert!(matches!(latitude_band(bad), Err(ProjError::MgrsString(_))));
        }
    }

    #[test]
    fn test_grid_values_cycle() {
        let z1 = grid_values(1, *b"WE");
        assert_eq!((z1.ltr2_low, z1.ltr2_high), (LETTER_A, LETTER_H));
        assert_relative_eq!(z1.false_northing, 0.0);

        let z2 = grid_values(2, *b"WE");
        assert_eq!((z2.ltr2_low, z2.ltr2_high), (LETTER_J, LETTER_R));
        assert_relative_eq!(z2.false_northing, 1_500_000.0);

        let z6 = grid_values(6, *b"WE");
        assert_eq!((z6.ltr2_low, z6.ltr2_high), (LETTER_S, LETTER_Z));
        assert_relative_eq!(z6.false_northing, 1_500_000.0);

        assert_eq!(grid_values(7, *b"WE"), z1);
    }

    #[test]
    fn test_grid_values_ignore_old_ellipsoids() {
        for code in [CLARKE_1866, CLARKE_1880, BESSEL_1841, BESSEL_1841_NAMIBIA] {
            assert_eq!(grid_values(33, code), grid_values(33, *b"WE"));
        }
    }

    #[test]
    fn test_letter_helpers() {
        assert_eq!(letter_index('a'), Some(LETTER_A));
        assert_eq!(letter_index('Z'), Some(LETTER_Z));
        assert_eq!(letter_index('5'), None);
        assert_eq!(letter_char(LETTER_V), 'V');
        assert_eq!(ups_letters(LETTER_Y).unwrap().ltr3_high, LETTER_P);
        assert!(ups_letters(LETTER_C).is_none());
    }
}
