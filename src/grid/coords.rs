use std::fmt;
use std::str::FromStr;

use crate::error::ProjError;
use crate::grid::bands::{letter_char, letter_index, LETTER_I, LETTER_O};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn from_latitude(lat: f64) -> Self {
        if lat < 0.0 {
            Self::South
        } else {
            Self::North
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
        }
    }
}

impl TryFrom<char> for Hemisphere {
    type Error = ProjError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'N' | 'n' => Ok(Self::North),
            'S' | 's' => Ok(Self::South),
            other => Err(ProjError::Hemisphere(other)),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A UTM grid position. Zone validity is checked by the converters, not here.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UtmCoord {
    pub zone: u8,
    pub hemisphere: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

impl fmt::Display for UtmCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {:.3} {:.3}",
            self.zone, self.hemisphere, self.easting, self.northing
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpsCoord {
    pub hemisphere: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

impl fmt::Display for UpsCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.3} {:.3}",
            self.hemisphere, self.easting, self.northing
        )
    }
}

/// A parsed or computed MGRS reference.
///
/// `zone` is 0 for polar (UPS) references. `letters` holds alphabet indices
/// and never contains I or O. `easting`/`northing` are metres inside the
/// 100 km square, already reduced to `precision` digits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MgrsCoord {
    zone: u8,
    letters: [u8; 3],
    easting: f64,
    northing: f64,
    precision: u8,
}

impl MgrsCoord {
    pub const MAX_PRECISION: u8 = 5;

    /// Build from absolute (already rounded) grid values. Easting and northing
    /// are reduced modulo 100 km; values that would round up to the next
    /// square saturate at 99999.
    pub(crate) fn from_grid(
        zone: u8,
        letters: [u8; 3],
        easting: f64,
        northing: f64,
        precision: u8,
    ) -> Self {
        let reduce = |v: f64| {
            let v = v % 100_000.0;
            if v >= 99_999.5 {
                99_999.0
            } else {
                v
            }
        };
        Self {
            zone,
            letters,
            easting: reduce(easting),
            northing: reduce(northing),
            precision,
        }
    }

    /// Split an MGRS string into zone, letters, and in-square offsets.
    pub fn parse(s: &str) -> Result<Self, ProjError> {
        let bad = |why: &str| ProjError::MgrsString(format!("{s:?}: {why}"));
        let mut rest = s.trim_start();

        let zone_len = rest.chars().take_while(char::is_ascii_digit).count();
        if zone_len > 2 {
            return Err(bad("zone has more than two digits"));
        }
        let zone = if zone_len > 0 {
            let zone: u8 = rest[..zone_len]
                .parse()
                .map_err(|_| bad("unreadable zone"))?;
            if !(1..=60).contains(&zone) {
                return Err(bad("zone must be between 1 and 60"));
            }
            zone
        } else {
            0
        };
        rest = rest[zone_len..].trim_start();

        let letter_len = rest.chars().take_while(char::is_ascii_alphabetic).count();
        if letter_len != 3 {
            return Err(bad("expected three grid letters"));
        }
        let mut letters = [0u8; 3];
        for (slot, c) in letters.iter_mut().zip(rest.chars()) {
            let index = letter_index(c).ok_or_else(|| bad("expected three grid letters"))?;
            if index == LETTER_I || index == LETTER_O {
                return Err(bad("grid letters cannot be I or O"));
            }
            *slot = index;
        }
        rest = rest[letter_len..].trim_start();

        let digits: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(bad("unexpected characters after the grid letters"));
        }
        if digits.len() > 10 || digits.len() % 2 != 0 {
            return Err(bad("easting and northing need the same number of digits"));
        }

        let n = digits.len() / 2;
        let (easting, northing) = if n > 0 {
            let multiplier = 10f64.powi(5 - n as i32);
            let east: u32 = digits[..n].parse().map_err(|_| bad("unreadable easting"))?;
            let north: u32 = digits[n..].parse().map_err(|_| bad("unreadable northing"))?;
            (f64::from(east) * multiplier, f64::from(north) * multiplier)
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            zone,
            letters,
            easting,
            northing,
            precision: n as u8,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_polar(&self) -> bool {
        self.zone == 0
    }

    /// Grid letters as alphabet indices.
    pub fn letters(&self) -> [u8; 3] {
        self.letters
    }

    /// Grid letters as text, e.g. `"UVB"`.
    pub fn letters_str(&self) -> String {
        self.letters.iter().map(|&l| letter_char(l)).collect()
    }

    pub fn easting(&self) -> f64 {
        self.easting
    }

    pub fn northing(&self) -> f64 {
        self.northing
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl FromStr for MgrsCoord {
    type Err = ProjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MgrsCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.zone != 0 {
            write!(f, "{:02}", self.zone)?;
        }
        f.write_str(&self.letters_str())?;

        let precision = usize::from(self.precision);
        if precision > 0 {
            let divisor = 10f64.powi(5 - self.precision as i32);
            let east = (self.easting / divisor) as u64;
            let north = (self.northing / divisor) as u64;
            write!(f, "{east:0precision$}{north:0precision$}")?;
        }
        Ok(())
    }
}
