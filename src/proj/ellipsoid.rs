use crate::error::ProjError;

/// Reference ellipsoid parameters.
///
/// All derived quantities, including the true-meridional-distance series
/// coefficients, are computed once at construction. Changing the axis or the
/// flattening means building a new value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Flattening (dimensionless)
    pub f: f64,
    /// Semi-minor axis: a * (1 - f)
    pub b: f64,
    /// First eccentricity squared: 2f - f^2
    pub e2: f64,
    /// Second eccentricity squared: e^2 / (1 - e^2)
    pub ep2: f64,
    /// Third flattening: (a - b) / (a + b)
    pub n: f64,
    /// True meridional distance coefficients, see [`crate::proj::common::meridional_distance`].
    pub ap: f64,
    pub bp: f64,
    pub cp: f64,
    pub dp: f64,
    pub ep: f64,
    code: [u8; 2],
}

impl Ellipsoid {
    pub const fn new(a: f64, f: f64, code: [u8; 2]) -> Self {
        let b = a * (1.0 - f);
        let e2 = 2.0 * f - f * f;
        let ep2 = e2 / (1.0 - e2);

        let n = (a - b) / (a + b);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        let n5 = n4 * n;

        let ap = a * (1.0 - n + 5.0 * (n2 - n3) / 4.0 + 81.0 * (n4 - n5) / 64.0);
        let bp = 3.0 * a * (n - n2 + 7.0 * (n3 - n4) / 8.0 + 55.0 * n5 / 64.0) / 2.0;
        let cp = 15.0 * a * (n2 - n3 + 3.0 * (n4 - n5) / 4.0) / 16.0;
        let dp = 35.0 * a * (n3 - n4 + 11.0 * n5 / 16.0) / 48.0;
        let ep = 315.0 * a * (n4 - n5) / 512.0;

        Self {
            a,
            f,
            b,
            e2,
            ep2,
            n,
            ap,
            bp,
            cp,
            dp,
            ep,
            code,
        }
    }

    /// Build from semi-major axis and inverse flattening.
    pub const fn from_inverse_flattening(a: f64, inv_f: f64, code: [u8; 2]) -> Self {
        Self::new(a, 1.0 / inv_f, code)
    }

    /// Get the first eccentricity (computed at runtime).
    pub fn eccentricity(&self) -> f64 {
        self.e2.sqrt()
    }

    pub fn inverse_flattening(&self) -> f64 {
        1.0 / self.f
    }

    /// Two-letter MGRS ellipsoid code, e.g. `WE` for WGS 84.
    pub fn code(&self) -> [u8; 2] {
        self.code
    }

    /// Check the parameters every projection requires before use.
    pub fn validate(&self) -> Result<(), ProjError> {
        if self.a <= 0.0 {
            return Err(ProjError::SemiMajorAxis(self.a));
        }
        let inv_f = self.inverse_flattening();
        if !(250.0..=350.0).contains(&inv_f) {
            return Err(ProjError::InverseFlattening(inv_f));
        }
        Ok(())
    }

    /// Look up a named ellipsoid by name or by its MGRS code.
    pub fn by_name(name: &str) -> Option<Self> {
        let key = name.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        let found = match key.as_str() {
            "WGS84" | "WGS_84" | "WE" => WGS84,
            "GRS80" | "GRS_80" | "RF" => GRS80,
            "CLARKE_1866" | "CLARKE1866" | "CC" => CLARKE_1866,
            "CLARKE_1880" | "CLARKE1880" | "CD" => CLARKE_1880,
            "BESSEL_1841" | "BESSEL1841" | "BR" => BESSEL_1841,
            "BESSEL_1841_NAMIBIA" | "BN" => BESSEL_1841_NAMIBIA,
            _ => return None,
        };
        Some(found)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        WGS84
    }
}

pub const WGS84: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_223_563, *b"WE");
pub const GRS80: Ellipsoid = Ellipsoid::new(6_378_137.0, 1.0 / 298.257_222_101, *b"RF");
pub const CLARKE_1866: Ellipsoid =
    Ellipsoid::from_inverse_flattening(6_378_206.4, 294.978_698_2, *b"CC");
pub const CLARKE_1880: Ellipsoid =
    Ellipsoid::from_inverse_flattening(6_378_249.145, 293.465, *b"CD");
pub const BESSEL_1841: Ellipsoid =
    Ellipsoid::from_inverse_flattening(6_377_397.155, 299.152_812_8, *b"BR");
pub const BESSEL_1841_NAMIBIA: Ellipsoid =
    Ellipsoid::from_inverse_flattening(6_377_483.865, 299.152_812_8, *b"BN");
