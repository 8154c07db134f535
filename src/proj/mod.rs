pub mod common;
pub mod ellipsoid;
pub mod stereographic;
pub mod transverse_mercator;

use crate::error::{ProjError, ProjWarning};

/// A conversion result together with the advisory warnings raised while computing it.
#[derive(Clone, Debug, PartialEq)]
pub struct Checked<T> {
    pub value: T,
    pub warnings: Vec<ProjWarning>,
}

impl<T> Checked<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: ProjWarning) {
        self.warnings.push(warning);
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Checked<U> {
        Checked {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Drop the warnings, forwarding each to the logger.
    pub fn logged(self) -> T {
        for w in &self.warnings {
            log::warn!("{w}");
        }
        self.value
    }
}

/// Trait for map projections supporting forward and inverse transforms.
pub trait Projection: Send + Sync {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing)
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    fn ellipsoid(&self) -> &ellipsoid::Ellipsoid;
}
