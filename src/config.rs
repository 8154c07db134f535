//! TOML configuration for the converters and the shapefile reader.
//!
//! ```toml
//! ellipsoid = "WGS84"
//! name_field_pattern = ".*NAME.*"
//! mgrs_precision = 5
//! ```
//!
//! A custom ellipsoid is given as a table:
//!
//! ```toml
//! [ellipsoid]
//! semi_major_axis = 6378206.4
//! inverse_flattening = 294.9786982
//! code = "CC"
//! ```

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ConfigError, ProjError, ShapefileError};
use crate::grid::coords::MgrsCoord;
use crate::grid::{Mgrs, Ups, Utm};
use crate::proj::ellipsoid::Ellipsoid;
use crate::shp::{Dbf, Shapefile};

fn default_ellipsoid() -> EllipsoidConfig {
    EllipsoidConfig::Named("WGS84".to_string())
}
fn default_name_field_pattern() -> String {
    ".*NAME.*".to_string()
}
fn default_mgrs_precision() -> u8 {
    MgrsCoord::MAX_PRECISION
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EllipsoidConfig {
    /// A built-in ellipsoid by name or two-letter MGRS code.
    Named(String),
    Custom {
        semi_major_axis: f64,
        inverse_flattening: f64,
        code: String,
    },
}

impl EllipsoidConfig {
    pub fn build(&self) -> Result<Ellipsoid, ConfigError> {
        let ellipsoid = match self {
            Self::Named(name) => {
                Ellipsoid::by_name(name).ok_or_else(|| ConfigError::UnknownEllipsoid(name.clone()))?
            }
            Self::Custom {
                semi_major_axis,
                inverse_flattening,
                code,
            } => {
                let code: [u8; 2] = code
                    .as_bytes()
                    .try_into()
                    .ok()
                    .filter(|c: &[u8; 2]| c.iter().all(u8::is_ascii_alphabetic))
                    .ok_or_else(|| ConfigError::EllipsoidCode(code.clone()))?;
                Ellipsoid::from_inverse_flattening(
                    *semi_major_axis,
                    *inverse_flattening,
                    code.map(|b| b.to_ascii_uppercase()),
                )
            }
        };
        ellipsoid.validate()?;
        Ok(ellipsoid)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct GridConfig {
    #[serde(default = "default_ellipsoid")]
    pub ellipsoid: EllipsoidConfig,
    /// Regex a DBF column name must match in full to supply shape names.
    #[serde(default = "default_name_field_pattern")]
    pub name_field_pattern: String,
    #[serde(default = "default_mgrs_precision")]
    pub mgrs_precision: u8,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            ellipsoid: default_ellipsoid(),
            name_field_pattern: default_name_field_pattern(),
            mgrs_precision: default_mgrs_precision(),
        }
    }
}

impl GridConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ellipsoid.build()?;
        self.name_pattern()?;
        if self.mgrs_precision > MgrsCoord::MAX_PRECISION {
            return Err(ProjError::MgrsPrecision(self.mgrs_precision).into());
        }
        Ok(())
    }

    pub fn ellipsoid(&self) -> Result<Ellipsoid, ConfigError> {
        self.ellipsoid.build()
    }

    /// The name field pattern, anchored so it has to match a whole column name.
    pub fn name_pattern(&self) -> Result<Regex, ConfigError> {
        Ok(Regex::new(&format!("^(?:{})$", self.name_field_pattern))?)
    }

    pub fn utm(&self) -> Result<Utm, ConfigError> {
        Ok(Utm::new(self.ellipsoid()?)?)
    }

    pub fn ups(&self) -> Result<Ups, ConfigError> {
        Ok(Ups::new(self.ellipsoid()?)?)
    }

    pub fn mgrs(&self) -> Result<Mgrs, ConfigError> {
        Ok(Mgrs::new(self.ellipsoid()?)?)
    }

    /// MGRS reference for a geodetic position (radians) at the configured precision.
    pub fn mgrs_reference(&self, mgrs: &Mgrs, lon: f64, lat: f64) -> Result<MgrsCoord, ProjError> {
        mgrs.geodetic_to_mgrs(lon, lat, self.mgrs_precision)
    }

    /// Open a shapefile whose names come from the first DBF column matching
    /// `name_field_pattern`. Without `dbf` the sibling `.dbf` is used if present.
    pub fn open_shapefile<P: AsRef<Path>>(
        &self,
        path: P,
        dbf: Option<&Path>,
    ) -> Result<Shapefile, ConfigError> {
        let pattern = self.name_pattern()?;
        let shapefile = match dbf {
            Some(dbf) => {
                let table = Dbf::open(dbf).map_err(ShapefileError::from)?;
                Shapefile::open_without_dbf(path)?.with_dbf_matching(table, &pattern)
            }
            None => Shapefile::open_matching(path, &pattern)?,
        };
        Ok(shapefile)
    }
}
