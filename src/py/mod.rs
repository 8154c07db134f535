use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::config::{EllipsoidConfig, GridConfig};
use crate::error::ConfigError;

mod convert;
mod shapes;

fn config_error(e: ConfigError) -> PyErr {
    match e {
        ConfigError::Io(_) => PyIOError::new_err(e.to_string()),
        ConfigError::Shapefile(e) => shapes::shapefile_error(e),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Settings from the TOML file at `config`, or the defaults. An explicit
/// ellipsoid name wins over the file's.
fn settings(config: Option<&str>, ellipsoid: Option<&str>) -> PyResult<GridConfig> {
    let mut settings = match config {
        Some(path) => GridConfig::from_file(path).map_err(config_error)?,
        None => GridConfig::default(),
    };
    if let Some(name) = ellipsoid {
        settings.ellipsoid = EllipsoidConfig::Named(name.to_string());
    }
    Ok(settings)
}

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(convert::geodetic_to_mgrs, m)?)?;
    m.add_function(wrap_pyfunction!(convert::mgrs_to_geodetic, m)?)?;
    m.add_function(wrap_pyfunction!(convert::geodetic_to_utm, m)?)?;
    m.add_function(wrap_pyfunction!(convert::geodetic_to_mgrs_batch, m)?)?;
    m.add_function(wrap_pyfunction!(convert::utm_to_geodetic_batch, m)?)?;
    m.add_function(wrap_pyfunction!(shapes::read_shapefile, m)?)?;
    Ok(())
}
