#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod config;
pub mod error;
pub mod grid;
pub mod proj;
pub mod shp;
#[cfg(feature = "python")]
mod py;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}
