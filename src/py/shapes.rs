//! PyO3 binding for reading shapefiles.

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::error::{ConfigError, ShapefileError};
use crate::py::{config_error, settings};
use crate::shp::Shape;

pub(super) fn shapefile_error(e: ShapefileError) -> PyErr {
    match e {
        ShapefileError::Io(_) | ShapefileError::Dbf(_) => PyIOError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

/// Read every record of a shapefile.
///
/// Args:
///     path: Path to the `.shp` file. A sibling `.dbf` is used for names when present.
///     dbf: Explicit attribute table path, overriding the sibling lookup.
///     config: TOML settings file; its `name_field_pattern` picks the name column.
///
/// Returns:
///     List of dicts with `number`, `type`, `name`, `parts` and `points` keys.
#[pyfunction]
#[pyo3(signature = (path, dbf=None, config=None))]
pub fn read_shapefile<'py>(
    py: Python<'py>,
    path: &str,
    dbf: Option<&str>,
    config: Option<&str>,
) -> PyResult<Bound<'py, PyList>> {
    let settings = settings(config, None)?;
    let path = path.to_string();
    let dbf = dbf.map(std::path::PathBuf::from);

    let shapefile = py.allow_threads(move || -> Result<_, ConfigError> {
        let mut shapefile = settings.open_shapefile(&path, dbf.as_deref())?;
        shapefile.parse()?;
        Ok(shapefile)
    });
    let shapefile = shapefile.map_err(config_error)?;

    let out = PyList::empty(py);
    for record in shapefile.records().unwrap_or_default() {
        let item = PyDict::new(py);
        item.set_item("number", record.number)?;
        item.set_item("type", record.shape.shape_type())?;
        item.set_item("name", shapefile.get_shape_name(record.number))?;
        let parts: Vec<i32> = match &record.shape {
            Shape::PolyLine(m) | Shape::Polygon(m) => m.parts.clone(),
            Shape::Null | Shape::Point(_) => Vec::new(),
        };
        item.set_item("parts", parts)?;
        let points: Vec<(f64, f64)> = record.shape.points().iter().map(|p| (p.x, p.y)).collect();
        item.set_item("points", points)?;
        out.append(item)?;
    }
    Ok(out)
}
