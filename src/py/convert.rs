//! PyO3 bindings for UTM and MGRS conversion. Angles cross the boundary in degrees.

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::GridConfig;
use crate::error::ProjError;
use crate::grid::batch;
use crate::grid::{Hemisphere, Mgrs, Utm, UtmCoord};
use crate::proj::common::fold_longitude;
use crate::py::{config_error, settings};

fn value_error(e: ProjError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn mgrs(settings: &GridConfig) -> PyResult<Mgrs> {
    settings.mgrs().map_err(config_error)
}

fn utm(settings: &GridConfig) -> PyResult<Utm> {
    settings.utm().map_err(config_error)
}

/// Convert a longitude/latitude in degrees to an MGRS reference.
///
/// `precision` and `ellipsoid` default to the values in the TOML file at
/// `config`, or to 5 digits on WGS84 without one.
#[pyfunction]
#[pyo3(signature = (lon, lat, precision=None, ellipsoid=None, config=None))]
pub fn geodetic_to_mgrs(
    lon: f64,
    lat: f64,
    precision: Option<u8>,
    ellipsoid: Option<&str>,
    config: Option<&str>,
) -> PyResult<String> {
    let mut settings = settings(config, ellipsoid)?;
    if let Some(precision) = precision {
        settings.mgrs_precision = precision;
    }
    let coord = settings
        .mgrs_reference(&mgrs(&settings)?, lon.to_radians(), lat.to_radians())
        .map_err(value_error)?;
    Ok(coord.to_string())
}

/// Convert an MGRS reference to `(lon, lat)` in degrees.
#[pyfunction]
#[pyo3(signature = (mgrs_ref, ellipsoid=None, config=None))]
pub fn mgrs_to_geodetic(
    mgrs_ref: &str,
    ellipsoid: Option<&str>,
    config: Option<&str>,
) -> PyResult<(f64, f64)> {
    let (lon, lat) = mgrs(&settings(config, ellipsoid)?)?
        .mgrs_to_geodetic(mgrs_ref)
        .map_err(value_error)?;
    Ok((fold_longitude(lon).to_degrees(), lat.to_degrees()))
}

/// Convert a longitude/latitude in degrees to `(zone, hemisphere, easting, northing)`.
#[pyfunction]
#[pyo3(signature = (lon, lat, ellipsoid=None, config=None))]
pub fn geodetic_to_utm(
    lon: f64,
    lat: f64,
    ellipsoid: Option<&str>,
    config: Option<&str>,
) -> PyResult<(u8, char, f64, f64)> {
    let c = utm(&settings(config, ellipsoid)?)?
        .geodetic_to_utm(lon.to_radians(), lat.to_radians())
        .map_err(value_error)?;
    Ok((c.zone, c.hemisphere.as_char(), c.easting, c.northing))
}

/// Convert arrays of longitudes/latitudes in degrees to MGRS references.
///
/// Points that cannot be converted come back as `None`.
#[pyfunction]
#[pyo3(signature = (lon, lat, precision=None, ellipsoid=None, config=None))]
pub fn geodetic_to_mgrs_batch<'py>(
    py: Python<'py>,
    lon: PyReadonlyArray1<'py, f64>,
    lat: PyReadonlyArray1<'py, f64>,
    precision: Option<u8>,
    ellipsoid: Option<&str>,
    config: Option<&str>,
) -> PyResult<Vec<Option<String>>> {
    let settings = settings(config, ellipsoid)?;
    let precision = precision.unwrap_or(settings.mgrs_precision);
    let lon_view = lon.as_array();
    let lat_view = lat.as_array();
    if lon_view.len() != lat_view.len() {
        return Err(PyValueError::new_err(format!(
            "lon and lat must have same length, got {} and {}",
            lon_view.len(),
            lat_view.len()
        )));
    }

    let points: Vec<(f64, f64)> = lon_view
        .iter()
        .zip(lat_view.iter())
        .map(|(&x, &y)| (x.to_radians(), y.to_radians()))
        .collect();
    let converter = mgrs(&settings)?;

    let refs = py.allow_threads(move || batch::geodetic_to_mgrs_batch(&converter, &points, precision));
    Ok(refs
        .into_iter()
        .map(|r| r.ok().map(|c| c.to_string()))
        .collect())
}

/// Convert arrays of eastings/northings in one UTM zone to `(lon, lat)` arrays in degrees.
///
/// Points that cannot be converted come back as NaN.
#[pyfunction]
#[pyo3(signature = (zone, hemisphere, easting, northing, ellipsoid=None, config=None))]
#[allow(clippy::type_complexity)]
pub fn utm_to_geodetic_batch<'py>(
    py: Python<'py>,
    zone: u8,
    hemisphere: char,
    easting: PyReadonlyArray1<'py, f64>,
    northing: PyReadonlyArray1<'py, f64>,
    ellipsoid: Option<&str>,
    config: Option<&str>,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let hemisphere = Hemisphere::try_from(hemisphere).map_err(value_error)?;
    let e_view = easting.as_array();
    let n_view = northing.as_array();
    if e_view.len() != n_view.len() {
        return Err(PyValueError::new_err(format!(
            "easting and northing must have same length, got {} and {}",
            e_view.len(),
            n_view.len()
        )));
    }

    let coords: Vec<UtmCoord> = e_view
        .iter()
        .zip(n_view.iter())
        .map(|(&easting, &northing)| UtmCoord {
            zone,
            hemisphere,
            easting,
            northing,
        })
        .collect();
    let converter = utm(&settings(config, ellipsoid)?)?;

    let results = py.allow_threads(move || batch::utm_to_geodetic_batch(&converter, &coords));
    let (lons, lats): (Vec<f64>, Vec<f64>) = results
        .into_iter()
        .map(|r| match r {
            Ok((lon, lat)) => (fold_longitude(lon).to_degrees(), lat.to_degrees()),
            Err(_) => (f64::NAN, f64::NAN),
        })
        .unzip();

    Ok((
        PyArray1::from_owned_array(py, ndarray::Array1::from(lons)),
        PyArray1::from_owned_array(py, ndarray::Array1::from(lats)),
    ))
}
