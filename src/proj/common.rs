//! Common helpers for projection math (meridional distance, radii of curvature, angle wrapping).

use std::f64::consts::{PI, TAU};

use super::ellipsoid::Ellipsoid;

/// True meridional distance from the equator to latitude `phi`.
/// Series in the third flattening with the coefficients stored on the ellipsoid.
pub fn meridional_distance(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    ellipsoid.ap * phi - ellipsoid.bp * (2.0 * phi).sin() + ellipsoid.cp * (4.0 * phi).sin()
        - ellipsoid.dp * (6.0 * phi).sin()
        + ellipsoid.ep * (8.0 * phi).sin()
}

/// sqrt(1 - e^2 sin^2(phi))
pub fn denom(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    let s = phi.sin();
    (1.0 - ellipsoid.e2 * s * s).sqrt()
}

/// Radius of curvature in the prime vertical.
pub fn prime_vertical_radius(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    ellipsoid.a / denom(ellipsoid, phi)
}

/// Radius of curvature in the meridian.
pub fn meridian_radius(ellipsoid: &Ellipsoid, phi: f64) -> f64 {
    ellipsoid.a * (1.0 - ellipsoid.e2) / denom(ellipsoid, phi).powi(3)
}

/// Fold a longitude given in [-pi, 2pi] into (-pi, pi].
pub fn fold_longitude(lon: f64) -> f64 {
    if lon > PI {
        lon - TAU
    } else {
        lon
    }
}

/// Wrap a longitude difference into [-pi, pi].
pub fn wrap_delta(mut dlam: f64) -> f64 {
    if dlam > PI {
        dlam -= TAU;
    }
    if dlam < -PI {
        dlam += TAU;
    }
    dlam
}
