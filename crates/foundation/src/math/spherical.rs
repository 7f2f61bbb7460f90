//! Latitude/longitude placement on a sphere.
//!
//! Convention: `lat = 0, lon = 0` maps to `+Z`, the meridian that faces a
//! camera placed on the positive Z axis. Longitude is offset by 90° before
//! the usual polar-to-cartesian conversion and X is mirrored so that positive
//! longitudes run towards `+X` when viewed from `+Z`.

use super::Vec3;

/// Converts geographic degrees on a sphere of `radius` to a local position.
pub fn to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 90.0).to_radians();

    let sin_phi = phi.sin();
    let x = -(radius * sin_phi * theta.cos());
    let y = radius * phi.cos();
    let z = radius * sin_phi * theta.sin();

    Vec3::new(x, y, z)
}
