//! Geometry helpers for WGS84 coordinates.

use crate::model::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Round `value` to `precision` decimal digits.
///
/// ```
/// use navigator_lib::geo::round_float;
///
/// assert_eq!(round_float(1234.5678, 2), 1234.57);
/// assert_eq!(round_float(842.9, 2), 842.9);
/// ```
pub fn round_float(value: f64, precision: u32) -> f64 {
    let ratio = 10_f64.powi(precision as i32);
    (value * ratio).round() / ratio
}

/// Great-circle distance between two coordinates in meters.
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}

/// Initial bearing from `from` towards `to`, in degrees within `[0, 360)`.
pub fn initial_bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Signed change of heading in degrees within `(-180, 180]`.
///
/// Negative values turn left, positive values turn right.
pub fn bearing_delta(from_bearing: f64, to_bearing: f64) -> f64 {
    let mut delta = (to_bearing - from_bearing) % 360.0;
    if delta <= -180.0 {
        delta += 360.0;
    } else if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Unit-sphere cartesian position used for nearest-neighbour lookups.
///
/// Euclidean order on these points matches great-circle order on the globe.
pub(crate) fn to_unit_vector(coordinate: Coordinate) -> [f64; 3] {
    let lat = coordinate.latitude.to_radians();
    let lon = coordinate.longitude.to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}
