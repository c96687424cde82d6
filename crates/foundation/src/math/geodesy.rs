use crate::coord::Coordinate;

/// Mean Earth radius (kilometers), as used by common web mapping toolkits.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6_371.008_8;

/// Point reached by travelling `distance_km` from `origin` along the initial
/// `bearing_deg` (clockwise from north) on a sphere.
///
/// Longitudes are wrapped into [-180, 180].
pub fn destination(origin: Coordinate, distance_km: f64, bearing_deg: f64) -> Coordinate {
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km / MEAN_EARTH_RADIUS_KM;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_delta = delta.sin();
    let cos_delta = delta.cos();

    let lat2 = (sin_lat1 * cos_delta + cos_lat1 * sin_delta * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * sin_delta * cos_lat1).atan2(cos_delta - sin_lat1 * lat2.sin());

    Coordinate::new(lat2.to_degrees(), wrap_longitude(lon2.to_degrees()))
}

/// Great-circle distance (kilometers) between two coordinates.
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn wrap_longitude(lon_deg: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon_deg) {
        return lon_deg;
    }
    (lon_deg + 540.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::{destination, haversine_km, wrap_longitude};
    use crate::coord::Coordinate;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn destination_due_north_keeps_longitude() {
        let origin = Coordinate::new(28.7041, 77.1025);
        let d = destination(origin, 10.0, 0.0);
        assert_close(d.longitude, 77.1025, 1e-9);
        assert!(d.latitude > origin.latitude);
        assert_close(haversine_km(origin, d), 10.0, 1e-6);
    }

    #[test]
    fn destination_preserves_distance_on_any_bearing() {
        let origin = Coordinate::new(-33.9, 151.2);
        for bearing in [-300.0, -60.0, 45.0, 135.0, 270.0] {
            let d = destination(origin, 25.0, bearing);
            assert_close(haversine_km(origin, d), 25.0, 1e-6);
        }
    }

    #[test]
    fn wraps_longitude_across_antimeridian() {
        assert_close(wrap_longitude(190.0), -170.0, 1e-12);
        assert_close(wrap_longitude(-190.0), 170.0, 1e-12);
        assert_close(wrap_longitude(45.0), 45.0, 1e-12);
        let d = destination(Coordinate::new(0.0, 179.99), 10.0, 90.0);
        assert!(d.longitude < 0.0);
    }
}
