const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometers (Haversine).
///
/// NaN inputs yield NaN; callers check before storing the result.
pub fn compute_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISBON: (f64, f64) = (38.7223, -9.1393);
    const PORTO: (f64, f64) = (41.1579, -8.6291);
    const MADRID: (f64, f64) = (40.4168, -3.7038);

    fn dist(a: (f64, f64), b: (f64, f64)) -> f64 {
        compute_distance_km(a.0, a.1, b.0, b.1)
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        assert_eq!(dist(LISBON, PORTO), dist(PORTO, LISBON));
        assert_eq!(dist(MADRID, MADRID), 0.0);
    }

    #[test]
    fn lisbon_to_porto_is_about_274_km() {
        let d = dist(LISBON, PORTO);
        assert!(d > 270.0 && d < 280.0, "got {d}");
    }

    #[test]
    fn triangle_sanity() {
        let lp = dist(LISBON, PORTO);
        let pm = dist(PORTO, MADRID);
        let lm = dist(LISBON, MADRID);

        assert!(lp <= pm + lm);
        assert!(pm <= lp + lm);
        assert!(lm <= lp + pm);
    }

    #[test]
    fn nan_propagates() {
        assert!(compute_distance_km(f64::NAN, 0.0, 1.0, 1.0).is_nan());
    }

    #[test]
    fn rounds_to_places() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(8.56, 1), 8.6);
        assert_eq!(round_to(9.0, 1), 9.0);
    }
}
