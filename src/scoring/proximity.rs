use crate::models::Listing;

/// Placeholder distance to the nearest coworking space for listings with coordinates.
// TODO: replace with a lookup against the city's coworking anchors once listings are geocoded reliably
pub const MOCK_COWORKING_DISTANCE_KM: f64 = 1.5;

/// Placeholder distance when the listing has no coordinates
pub const MOCK_COWORKING_DISTANCE_UNKNOWN_KM: f64 = 4.0;

/// Convert a distance in km to a 0-100 proximity score.
///
/// Negative distances are invalid input and fall through to the lowest bucket.
pub fn score_proximity_by_distance(distance_km: f64) -> u8 {
    match distance_km {
        d if (0.0..=0.5).contains(&d) => 100,
        d if (0.0..=1.0).contains(&d) => 90,
        d if (0.0..=2.0).contains(&d) => 80,
        d if (0.0..=3.0).contains(&d) => 70,
        d if (0.0..=5.0).contains(&d) => 60,
        d if (0.0..=8.0).contains(&d) => 50,
        _ => 40,
    }
}

pub fn mock_coworking_distance_km(listing: &Listing) -> f64 {
    if listing.coordinates.is_some() {
        MOCK_COWORKING_DISTANCE_KM
    } else {
        MOCK_COWORKING_DISTANCE_UNKNOWN_KM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(score_proximity_by_distance(0.0), 100);
        assert_eq!(score_proximity_by_distance(0.5), 100);
        assert_eq!(score_proximity_by_distance(1.0), 90);
        assert_eq!(score_proximity_by_distance(2.0), 80);
        assert_eq!(score_proximity_by_distance(3.0), 70);
        assert_eq!(score_proximity_by_distance(5.0), 60);
        assert_eq!(score_proximity_by_distance(8.0), 50);
        assert_eq!(score_proximity_by_distance(8.01), 40);
    }

    #[test]
    fn monotonic_over_increasing_distance() {
        let mut previous = u8::MAX;
        for step in 0..200 {
            let score = score_proximity_by_distance(step as f64 * 0.05);
            assert!(score <= previous);
            previous = score;
        }
    }

    #[test]
    fn negative_and_nan_fall_to_lowest_bucket() {
        assert_eq!(score_proximity_by_distance(-1.0), 40);
        assert_eq!(score_proximity_by_distance(f64::NAN), 40);
    }

    #[test]
    fn mock_coworking_distance_depends_on_coordinates() {
        let bare = Listing::new("1", "Loft", "Lisbon", 100.0, 2);
        assert_eq!(mock_coworking_distance_km(&bare), 4.0);
        assert_eq!(
            mock_coworking_distance_km(&bare.with_coordinates(38.7, -9.1)),
            1.5
        );
    }
}
