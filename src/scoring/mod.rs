pub mod geo;
pub mod overall;
pub mod proximity;

pub use geo::{compute_distance_km, round_to};
pub use overall::{compute_overall_score, AspectInputs, NEUTRAL_EVENT_PROXIMITY};
pub use proximity::{
    mock_coworking_distance_km, score_proximity_by_distance, MOCK_COWORKING_DISTANCE_KM,
    MOCK_COWORKING_DISTANCE_UNKNOWN_KM,
};
