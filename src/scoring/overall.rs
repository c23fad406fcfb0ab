/// Event proximity assumed when no event is known, so listings are not penalized
pub const NEUTRAL_EVENT_PROXIMITY: u8 = 70;

const SAFETY_WEIGHT: f64 = 0.4;
const COWORKING_WEIGHT: f64 = 0.3;
const EVENT_WEIGHT: f64 = 0.3;

/// Sub-scores feeding the overall score, all on a 0-100 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectInputs {
    pub safety: u8,
    pub coworking_proximity: u8,
    pub event_proximity: Option<u8>,
}

pub fn compute_overall_score(inputs: AspectInputs) -> u8 {
    let event = inputs.event_proximity.unwrap_or(NEUTRAL_EVENT_PROXIMITY);

    let overall = SAFETY_WEIGHT * f64::from(inputs.safety)
        + COWORKING_WEIGHT * f64::from(inputs.coworking_proximity)
        + EVENT_WEIGHT * f64::from(event);

    overall.round().clamp(0.0, 100.0) as u8
}
