use crate::domain::model::{AvailabilityMap, Subsystem};

/// Fixed score reported for the demo fixture.
pub const DEMO_QUALITY_SCORE: u8 = 95;

/// `round(100 * available / 6)` over the six top-level subsystems.
pub fn quality_score(availability: &AvailabilityMap) -> u8 {
    let available = Subsystem::ALL
        .iter()
        .filter(|s| availability.get(s).copied().unwrap_or(false))
        .count();
    (100.0 * available as f64 / Subsystem::ALL.len() as f64).round() as u8
}
