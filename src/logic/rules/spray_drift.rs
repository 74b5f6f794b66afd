use super::Rule;
use crate::models::{AdvisorySignal, CurrentConditions, Severity};

/// Wind speed (m/s) above which spray drift is likely, roughly 18 km/h
pub const DRIFT_WIND_SPEED: f64 = 5.0;

/// Spray drift rule - warns against spraying in strong wind
pub struct SprayDriftRule;

impl Rule for SprayDriftRule {
    fn id(&self) -> &'static str {
        "spray_drift"
    }

    fn name(&self) -> &'static str {
        "Wind Spray Drift"
    }

    fn evaluate(&self, conditions: &CurrentConditions) -> Option<AdvisorySignal> {
        let wind = conditions.snapshot.wind_speed;
        if wind <= DRIFT_WIND_SPEED {
            return None;
        }

        Some(AdvisorySignal::new(
            Severity::Warning,
            format!(
                "High wind speed ({} m/s). Avoid spraying to prevent drift.",
                wind
            ),
            self.id(),
        ))
    }
}
