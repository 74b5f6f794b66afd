use super::Rule;
use crate::models::{AdvisorySignal, CurrentConditions, Severity};

pub const HEAT_STRESS_TEMP_C: f64 = 35.0;

/// Heat stress warning rule - current air temperature above 35°C
pub struct HeatStressRule;

impl Rule for HeatStressRule {
    fn id(&self) -> &'static str {
        "heat_stress"
    }

    fn name(&self) -> &'static str {
        "Heat Stress"
    }

    fn evaluate(&self, conditions: &CurrentConditions) -> Option<AdvisorySignal> {
        if conditions.snapshot.temperature_c <= HEAT_STRESS_TEMP_C {
            return None;
        }

        Some(AdvisorySignal::new(
            Severity::Warning,
            "Heat stress likelihood. Ensure adequate irrigation.",
            self.id(),
        ))
    }
}
