use super::Rule;
use crate::models::{AdvisorySignal, CurrentConditions, Severity};

pub const FUNGAL_HUMIDITY_PERCENT: f64 = 80.0;

/// Fungal disease risk rule
///
/// Sustained humidity above 80% favours blast, blight and mildew on most
/// field crops.
pub struct FungalRiskRule;

impl Rule for FungalRiskRule {
    fn id(&self) -> &'static str {
        "fungal_risk"
    }

    fn name(&self) -> &'static str {
        "Fungal Disease Risk"
    }

    fn evaluate(&self, conditions: &CurrentConditions) -> Option<AdvisorySignal> {
        if conditions.snapshot.humidity_percent <= FUNGAL_HUMIDITY_PERCENT {
            return None;
        }

        Some(AdvisorySignal::new(
            Severity::Alert,
            "High humidity (>80%). Increased risk of fungal diseases. Monitor crops closely.",
            self.id(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::fixtures::calm;

    fn with_humidity(humidity: f64) -> CurrentConditions {
        let mut c = calm();
        c.snapshot.humidity_percent = humidity;
        c
    }

    #[test]
    fn eighty_percent_is_not_enough() {
        assert!(FungalRiskRule.evaluate(&with_humidity(80.0)).is_none());
    }

    #[test]
    fn above_eighty_alerts() {
        let signal = FungalRiskRule.evaluate(&with_humidity(80.1)).unwrap();
        assert_eq!(signal.severity, Severity::Alert);
        assert_eq!(signal.source_rule, "fungal_risk");
    }
}
