use super::{
    fungal_risk::FungalRiskRule, heat_stress::HeatStressRule, rain_delay::RainDelayRule,
    spray_drift::SprayDriftRule, Rule,
};
use crate::models::{AdvisorySignal, CurrentConditions};

/// Ordered rule list. Every rule is evaluated independently; signals come
/// back in rule order.
pub struct RulesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RulesEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(RainDelayRule),
            Box::new(SprayDriftRule),
            Box::new(FungalRiskRule),
            Box::new(HeatStressRule),
        ];

        Self { rules }
    }

    pub fn evaluate(&self, conditions: &CurrentConditions) -> Vec<AdvisorySignal> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(conditions))
            .collect()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::rules::fixtures::{calm, conditions, snapshot, window};
    use crate::models::{Severity, WeatherCondition};

    #[test]
    fn rules_listed_in_evaluation_order() {
        let ids: Vec<_> = RulesEngine::new()
            .list_rules()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(
            ids,
            vec!["rain_delay", "spray_drift", "fungal_risk", "heat_stress"]
        );
    }

    #[test]
    fn calm_dry_day_only_reports_spraying_window() {
        let signals = RulesEngine::new().evaluate(&calm());
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].source_rule, "rain_delay");
        assert_eq!(signals[0].severity, Severity::Info);
    }

    #[test]
    fn hot_humid_windy_dry_day_fires_everything() {
        let c = conditions(
            snapshot(36.0, 85.0, 6.2),
            window(&[WeatherCondition::Clear; 5]),
        );
        let signals = RulesEngine::new().evaluate(&c);
        let fired: Vec<_> = signals
            .iter()
            .map(|s| (s.source_rule.as_str(), s.severity))
            .collect();
        assert_eq!(
            fired,
            vec![
                ("rain_delay", Severity::Info),
                ("spray_drift", Severity::Warning),
                ("fungal_risk", Severity::Alert),
                ("heat_stress", Severity::Warning),
            ]
        );
        assert!(signals[1].message.contains("6.2"));
    }

    #[test]
    fn boundary_values_fire_nothing_but_rain_rule() {
        let c = conditions(
            snapshot(35.0, 80.0, 5.0),
            window(&[
                WeatherCondition::Clear,
                WeatherCondition::Clear,
                WeatherCondition::Clear,
                WeatherCondition::Rain,
            ]),
        );
        assert!(RulesEngine::new().evaluate(&c).is_empty());
    }
}
