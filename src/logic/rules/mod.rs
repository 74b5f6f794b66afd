pub mod engine;
pub mod fungal_risk;
pub mod heat_stress;
pub mod rain_delay;
pub mod spray_drift;

pub use engine::RulesEngine;

use crate::models::{AdvisorySignal, CurrentConditions};

/// Trait for advisory rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule and return a signal if its threshold is crossed
    fn evaluate(&self, conditions: &CurrentConditions) -> Option<AdvisorySignal>;
}
