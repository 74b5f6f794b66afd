pub mod calculations;
pub mod forecast_risk;
pub mod growth_plan;
pub mod rules;
pub mod soil;

pub use growth_plan::{GrowthPlanService, Phase};
pub use rules::RulesEngine;
