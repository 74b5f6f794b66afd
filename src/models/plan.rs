use super::climate::{GddSignificance, GddSummary};
use super::crop::{CropType, StagePlan};
use super::forecast::ForecastProjection;
use super::soil::SoilMoistureReading;
use crate::error::{CropwiseError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub city: Option<String>,
}

impl Location {
    pub fn city_name(&self) -> &str {
        self.city.as_deref().unwrap_or("Unknown")
    }
}

/// User-supplied inputs, possibly incomplete
#[derive(Debug, Clone, Default)]
pub struct PlanInputs {
    pub crop: Option<CropType>,
    pub sowing_date: Option<NaiveDate>,
    pub location: Option<Location>,
}

impl PlanInputs {
    /// Hint describing the first missing input; `None` once a run may start
    pub fn missing_hint(&self) -> Option<&'static str> {
        if self.location.is_none() {
            Some("No location available. Pass --lat/--lon or set `location` in config.yaml")
        } else if self.sowing_date.is_none() {
            Some("Enter a sowing date (YYYY-MM-DD)")
        } else if self.crop.is_none() {
            Some("Choose a crop: wheat, rice, jowar or maize")
        } else {
            None
        }
    }

    pub fn into_request(self, today: NaiveDate) -> Result<PlanRequest> {
        if let Some(hint) = self.missing_hint() {
            return Err(CropwiseError::Validation(hint.to_string()));
        }
        match (self.crop, self.sowing_date, self.location) {
            (Some(crop), Some(sowing_date), Some(location)) => Ok(PlanRequest {
                crop,
                sowing_date,
                location,
                today,
            }),
            _ => Err(CropwiseError::Validation("incomplete plan inputs".into())),
        }
    }
}

/// A complete request; only constructible from inputs that pass the entry guard
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub crop: CropType,
    pub sowing_date: NaiveDate,
    pub location: Location,
    /// Date the run is evaluated against
    pub today: NaiveDate,
}

/// Merged result of a successful run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPlan {
    pub crop: CropType,
    pub sowing_date: NaiveDate,
    pub location: Location,
    pub stage_plan: StagePlan,
    pub gdd: GddSummary,
    pub gdd_significance: GddSignificance,
    pub soil_moisture: Vec<SoilMoistureReading>,
    pub soil_temp_c: Option<f64>,
    pub forecast: Vec<ForecastProjection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn entry_guard_requires_location() {
        let inputs = PlanInputs {
            crop: Some(CropType::Wheat),
            sowing_date: NaiveDate::from_ymd_opt(2026, 9, 1),
            location: None,
        };
        assert!(inputs.missing_hint().is_some());
        assert!(matches!(
            inputs.into_request(today()),
            Err(CropwiseError::Validation(_))
        ));
    }

    #[test]
    fn entry_guard_requires_sowing_date() {
        let inputs = PlanInputs {
            crop: Some(CropType::Wheat),
            sowing_date: None,
            location: Some(Location {
                latitude: 18.52,
                longitude: 73.86,
                city: None,
            }),
        };
        assert!(inputs.missing_hint().is_some());
        assert!(inputs.missing_hint().unwrap().contains("sowing date"));
    }

    #[test]
    fn complete_inputs_build_request() {
        let inputs = PlanInputs {
            crop: Some(CropType::Rice),
            sowing_date: NaiveDate::from_ymd_opt(2026, 7, 1),
            location: Some(Location {
                latitude: 18.52,
                longitude: 73.86,
                city: Some("Pune".into()),
            }),
        };
        assert!(inputs.missing_hint().is_none());
        let req = inputs.into_request(today()).unwrap();
        assert_eq!(req.crop, CropType::Rice);
        assert_eq!(req.location.city_name(), "Pune");
    }
}
