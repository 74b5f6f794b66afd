use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropType {
    Wheat,
    Rice,
    Jowar,
    Maize,
}

impl CropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Wheat => "wheat",
            CropType::Rice => "rice",
            CropType::Jowar => "jowar",
            CropType::Maize => "maize",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wheat" => Some(CropType::Wheat),
            "rice" | "paddy" => Some(CropType::Rice),
            "jowar" | "sorghum" => Some(CropType::Jowar),
            "maize" | "corn" => Some(CropType::Maize),
            _ => None,
        }
    }

    /// Daily average temperature (°C) below which the crop does not develop
    pub fn base_temp_c(&self) -> f64 {
        match self {
            CropType::Wheat => 5.0,
            CropType::Rice | CropType::Jowar | CropType::Maize => 10.0,
        }
    }

    pub fn all() -> [CropType; 4] {
        [
            CropType::Wheat,
            CropType::Rice,
            CropType::Jowar,
            CropType::Maize,
        ]
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named growth phase as a day-count interval since sowing.
/// The final stage may leave `end_day` open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropStageBoundary {
    pub name: String,
    pub start_day: u32,
    #[serde(default)]
    pub end_day: Option<u32>,
}

impl CropStageBoundary {
    pub fn contains(&self, day: u32) -> bool {
        day >= self.start_day && self.end_day.is_none_or(|end| day <= end)
    }
}

/// Body posted to the remote stage service
#[derive(Debug, Clone, Serialize)]
pub struct StagePlanRequest {
    pub crop_type: CropType,
    pub sowing_date: NaiveDate,
    pub city: String,
    pub tmax: f64,
    pub tmin: f64,
    pub accumulated_gdd: f64,
    pub lat: f64,
    pub lon: f64,
}

/// Stage service response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePlan {
    pub current_stage: String,
    pub days_since_sowing: u32,
    pub fertilizer_recommendation: String,
    #[serde(default)]
    pub risk_alert: Option<String>,
    pub next_irrigation_in_days: u32,
    pub all_stages: Vec<CropStageBoundary>,
    pub crop_type: String,
}

impl StagePlan {
    /// Checks that stages are ordered and non-overlapping. Returns the
    /// uncovered day ranges between consecutive stages.
    pub fn validate_stages(&self) -> Result<Vec<(u32, u32)>, String> {
        let mut gaps = Vec::new();
        for (i, stage) in self.all_stages.iter().enumerate() {
            if let Some(end) = stage.end_day {
                if end < stage.start_day {
                    return Err(format!(
                        "stage '{}' ends (day {}) before it starts (day {})",
                        stage.name, end, stage.start_day
                    ));
                }
            }

            let Some(next) = self.all_stages.get(i + 1) else {
                break;
            };

            let Some(end) = stage.end_day else {
                return Err(format!(
                    "stage '{}' is open-ended but is followed by '{}'",
                    stage.name, next.name
                ));
            };

            if next.start_day < end {
                return Err(format!(
                    "stage '{}' (from day {}) overlaps '{}' (until day {})",
                    next.name, next.start_day, stage.name, end
                ));
            }
            // A stage ending on u32::MAX leaves no room for a gap
            if let Some(first_uncovered) = end.checked_add(1) {
                if next.start_day > first_uncovered {
                    gaps.push((first_uncovered, next.start_day - 1));
                }
            }
        }
        Ok(gaps)
    }

    /// Stage covering the given day count; days past the final boundary
    /// belong to the final stage.
    pub fn stage_at(&self, day: u32) -> Option<&CropStageBoundary> {
        self.all_stages
            .iter()
            .find(|s| s.contains(day))
            .or_else(|| {
                self.all_stages
                    .last()
                    .filter(|last| last.end_day.is_some_and(|end| day > end))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(name: &str, start: u32, end: Option<u32>) -> CropStageBoundary {
        CropStageBoundary {
            name: name.to_string(),
            start_day: start,
            end_day: end,
        }
    }

    fn plan(stages: Vec<CropStageBoundary>) -> StagePlan {
        StagePlan {
            current_stage: "Vegetative".into(),
            days_since_sowing: 20,
            fertilizer_recommendation: "Apply NPK 20-20-0 at 50kg/acre this week".into(),
            risk_alert: None,
            next_irrigation_in_days: 3,
            all_stages: stages,
            crop_type: "Maize".into(),
        }
    }

    #[test]
    fn crop_base_temperatures() {
        assert_eq!(CropType::Wheat.base_temp_c(), 5.0);
        assert_eq!(CropType::Rice.base_temp_c(), 10.0);
        assert_eq!(CropType::Jowar.base_temp_c(), 10.0);
        assert_eq!(CropType::Maize.base_temp_c(), 10.0);
    }

    #[test]
    fn crop_from_str() {
        assert_eq!(CropType::from_str("Wheat"), Some(CropType::Wheat));
        assert_eq!(CropType::from_str(" maize "), Some(CropType::Maize));
        assert_eq!(CropType::from_str("sorghum"), Some(CropType::Jowar));
        assert_eq!(CropType::from_str("barley"), None);
    }

    #[test]
    fn shared_boundary_day_is_valid() {
        // Service maize table shares boundary days (0-7, 7-35, ...)
        let p = plan(vec![
            stage("Germination", 0, Some(7)),
            stage("Vegetative", 7, Some(35)),
            stage("Tasseling", 35, None),
        ]);
        assert_eq!(p.validate_stages(), Ok(vec![]));
    }

    #[test]
    fn gaps_are_reported_not_rejected() {
        let p = plan(vec![
            stage("Germination", 0, Some(7)),
            stage("Tillering", 15, Some(40)),
        ]);
        assert_eq!(p.validate_stages(), Ok(vec![(8, 14)]));
    }

    #[test]
    fn overlapping_stages_rejected() {
        let p = plan(vec![
            stage("Germination", 0, Some(10)),
            stage("Vegetative", 5, Some(40)),
        ]);
        assert!(p.validate_stages().is_err());
    }

    #[test]
    fn open_ended_stage_must_be_last() {
        let p = plan(vec![
            stage("Germination", 0, None),
            stage("Vegetative", 8, Some(40)),
        ]);
        assert!(p.validate_stages().is_err());
    }

    #[test]
    fn maximal_boundary_day_does_not_overflow() {
        let p = plan(vec![
            stage("Germination", 0, Some(u32::MAX)),
            stage("Maturity", u32::MAX, None),
        ]);
        assert_eq!(p.validate_stages(), Ok(vec![]));

        let p = plan(vec![
            stage("Germination", 0, Some(u32::MAX)),
            stage("Maturity", 10, None),
        ]);
        assert!(p.validate_stages().is_err());
    }

    #[test]
    fn stage_lookup() {
        let p = plan(vec![
            stage("Germination", 0, Some(7)),
            stage("Vegetative", 8, Some(35)),
            stage("Maturity", 36, Some(120)),
        ]);
        assert_eq!(p.stage_at(0).map(|s| s.name.as_str()), Some("Germination"));
        assert_eq!(p.stage_at(20).map(|s| s.name.as_str()), Some("Vegetative"));
        assert_eq!(p.stage_at(200).map(|s| s.name.as_str()), Some("Maturity"));
    }

    #[test]
    fn stage_plan_deserializes_service_response() {
        let json = r#"{
            "crop_type": "Wheat",
            "district": "Pune",
            "current_stage": "Tillering",
            "days_since_sowing": 22,
            "accumulated_gdd": 310.5,
            "daily_gdd": 14.1,
            "next_irrigation_in_days": 6,
            "fertilizer_recommendation": "Apply 25kg urea/acre within 5 days",
            "risk_alert": "Crop progressing normally. No immediate climate risk detected.",
            "all_stages": [
                {"name": "Germination", "start_day": 0, "end_day": 7},
                {"name": "Tillering", "start_day": 15, "end_day": 40}
            ]
        }"#;
        let p: StagePlan = serde_json::from_str(json).unwrap();
        assert_eq!(p.current_stage, "Tillering");
        assert_eq!(p.all_stages.len(), 2);
        assert_eq!(p.all_stages[1].end_day, Some(40));
    }
}
