use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day from the climate archive. Either value may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyClimateRecord {
    pub date: NaiveDate,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
}

impl DailyClimateRecord {
    pub fn new(date: NaiveDate, max_temp_c: Option<f64>, min_temp_c: Option<f64>) -> Self {
        Self {
            date,
            max_temp_c,
            min_temp_c,
        }
    }

    /// Mean of max and min, only when both are present
    pub fn daily_avg_c(&self) -> Option<f64> {
        match (self.max_temp_c, self.min_temp_c) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            _ => None,
        }
    }
}

/// Accumulated growing-degree-days since sowing. Values are rounded to one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GddSummary {
    pub accumulated_gdd: f64,
    pub avg_max_temp_c: f64,
    pub avg_min_temp_c: f64,
    /// Number of records in the fetched range, including gaps
    pub day_count: u32,
    /// Days where both temperatures were present
    pub valid_days: u32,
}

impl GddSummary {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn missing_days(&self) -> u32 {
        self.day_count.saturating_sub(self.valid_days)
    }

    pub fn significance(&self) -> GddSignificance {
        GddSignificance::from_gdd(self.accumulated_gdd)
    }
}

/// Rough position in the season implied by accumulated heat units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GddSignificance {
    EarlyGrowth,
    ActiveGrowth,
    MidSeason,
    LateSeason,
}

impl GddSignificance {
    pub fn from_gdd(gdd: f64) -> Self {
        if gdd < 200.0 {
            GddSignificance::EarlyGrowth
        } else if gdd < 500.0 {
            GddSignificance::ActiveGrowth
        } else if gdd < 900.0 {
            GddSignificance::MidSeason
        } else {
            GddSignificance::LateSeason
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GddSignificance::EarlyGrowth => "Early growth",
            GddSignificance::ActiveGrowth => "Active growth",
            GddSignificance::MidSeason => "Mid season",
            GddSignificance::LateSeason => "Late season",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            GddSignificance::EarlyGrowth => {
                "Crop is establishing. Roots and first leaves are developing."
            }
            GddSignificance::ActiveGrowth => {
                "Vegetative growth is under way. Nutrient demand is rising."
            }
            GddSignificance::MidSeason => {
                "Crop is approaching reproductive stages. Water stress matters most now."
            }
            GddSignificance::LateSeason => {
                "Crop has accumulated most of its heat units. Plan for harvest."
            }
        }
    }
}

impl std::fmt::Display for GddSignificance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn daily_average_needs_both_values() {
        assert_eq!(
            DailyClimateRecord::new(date(), Some(30.0), Some(18.0)).daily_avg_c(),
            Some(24.0)
        );
        assert_eq!(
            DailyClimateRecord::new(date(), None, Some(18.0)).daily_avg_c(),
            None
        );
        assert_eq!(
            DailyClimateRecord::new(date(), Some(30.0), None).daily_avg_c(),
            None
        );
    }

    #[test]
    fn significance_bands() {
        assert_eq!(GddSignificance::from_gdd(0.0), GddSignificance::EarlyGrowth);
        assert_eq!(
            GddSignificance::from_gdd(199.9),
            GddSignificance::EarlyGrowth
        );
        assert_eq!(
            GddSignificance::from_gdd(200.0),
            GddSignificance::ActiveGrowth
        );
        assert_eq!(GddSignificance::from_gdd(500.0), GddSignificance::MidSeason);
        assert_eq!(GddSignificance::from_gdd(900.0), GddSignificance::LateSeason);
    }

    #[test]
    fn zero_summary() {
        let s = GddSummary::zero();
        assert_eq!(s.accumulated_gdd, 0.0);
        assert_eq!(s.day_count, 0);
        assert_eq!(s.missing_days(), 0);
    }
}
