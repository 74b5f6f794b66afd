use crate::models::{ForecastDay, ForecastProjection};

/// Top of the display scale (°C); a bar at this temperature is full height
pub const DISPLAY_SCALE_MAX_C: f64 = 45.0;
pub const HEAT_RISK_THRESHOLD_C: f64 = 38.0;
pub const RAIN_THRESHOLD_MM: f64 = 1.0;
/// Stand-in when a day has no max temperature
const MISSING_MAX_TEMP_C: f64 = 20.0;

/// Bar height is floored at 0 as well as capped at 100 so sub-zero maxima
/// draw an empty bar.
pub fn project_day(day: &ForecastDay) -> ForecastProjection {
    let max = day.max_temp_c.unwrap_or(MISSING_MAX_TEMP_C);
    let bar_percent = ((max / DISPLAY_SCALE_MAX_C) * 100.0).clamp(0.0, 100.0);

    ForecastProjection {
        date: day.date,
        max_temp_c: day.max_temp_c,
        min_temp_c: day.min_temp_c,
        bar_percent,
        heat_risk: max > HEAT_RISK_THRESHOLD_C,
        rain_expected: day.precipitation_mm.unwrap_or(0.0) > RAIN_THRESHOLD_MM,
    }
}

/// One projection per forecast day, in input order
pub fn project_forecast(days: &[ForecastDay]) -> Vec<ForecastProjection> {
    days.iter().map(project_day).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn day(offset: i64, max: Option<f64>, precip: Option<f64>) -> ForecastDay {
        ForecastDay {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap() + Duration::days(offset),
            max_temp_c: max,
            min_temp_c: Some(15.0),
            precipitation_mm: precip,
        }
    }

    #[test]
    fn bar_height_scales_to_45() {
        let p = project_day(&day(0, Some(22.5), None));
        assert!((p.bar_percent - 50.0).abs() < 1e-9);

        let p = project_day(&day(0, Some(45.0), None));
        assert!((p.bar_percent - 100.0).abs() < 1e-9);

        let p = project_day(&day(0, Some(48.0), None));
        assert_eq!(p.bar_percent, 100.0);
    }

    #[test]
    fn sub_zero_max_draws_empty_bar() {
        let p = project_day(&day(0, Some(-4.0), None));
        assert_eq!(p.bar_percent, 0.0);
        assert_eq!(p.max_temp_c, Some(-4.0));
    }

    #[test]
    fn heat_risk_is_strictly_above_38() {
        assert!(!project_day(&day(0, Some(38.0), None)).heat_risk);
        assert!(project_day(&day(0, Some(38.1), None)).heat_risk);
    }

    #[test]
    fn rain_flag_is_strictly_above_1mm() {
        assert!(!project_day(&day(0, Some(30.0), Some(1.0))).rain_expected);
        assert!(project_day(&day(0, Some(30.0), Some(1.2))).rain_expected);
        assert!(!project_day(&day(0, Some(30.0), None)).rain_expected);
    }

    #[test]
    fn missing_max_uses_placeholder_height() {
        let p = project_day(&day(0, None, None));
        assert!(p.max_temp_c.is_none());
        assert!((p.bar_percent - 20.0 / 45.0 * 100.0).abs() < 1e-9);
        assert!(!p.heat_risk);
    }

    #[test]
    fn order_preserved() {
        let days: Vec<_> = (0..16).map(|i| day(i, Some(20.0 + i as f64), None)).collect();
        let projected = project_forecast(&days);
        assert_eq!(projected.len(), 16);
        for (p, d) in projected.iter().zip(&days) {
            assert_eq!(p.date, d.date);
        }
    }
}
