//! Plain-text rendering of command results for the terminal.

use crate::models::{
    AdvisorySignal, CurrentConditions, ForecastProjection, GrowthPlan, SoilMoistureReading,
    WeatherCondition,
};

const BAR_WIDTH: usize = 20;

fn temp(value: Option<f64>) -> String {
    value
        .map(|t| format!("{:.1}°C", t))
        .unwrap_or_else(|| "-".to_string())
}

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn render_soil(readings: &[SoilMoistureReading], soil_temp_c: Option<f64>) -> String {
    let mut out = String::from("Soil moisture\n");
    for r in readings {
        out.push_str(&format!(
            "  {:<16} {} {:>3}%  {:<9} {}\n",
            r.depth.as_str(),
            bar(r.percent as f64),
            r.percent,
            r.status.as_str(),
            r.status.guidance()
        ));
    }
    out.push_str(&format!("  Soil temperature (6cm): {}\n", temp(soil_temp_c)));
    out
}

pub fn render_forecast(days: &[ForecastProjection]) -> String {
    let mut out = String::from("Forecast\n");
    if days.is_empty() {
        out.push_str("  No forecast data\n");
        return out;
    }
    for day in days {
        let mut flags = Vec::new();
        if day.heat_risk {
            flags.push("heat risk");
        }
        if day.rain_expected {
            flags.push("rain");
        }
        out.push_str(&format!(
            "  {}  {} {:>7} / {:<7} {}\n",
            day.date.format("%a %d %b"),
            bar(day.bar_percent),
            temp(day.max_temp_c),
            temp(day.min_temp_c),
            flags.join(", ")
        ));
    }
    out
}

pub fn render_plan(plan: &GrowthPlan) -> String {
    let stage = &plan.stage_plan;
    let mut out = format!(
        "{} sown {} at {} ({:.2}, {:.2})\n\n",
        plan.crop,
        plan.sowing_date,
        plan.location.city_name(),
        plan.location.latitude,
        plan.location.longitude
    );

    out.push_str("Crop stage\n");
    out.push_str(&format!(
        "  Current stage:  {} (day {})\n",
        stage.current_stage, stage.days_since_sowing
    ));
    out.push_str(&format!(
        "  Fertilizer:     {}\n",
        stage.fertilizer_recommendation
    ));
    out.push_str(&format!(
        "  Next irrigation in {} day(s)\n",
        stage.next_irrigation_in_days
    ));
    if let Some(ref alert) = stage.risk_alert {
        out.push_str(&format!("  Risk:           {}\n", alert));
    }
    let current = stage.stage_at(stage.days_since_sowing);
    for boundary in &stage.all_stages {
        let end = boundary
            .end_day
            .map(|d| d.to_string())
            .unwrap_or_else(|| "…".to_string());
        let marker = if current == Some(boundary) {
            ">"
        } else {
            " "
        };
        out.push_str(&format!(
            "  {} {:<20} days {}-{}\n",
            marker, boundary.name, boundary.start_day, end
        ));
    }

    out.push_str("\nGrowing degree days\n");
    out.push_str(&format!(
        "  Accumulated: {:.1} over {} day(s)",
        plan.gdd.accumulated_gdd, plan.gdd.day_count
    ));
    if plan.gdd.missing_days() > 0 {
        out.push_str(&format!(" ({} incomplete)", plan.gdd.missing_days()));
    }
    out.push('\n');
    out.push_str(&format!(
        "  Avg max/min: {:.1}°C / {:.1}°C\n",
        plan.gdd.avg_max_temp_c, plan.gdd.avg_min_temp_c
    ));
    out.push_str(&format!(
        "  {}: {}\n\n",
        plan.gdd_significance.as_str(),
        plan.gdd_significance.explanation()
    ));

    out.push_str(&render_soil(&plan.soil_moisture, plan.soil_temp_c));
    out.push('\n');
    out.push_str(&render_forecast(&plan.forecast));
    out
}

pub fn render_advisories(conditions: &CurrentConditions, signals: &[AdvisorySignal]) -> String {
    let s = &conditions.snapshot;
    let mut out = format!(
        "{}: {}, {:.1}°C, humidity {:.0}%, wind {:.1} m/s\n",
        conditions.location,
        WeatherCondition::from_owm_id(s.condition_code).as_str(),
        s.temperature_c,
        s.humidity_percent,
        s.wind_speed
    );
    if let Some(rain) = s.rain_last_hour_mm {
        out.push_str(&format!("Rain last hour: {:.1} mm\n", rain));
    }

    if !conditions.window.is_empty() {
        let days: Vec<String> = conditions
            .window
            .iter()
            .map(|e| format!("{} {}", e.timestamp.format("%a"), e.condition.as_str()))
            .collect();
        out.push_str(&format!("Next days: {}\n", days.join(", ")));
    }

    out.push_str("\nAdvisories\n");
    if signals.is_empty() {
        out.push_str("  None\n");
    }
    for signal in signals {
        out.push_str(&format!(
            "  {} {:<7} {}\n",
            signal.severity.symbol(),
            signal.severity.as_str(),
            signal.message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepthBand, MoistureStatus, Severity, WeatherSnapshot};
    use chrono::NaiveDate;

    #[test]
    fn bar_scales_and_caps() {
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50.0).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(150.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
    }

    #[test]
    fn soil_lines_include_guidance() {
        let readings = [SoilMoistureReading {
            depth: DepthBand::Shallow,
            volumetric_fraction: 0.09,
            percent: 18,
            status: MoistureStatus::Dry,
        }];
        let text = render_soil(&readings, None);
        assert!(text.contains("18%"));
        assert!(text.contains("Consider irrigating soon"));
        assert!(text.contains("Soil temperature (6cm): -"));
    }

    #[test]
    fn forecast_flags_listed() {
        let days = [ForecastProjection {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            max_temp_c: Some(39.0),
            min_temp_c: None,
            bar_percent: 86.7,
            heat_risk: true,
            rain_expected: true,
        }];
        let text = render_forecast(&days);
        assert!(text.contains("39.0°C"));
        assert!(text.contains("heat risk, rain"));
    }

    #[test]
    fn advisories_listed_in_order() {
        let conditions = CurrentConditions {
            location: "Nashik, IN".into(),
            snapshot: WeatherSnapshot {
                temperature_c: 36.0,
                humidity_percent: 85.0,
                wind_speed: 6.2,
                rain_last_hour_mm: None,
                condition_code: 800,
            },
            window: Vec::new(),
        };
        let signals = [
            AdvisorySignal::new(Severity::Warning, "High wind", "spray_drift"),
            AdvisorySignal::new(Severity::Alert, "Fungal risk", "fungal_risk"),
        ];
        let text = render_advisories(&conditions, &signals);
        let wind = text.find("High wind").unwrap();
        let fungal = text.find("Fungal risk").unwrap();
        assert!(wind < fungal);
        assert!(text.starts_with("Nashik, IN: Clear, 36.0°C"));
    }
}
