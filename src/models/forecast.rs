use super::soil::SoilSample;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day of the 16-day live-conditions forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

/// Live-conditions provider read: current air, soil at the representative hour,
/// and the daily forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveConditions {
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub soil: SoilSample,
    pub forecast: Vec<ForecastDay>,
}

/// Display projection of a forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastProjection {
    pub date: NaiveDate,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    /// Bar height as percent of the display scale
    pub bar_percent: f64,
    pub heat_risk: bool,
    pub rain_expected: bool,
}

/// Current conditions from the current-conditions provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub humidity_percent: f64,
    /// m/s
    pub wind_speed: f64,
    pub rain_last_hour_mm: Option<f64>,
    pub condition_code: u32,
}

/// One representative forecast entry per day from the current-conditions provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub condition: WeatherCondition,
    pub temperature_c: f64,
}

/// Snapshot plus forecast window evaluated by the advisory rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub snapshot: WeatherSnapshot,
    pub window: Vec<ForecastEntry>,
}

/// Weather condition groups from OpenWeatherMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other,
}

impl WeatherCondition {
    pub fn from_owm_id(id: u32) -> Self {
        match id {
            200..=232 => WeatherCondition::Thunderstorm,
            300..=321 => WeatherCondition::Drizzle,
            500..=531 => WeatherCondition::Rain,
            600..=622 => WeatherCondition::Snow,
            701 => WeatherCondition::Mist,
            741 => WeatherCondition::Fog,
            800 => WeatherCondition::Clear,
            801..=804 => WeatherCondition::Clouds,
            _ => WeatherCondition::Other,
        }
    }

    /// Parse the `weather[].main` group name
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => WeatherCondition::Clear,
            "Clouds" => WeatherCondition::Clouds,
            "Rain" => WeatherCondition::Rain,
            "Drizzle" => WeatherCondition::Drizzle,
            "Thunderstorm" => WeatherCondition::Thunderstorm,
            "Snow" => WeatherCondition::Snow,
            "Mist" => WeatherCondition::Mist,
            "Fog" => WeatherCondition::Fog,
            _ => WeatherCondition::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Cloudy",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Mist => "Mist",
            WeatherCondition::Fog => "Fog",
            WeatherCondition::Other => "Other",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_condition_from_owm_id() {
        assert_eq!(
            WeatherCondition::from_owm_id(200),
            WeatherCondition::Thunderstorm
        );
        assert_eq!(WeatherCondition::from_owm_id(500), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_owm_id(800), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_owm_id(801), WeatherCondition::Clouds);
    }

    #[test]
    fn weather_condition_from_main_is_exact() {
        assert_eq!(WeatherCondition::from_main("Rain"), WeatherCondition::Rain);
        assert_eq!(
            WeatherCondition::from_main("Drizzle"),
            WeatherCondition::Drizzle
        );
        assert_eq!(WeatherCondition::from_main("rain"), WeatherCondition::Other);
    }
}
