use super::{error_from_response, CurrentConditionsSource};
use crate::config::OpenWeatherMapConfig;
use crate::error::{CropwiseError, Result};
use crate::models::{CurrentConditions, ForecastEntry, WeatherCondition, WeatherSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

const PROVIDER: &str = "OpenWeatherMap";
/// The 3-hour slot kept as each day's representative entry
const DAILY_SLOT: &str = "12:00:00";
pub const FORECAST_WINDOW_DAYS: usize = 5;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmCurrentResponse {
    weather: Vec<OwmWeather>,
    main: OwmMain,
    wind: OwmWind,
    #[serde(default)]
    rain: Option<OwmRain>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: Option<OwmSys>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    dt: i64,
    dt_txt: String,
    main: OwmMain,
    weather: Vec<OwmWeather>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    id: u32,
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h", default)]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: Option<String>,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, endpoint: &str, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/{}?lat={}&lon={}&units=metric&appid={}",
            self.config.base_url.trim_end_matches('/'),
            endpoint,
            latitude,
            longitude,
            self.config.api_key
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, response).await);
        }

        response.json().await.map_err(|e| {
            CropwiseError::InvalidData(format!("Failed to parse OpenWeatherMap response: {}", e))
        })
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self, latitude: f64, longitude: f64) -> Result<bool> {
        let response = self
            .client
            .get(self.url("weather", latitude, longitude))
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(PROVIDER, e.to_string()))?;

        Ok(response.status().is_success())
    }

    fn convert_current(current: &OwmCurrentResponse) -> WeatherSnapshot {
        WeatherSnapshot {
            temperature_c: current.main.temp,
            humidity_percent: current.main.humidity,
            wind_speed: current.wind.speed,
            rain_last_hour_mm: current.rain.as_ref().and_then(|r| r.one_hour),
            condition_code: current.weather.first().map(|w| w.id).unwrap_or(800),
        }
    }

    fn location_label(current: &OwmCurrentResponse) -> String {
        match current.sys.as_ref().and_then(|s| s.country.as_deref()) {
            Some(country) if !current.name.is_empty() => format!("{}, {}", current.name, country),
            _ => current.name.clone(),
        }
    }

    /// Keep one midday entry per day for the first few days
    fn daily_window(forecast: OwmForecastResponse) -> Vec<ForecastEntry> {
        forecast
            .list
            .into_iter()
            .filter(|item| item.dt_txt.contains(DAILY_SLOT))
            .take(FORECAST_WINDOW_DAYS)
            .map(|item| ForecastEntry {
                timestamp: DateTime::from_timestamp(item.dt, 0).unwrap_or_else(Utc::now),
                condition: item
                    .weather
                    .first()
                    .map(|w| WeatherCondition::from_main(&w.main))
                    .unwrap_or_default(),
                temperature_c: item.main.temp,
            })
            .collect()
    }
}

#[async_trait]
impl CurrentConditionsSource for OpenWeatherMapClient {
    async fn fetch_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions> {
        let weather_url = self.url("weather", latitude, longitude);
        let forecast_url = self.url("forecast", latitude, longitude);

        let (current, forecast) = tokio::try_join!(
            self.get_json::<OwmCurrentResponse>(&weather_url),
            self.get_json::<OwmForecastResponse>(&forecast_url)
        )?;

        Ok(CurrentConditions {
            location: Self::location_label(&current),
            snapshot: Self::convert_current(&current),
            window: Self::daily_window(forecast),
        })
    }
}
