use super::{error_from_response, ClimateArchive, LiveConditionsSource};
use crate::config::ProviderConfig;
use crate::error::{CropwiseError, Result};
use crate::logic::soil::REPRESENTATIVE_HOUR_INDEX;
use crate::models::{DailyClimateRecord, ForecastDay, LiveConditions, SoilSample};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

const ARCHIVE_PROVIDER: &str = "Climate archive";
const FORECAST_PROVIDER: &str = "Live conditions";
pub const FORECAST_DAYS: u32 = 16;

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: ArchiveDaily,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<ForecastCurrent>,
    #[serde(default)]
    hourly: Option<ForecastHourly>,
    #[serde(default)]
    daily: Option<ForecastDaily>,
}

#[derive(Debug, Deserialize)]
struct ForecastCurrent {
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastHourly {
    #[serde(default)]
    soil_moisture_0_to_1cm: Vec<Option<f64>>,
    #[serde(default)]
    soil_moisture_3_to_9cm: Vec<Option<f64>>,
    #[serde(default)]
    soil_moisture_9_to_27cm: Vec<Option<f64>>,
    #[serde(default)]
    soil_temperature_6cm: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastDaily {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
}

fn at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| CropwiseError::InvalidData(format!("bad date '{}': {}", s, e)))
}

fn with_api_key(mut url: String, config: &ProviderConfig) -> String {
    if let Some(key) = config.api_key() {
        url.push_str("&apikey=");
        url.push_str(key);
    }
    url
}

/// Daily historical temperatures from the Open-Meteo archive
pub struct ArchiveClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ArchiveClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, latitude: f64, longitude: f64, start: NaiveDate, end: NaiveDate) -> String {
        let url = format!(
            "{}/archive?latitude={}&longitude={}&start_date={}&end_date={}\
             &daily=temperature_2m_max,temperature_2m_min&timezone=auto",
            self.config.base(),
            latitude,
            longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );
        with_api_key(url, &self.config)
    }

    fn convert_response(response: ArchiveResponse) -> Result<Vec<DailyClimateRecord>> {
        let daily = response.daily;
        daily
            .time
            .iter()
            .enumerate()
            .map(|(i, date)| {
                Ok(DailyClimateRecord::new(
                    parse_date(date)?,
                    at(&daily.temperature_2m_max, i),
                    at(&daily.temperature_2m_min, i),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl ClimateArchive for ArchiveClient {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClimateRecord>> {
        tracing::debug!("Fetching archive temperatures {} to {}", start, end);

        let response = self
            .client
            .get(self.url(latitude, longitude, start, end))
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(ARCHIVE_PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(ARCHIVE_PROVIDER, response).await);
        }

        let body: ArchiveResponse = response.json().await.map_err(|e| {
            CropwiseError::InvalidData(format!("Failed to parse archive response: {}", e))
        })?;

        Self::convert_response(body)
    }
}

/// Current conditions, hourly soil, and daily forecast from Open-Meteo
pub struct ForecastClient {
    client: reqwest::Client,
    config: ProviderConfig,
    representative_hour: usize,
}

impl ForecastClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            representative_hour: REPRESENTATIVE_HOUR_INDEX,
        }
    }

    pub fn with_representative_hour(mut self, index: usize) -> Self {
        self.representative_hour = index;
        self
    }

    fn url(&self, latitude: f64, longitude: f64) -> String {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}\
             &daily=temperature_2m_max,temperature_2m_min,precipitation_sum\
             &hourly=soil_moisture_0_to_1cm,soil_moisture_3_to_9cm,soil_moisture_9_to_27cm,soil_temperature_6cm\
             &current=temperature_2m,relative_humidity_2m\
             &forecast_days={}&timezone=auto",
            self.config.base(),
            latitude,
            longitude,
            FORECAST_DAYS
        );
        with_api_key(url, &self.config)
    }

    fn convert_response(
        response: ForecastResponse,
        representative_hour: usize,
    ) -> Result<LiveConditions> {
        let (temperature_c, humidity_percent) = response
            .current
            .map(|c| (c.temperature_2m, c.relative_humidity_2m))
            .unwrap_or((None, None));

        // One fixed hour rather than a daily mean
        let soil = response
            .hourly
            .map(|h| SoilSample {
                shallow: at(&h.soil_moisture_0_to_1cm, representative_hour),
                mid: at(&h.soil_moisture_3_to_9cm, representative_hour),
                deep: at(&h.soil_moisture_9_to_27cm, representative_hour),
                soil_temp_c: at(&h.soil_temperature_6cm, representative_hour),
            })
            .unwrap_or_default();

        let forecast = match response.daily {
            Some(daily) => daily
                .time
                .iter()
                .take(FORECAST_DAYS as usize)
                .enumerate()
                .map(|(i, date)| {
                    Ok(ForecastDay {
                        date: parse_date(date)?,
                        max_temp_c: at(&daily.temperature_2m_max, i),
                        min_temp_c: at(&daily.temperature_2m_min, i),
                        precipitation_mm: at(&daily.precipitation_sum, i),
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(LiveConditions {
            temperature_c,
            humidity_percent,
            soil,
            forecast,
        })
    }

    /// Check the provider answers at all
    pub async fn test_connection(&self, latitude: f64, longitude: f64) -> Result<bool> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m",
            self.config.base(),
            latitude,
            longitude
        );
        let response = self
            .client
            .get(with_api_key(url, &self.config))
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(FORECAST_PROVIDER, e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl LiveConditionsSource for ForecastClient {
    async fn fetch_live(&self, latitude: f64, longitude: f64) -> Result<LiveConditions> {
        tracing::debug!("Fetching live conditions for {}, {}", latitude, longitude);

        let response = self
            .client
            .get(self.url(latitude, longitude))
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(FORECAST_PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(FORECAST_PROVIDER, response).await);
        }

        let body: ForecastResponse = response.json().await.map_err(|e| {
            CropwiseError::InvalidData(format!("Failed to parse forecast response: {}", e))
        })?;

        Self::convert_response(body, self.representative_hour)
    }
}
