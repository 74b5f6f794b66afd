pub mod open_meteo;
pub mod openweathermap;
pub mod stage_service;

pub use open_meteo::{ArchiveClient, ForecastClient};
pub use openweathermap::OpenWeatherMapClient;
pub use stage_service::StageServiceClient;

use crate::error::{CropwiseError, Result};
use crate::models::{
    CurrentConditions, DailyClimateRecord, LiveConditions, StagePlan, StagePlanRequest,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Historical daily max/min temperatures
#[async_trait]
pub trait ClimateArchive: Send + Sync {
    async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClimateRecord>>;
}

/// Current air, hourly soil, and 16-day daily forecast
#[async_trait]
pub trait LiveConditionsSource: Send + Sync {
    async fn fetch_live(&self, latitude: f64, longitude: f64) -> Result<LiveConditions>;
}

/// Remote crop-stage and recommendation service
#[async_trait]
pub trait StagePlanner: Send + Sync {
    async fn request_plan(&self, request: &StagePlanRequest) -> Result<StagePlan>;
}

/// Current conditions plus a per-day forecast window for the advisory rules
#[async_trait]
pub trait CurrentConditionsSource: Send + Sync {
    async fn fetch_conditions(&self, latitude: f64, longitude: f64)
        -> Result<CurrentConditions>;
}

/// Turn a non-success response into a `Fetch` error, preferring the
/// provider's own reason over the bare status line.
pub(crate) async fn error_from_response(
    provider: &str,
    response: reqwest::Response,
) -> CropwiseError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    CropwiseError::fetch(provider, provider_reason(status, &body))
}

pub(crate) fn provider_reason(status: reqwest::StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["reason", "error", "message", "detail"]
                .iter()
                .find_map(|key| match v.get(*key) {
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(_)) | None => {
                        None
                    }
                    Some(other) => Some(other.to_string()),
                })
        });

    match from_json {
        Some(reason) => format!("({}) {}", status.as_u16(), reason),
        None if !body.trim().is_empty() => format!("({}) {}", status.as_u16(), body.trim()),
        None => status.to_string(),
    }
}
