use super::{error_from_response, StagePlanner};
use crate::config::ProviderConfig;
use crate::error::{CropwiseError, Result};
use crate::models::{StagePlan, StagePlanRequest};
use async_trait::async_trait;

const PROVIDER: &str = "Stage service";

/// Client for the remote crop-stage / fertilizer recommendation service
pub struct StageServiceClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl StageServiceClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn plan_url(&self) -> String {
        format!("{}/growth-plan", self.config.base())
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/", self.config.base()))
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(PROVIDER, e.to_string()))?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl StagePlanner for StageServiceClient {
    async fn request_plan(&self, request: &StagePlanRequest) -> Result<StagePlan> {
        tracing::debug!(
            "Requesting stage plan for {} sown {}",
            request.crop_type,
            request.sowing_date
        );

        let mut builder = self
            .client
            .post(self.plan_url())
            .header("Content-Type", "application/json")
            .json(request);

        if let Some(key) = self.config.api_key() {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CropwiseError::fetch(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(PROVIDER, response).await);
        }

        response.json().await.map_err(|e| {
            CropwiseError::InvalidData(format!("Failed to parse stage service response: {}", e))
        })
    }
}
