use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropwiseError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success response from a provider, carrying the provider's reason
    #[error("{provider} request failed: {reason}")]
    Fetch { provider: String, reason: String },

    #[error("Missing input: {0}")]
    Validation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("A growth plan run is already in progress")]
    Busy,

    #[error("Run {0} was superseded before its result arrived")]
    Superseded(u64),
}

impl CropwiseError {
    pub fn fetch(provider: &str, reason: impl Into<String>) -> Self {
        CropwiseError::Fetch {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CropwiseError>;
