use crate::error::{CropwiseError, Result};
use crate::logic::calculations::DEFAULT_ARCHIVE_LAG_DAYS;
use crate::logic::soil::REPRESENTATIVE_HOUR_INDEX;
use crate::models::Location;
use dialoguer::{Input, Password};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "ProviderConfig::archive_default")]
    pub archive: ProviderConfig,
    #[serde(default = "ProviderConfig::forecast_default")]
    pub forecast: ProviderConfig,
    #[serde(default = "ProviderConfig::stage_service_default")]
    pub stage_service: ProviderConfig,
    pub openweathermap: Option<OpenWeatherMapConfig>,
    pub location: Option<Location>,
    #[serde(default)]
    pub soil: SoilConfig,
    #[serde(default = "default_archive_lag_days")]
    pub archive_lag_days: i64,
}

/// Endpoint settings injected into each provider client
#[derive(Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn archive_default() -> Self {
        Self::new("https://archive-api.open-meteo.com/v1")
    }

    pub fn forecast_default() -> Self {
        Self::new("https://api.open-meteo.com/v1")
    }

    pub fn stage_service_default() -> Self {
        Self::new("http://localhost:8000")
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    #[serde(default = "default_owm_base_url")]
    pub base_url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_owm_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".into()
}

fn default_enabled() -> bool {
    true
}

const MAX_ARCHIVE_LAG_DAYS: i64 = 366;

fn default_archive_lag_days() -> i64 {
    DEFAULT_ARCHIVE_LAG_DAYS
}

impl OpenWeatherMapConfig {
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoilConfig {
    #[serde(default = "default_representative_hour")]
    pub representative_hour_index: usize,
}

fn default_representative_hour() -> usize {
    REPRESENTATIVE_HOUR_INDEX
}

impl Default for SoilConfig {
    fn default() -> Self {
        Self {
            representative_hour_index: REPRESENTATIVE_HOUR_INDEX,
        }
    }
}

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(CropwiseError::Config(format!(
                "Config file not found at {:?}. Run `cropwise init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropwiseError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after substituting `${VAR}` placeholders from the environment
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CropwiseError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0..=MAX_ARCHIVE_LAG_DAYS).contains(&self.archive_lag_days) {
            return Err(CropwiseError::Config(format!(
                "archive_lag_days must be between 0 and {}",
                MAX_ARCHIVE_LAG_DAYS
            )));
        }
        if let Some(ref loc) = self.location {
            if !(-90.0..=90.0).contains(&loc.latitude)
                || !(-180.0..=180.0).contains(&loc.longitude)
            {
                return Err(CropwiseError::Config(format!(
                    "location ({}, {}) is out of range",
                    loc.latitude, loc.longitude
                )));
            }
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropwise").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropwise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropwiseError::Config("Cannot determine config directory".into()))?
            .join("cropwise");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up Cropwise!");
        println!();

        println!("Field location (leave city blank to skip)");
        let city: String = Input::new()
            .with_prompt("  City")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let location = if city.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Latitude")
                .default(18.52)
                .interact_text()
                .map_err(input_error)?;

            let longitude: f64 = Input::new()
                .with_prompt("  Longitude")
                .default(73.86)
                .interact_text()
                .map_err(input_error)?;

            Some(Location {
                latitude,
                longitude,
                city: Some(city),
            })
        };

        println!();

        println!("Crop stage service");
        let stage_url: String = Input::new()
            .with_prompt("  Base URL")
            .default(ProviderConfig::stage_service_default().base_url)
            .interact_text()
            .map_err(input_error)?;

        let stage_key: String = Password::new()
            .with_prompt("  API key (optional)")
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)?;

        println!();

        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Input::new()
            .with_prompt("  API key")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                base_url: default_owm_base_url(),
                enabled: true,
            })
        };

        println!();

        let config = Config {
            stage_service: ProviderConfig {
                base_url: stage_url,
                api_key: Some(stage_key).filter(|k| !k.is_empty()),
            },
            openweathermap,
            location,
            ..Config::default()
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropwiseError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# Cropwise Configuration\n# Generated by `cropwise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

fn input_error(e: dialoguer::Error) -> CropwiseError {
    CropwiseError::Config(format!("Input error: {}", e))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: ProviderConfig::archive_default(),
            forecast: ProviderConfig::forecast_default(),
            stage_service: ProviderConfig::stage_service_default(),
            openweathermap: None,
            location: None,
            soil: SoilConfig::default(),
            archive_lag_days: DEFAULT_ARCHIVE_LAG_DAYS,
        }
    }
}
