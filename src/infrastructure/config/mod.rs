// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Layered config: defaults <- TOML file <- ALLERSCAN_* env vars

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::{Validate, ValidationError};

use crate::domain::error::{AppError, Result};
use crate::domain::slm_config::{SlmConfig, SlmProvider};

pub const DEFAULT_CONFIG_FILE: &str = "allerscan.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Path to the food dataset CSV
    #[validate(length(min = 1, message = "csv_path must not be empty"))]
    pub csv_path: String,

    /// Field delimiter; auto-detected when unset
    pub csv_delimiter: Option<char>,

    /// Items per dataset partition
    #[validate(range(min = 1, max = 10_000))]
    pub dataset_size: usize,

    /// Pause between inference calls during a batch run
    #[validate(range(max = 60_000))]
    pub request_delay_ms: u64,

    /// SQLite results store
    #[validate(length(min = 1, message = "db_path must not be empty"))]
    pub db_path: String,

    pub model: SlmConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            csv_path: "foodpreprocessed.csv".to_string(),
            csv_delimiter: None,
            dataset_size: 20,
            request_delay_ms: 50,
            db_path: "allerscan.db".to_string(),
            model: SlmConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the given TOML file (when present) and the
    /// environment, layered over defaults.
    pub fn load(config_file: &str) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("ALLERSCAN_").split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load config: {}", e)))?;

        config.check()?;
        Ok(config)
    }

    /// Validate field constraints plus provider-specific requirements.
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid config: {}", e)))?;

        match self.model.provider {
            SlmProvider::Command => {
                if self.model.command.as_deref().map(str::trim).unwrap_or("").is_empty() {
                    return Err(AppError::ConfigError(
                        "Command provider requires model.command".to_string(),
                    ));
                }
            }
            _ => {
                validate_base_url(&self.model.base_url).map_err(|_| {
                    AppError::ConfigError(format!(
                        "model.base_url is not a valid URL: {}",
                        self.model.base_url
                    ))
                })?;
            }
        }

        Ok(())
    }
}

fn validate_base_url(value: &str) -> std::result::Result<(), ValidationError> {
    Url::parse(value).map_err(|_| ValidationError::new("base_url"))?;
    Ok(())
}
