//! CLI configuration: `~/.fishiko/config.toml`, overridden by flags and env.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_WEATHER_URL;
use crate::error::{AppError, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub weather_url: Option<String>,
    pub weather_api_key: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Values set in `overrides` win over the ones loaded from file.
    pub fn merge(self, overrides: Config) -> Self {
        Self {
            api_url: overrides.api_url.or(self.api_url),
            token: overrides.token.or(self.token),
            weather_url: overrides.weather_url.or(self.weather_url),
            weather_api_key: overrides.weather_api_key.or(self.weather_api_key),
        }
    }

    pub fn api_url(&self) -> Result<&str> {
        self.api_url.as_deref().ok_or_else(|| {
            AppError::Config(
                "prediction API URL is not set (use --api-url or FISHIKO_API_URL)".to_string(),
            )
        })
    }

    pub fn weather_url(&self) -> &str {
        self.weather_url.as_deref().unwrap_or(DEFAULT_WEATHER_URL)
    }

    pub fn weather_api_key(&self) -> Result<&str> {
        self.weather_api_key.as_deref().ok_or_else(|| {
            AppError::Config(
                "weather API key is not set (use --weather-api-key or OPENWEATHER_API_KEY)"
                    .to_string(),
            )
        })
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("cannot find home directory".to_string()))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".fishiko").join(filename))
    }
}
