//! Gateway configuration.
//!
//! Defaults are embedded at compile time from `config/gateway.toml`; the
//! base URL and region can be overridden with `MIN_API_BASE_URL` and
//! `MIN_REGION`.

use serde::Deserialize;

use crate::GatewayError;

const GATEWAY_TOML: &str = include_str!("../config/gateway.toml");

/// Environment variable overriding [`GatewayConfig::base_url`].
pub const BASE_URL_ENV: &str = "MIN_API_BASE_URL";

/// Environment variable overriding [`GatewayConfig::region`].
pub const REGION_ENV: &str = "MIN_REGION";

/// Where and what to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayConfig {
    /// API root, without the `/submissions` suffix.
    pub base_url: String,
    /// Forecast region label sent as the `region` parameter.
    pub region: String,
    /// Length of the trailing date window, in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

const fn default_window_days() -> u32 {
    7
}

impl GatewayConfig {
    /// Parses the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, GatewayError> {
        Self::from_toml(GATEWAY_TOML)
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if `text` is not a valid config.
    pub fn from_toml(text: &str) -> Result<Self, GatewayError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Embedded defaults with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the embedded TOML is malformed.
    pub fn from_env() -> Result<Self, GatewayError> {
        let mut config = Self::embedded()?;
        config.apply_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(REGION_ENV).ok(),
        );
        Ok(config)
    }

    /// Replaces fields with non-blank overrides.
    pub fn apply_overrides(&mut self, base_url: Option<String>, region: Option<String>) {
        if let Some(url) = base_url.filter(|s| !s.trim().is_empty()) {
            log::debug!("Overriding gateway base URL with {url}");
            self.base_url = url;
        }
        if let Some(region) = region.filter(|s| !s.trim().is_empty()) {
            log::debug!("Overriding gateway region with {region}");
            self.region = region;
        }
    }
}
