//! Client configuration
//!
//! [`RadikoConfig`] is a plain serde structure so it can live in a YAML file
//! next to the rest of an application's settings:
//!
//! ```yaml
//! base_url: https://radiko.jp
//! area_id: JP13
//! timeout_secs: 30
//! user_agent: PMOMusic/0.3.10 (pmoradiko)
//! ```
//!
//! Every key is optional; missing keys take the client defaults.

use crate::api::{DEFAULT_AREA_ID, DEFAULT_BASE_URL};
use crate::client::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Settings used to build a [`crate::RadikoClient`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RadikoConfig {
    pub base_url: String,
    pub area_id: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Pre-issued session token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl Default for RadikoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            area_id: DEFAULT_AREA_ID.to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            auth_token: None,
        }
    }
}

impl RadikoConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading radiko configuration from {}", path.display());
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.area_id.trim().is_empty() {
            return Err(Error::Config("area_id must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
