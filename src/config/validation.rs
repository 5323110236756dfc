//! Validation logic for configuration.

use anyhow::{Context, Result};
use url::Url;

use super::defaults::{ApiConfig, PollingConfig};
use super::Config;

impl Config {
    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.polling.validate()
    }
}

impl ApiConfig {
    /// Validate API configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("api.endpoint is not a valid URL: {}", self.endpoint))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!(
                "api.endpoint must use http or https, got '{}'",
                url.scheme()
            );
        }

        if self.user_agent.trim().is_empty() {
            anyhow::bail!("api.user_agent must not be empty");
        }

        Ok(())
    }
}

impl PollingConfig {
    /// Validate polling configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == Some(0) {
            anyhow::bail!("polling.max_attempts must be greater than 0 when set");
        }

        Ok(())
    }
}
