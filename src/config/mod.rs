//! Configuration management for face-relations.
//!
//! Configuration files are markdown with YAML frontmatter:
//!
//! ```text
//! ---
//! api:
//!   endpoint: https://face.gob.es/api/v2/relaciones
//! polling:
//!   interval_ms: 1000
//!   empty_response_delay_ms: 2000
//!   max_attempts: 30
//! ---
//!
//! # Notes
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub mod defaults;
pub mod validation;

pub use defaults::*;

/// Project config location, relative to the working directory
pub const PROJECT_CONFIG_PATH: &str = ".face-relations/config.md";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

impl Config {
    /// Load configuration with full merge semantics.
    /// Merge order (later overrides earlier):
    /// 1. Global config (<config_dir>/face-relations/config.md)
    /// 2. Project config (.face-relations/config.md)
    /// 3. Explicit config path, if given
    ///
    /// Missing global and project files are skipped; a missing explicit file
    /// is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_merged_from(
            global_config_path().as_deref(),
            Some(Path::new(PROJECT_CONFIG_PATH)),
            explicit,
        )
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config = PartialConfig::parse(content)?.merge_over(Config::default());
        config.validate()?;
        Ok(config)
    }

    /// Load merged configuration from the given global, project and explicit paths.
    pub fn load_merged_from(
        global_path: Option<&Path>,
        project_path: Option<&Path>,
        explicit_path: Option<&Path>,
    ) -> Result<Self> {
        let mut config = Config::default();

        for path in [global_path, project_path].into_iter().flatten() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                config = PartialConfig::load_from(path)?.merge_over(config);
            }
        }

        if let Some(path) = explicit_path {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "loading config");
            config = PartialConfig::load_from(path)?.merge_over(config);
        }

        config.validate()?;
        Ok(config)
    }

    /// Render as YAML frontmatter document
    pub fn to_markdown(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// Returns the path to the global config file at <config_dir>/face-relations/config.md
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("face-relations").join("config.md"))
}

/// Expand `~` in a user-supplied config path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}

/// Split `---` delimited YAML frontmatter from the markdown body.
pub fn split_frontmatter(content: &str) -> (Option<String>, &str) {
    let content = content.trim();

    if !content.starts_with("---") {
        return (None, content);
    }

    let rest = &content[3..];
    if let Some(end) = rest.find("---") {
        let frontmatter = rest[..end].to_string();
        let body = rest[end + 3..].trim_start();
        (Some(frontmatter), body)
    } else {
        (None, content)
    }
}

/// Partial config for merging - all fields optional
#[derive(Debug, Deserialize, Default)]
struct PartialConfig {
    pub api: Option<PartialApiConfig>,
    pub polling: Option<PartialPollingConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialApiConfig {
    pub endpoint: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PartialPollingConfig {
    pub interval_ms: Option<u64>,
    pub empty_response_delay_ms: Option<u64>,
    pub max_attempts: Option<usize>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let (frontmatter, _body) = split_frontmatter(content);
        let frontmatter = frontmatter.context("Failed to extract frontmatter from config")?;

        // An empty frontmatter block deserializes as YAML null
        if frontmatter.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&frontmatter).context("Failed to parse config frontmatter")
    }

    /// Overlay the values set in this file on top of `base`.
    fn merge_over(self, base: Config) -> Config {
        let api = self.api.unwrap_or_default();
        let polling = self.polling.unwrap_or_default();

        Config {
            api: ApiConfig {
                endpoint: api.endpoint.unwrap_or(base.api.endpoint),
                user_agent: api.user_agent.unwrap_or(base.api.user_agent),
            },
            polling: PollingConfig {
                interval_ms: polling.interval_ms.unwrap_or(base.polling.interval_ms),
                empty_response_delay_ms: polling
                    .empty_response_delay_ms
                    .unwrap_or(base.polling.empty_response_delay_ms),
                max_attempts: polling.max_attempts.or(base.polling.max_attempts),
            },
        }
    }
}
