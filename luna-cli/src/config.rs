//! `LunaConfig`: TOML + environment configuration, owned by the CLI crate
//! only — the core crate never parses a config file (design §9.1).

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// On-disk/environment configuration, merged into a [`luna_core::LunaCoreConfig`]
/// by [`LunaConfig::into_core_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunaConfig {
    /// Directory holding all persisted state, overridable with `--data-dir`.
    pub data_dir: Option<PathBuf>,
    /// HTTP endpoint for the main LLM backend (design §6.1).
    pub llm_endpoint: String,
    /// HTTP endpoint for the Arbiter's lighter judge backend; defaults to
    /// `llm_endpoint` if unset.
    pub judge_endpoint: Option<String>,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: u64,
    /// Whether age regression is enabled (design §4.2, §9 open question).
    pub age_regression_enabled: bool,
}

impl Default for LunaConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            llm_endpoint: "http://localhost:8080/v1/chat/completions".to_string(),
            judge_endpoint: None,
            request_timeout_secs: 30,
            age_regression_enabled: false,
        }
    }
}

impl LunaConfig {
    /// Load from an optional TOML file, then apply `LUNA_`-prefixed
    /// environment overrides, mirroring the teacher's `from_env()` pattern.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file: {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse TOML config: {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Ok(endpoint) = std::env::var("LUNA_LLM_ENDPOINT") {
            config.llm_endpoint = endpoint;
        }
        if let Ok(dir) = std::env::var("LUNA_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Ok(timeout) = std::env::var("LUNA_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                config.request_timeout_secs = secs;
            }
        }

        Ok(config)
    }

    /// Resolve the effective data directory: `--data-dir` override, then
    /// config/env value, then a platform data directory.
    #[must_use]
    pub fn resolve_data_dir(&self, cli_override: Option<PathBuf>) -> PathBuf {
        cli_override
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(|| dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("luna"))
    }

    /// Build the core crate's plain configuration struct.
    #[must_use]
    pub fn into_core_config(self, data_dir: PathBuf) -> luna_core::LunaCoreConfig {
        let mut core_config = luna_core::LunaCoreConfig::new(data_dir);
        core_config.economy.age_regression_enabled = self.age_regression_enabled;
        core_config.request_timeout = std::time::Duration::from_secs(self.request_timeout_secs);
        core_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_local_endpoint() {
        let config = LunaConfig::default();
        assert!(config.llm_endpoint.starts_with("http://"));
    }

    #[test]
    fn resolve_data_dir_prefers_cli_override() {
        let config = LunaConfig::default();
        let resolved = config.resolve_data_dir(Some(PathBuf::from("/tmp/override")));
        assert_eq!(resolved, PathBuf::from("/tmp/override"));
    }
}
