//! Runtime configuration structs (design §9: "core never loads config files
//! directly" — the CLI parses TOML/env and hands the core a plain struct).

use std::time::Duration;

use crate::retry::RetryConfig;

/// Tunables for the Existential Budget / Token Economy (design §4.2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EconomyConfig {
    /// Starting token pool at age 1.
    pub base_token_pool: i64,
    /// Multiplier applied to the pool ceiling on every age-up.
    pub pool_growth_rate: f64,
    /// Starting karma quota at age 1.
    pub base_karma_quota: f64,
    /// Multiplier applied to the karma quota on every age-up.
    pub karma_quota_growth_rate: f64,
    /// Whether a karma-debt streak is allowed to regress the age.
    pub age_regression_enabled: bool,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        use crate::constants::economy;
        Self {
            base_token_pool: economy::BASE_TOKEN_POOL,
            pool_growth_rate: economy::TOKEN_POOL_GROWTH_RATE,
            base_karma_quota: economy::BASE_KARMA_QUOTA,
            karma_quota_growth_rate: economy::KARMA_QUOTA_GROWTH_RATE,
            age_regression_enabled: economy::AGE_REGRESSION_ENABLED_DEFAULT,
        }
    }
}

/// Top-level configuration handed to the orchestrator at construction time.
///
/// The core never reads a config file itself; `luna-cli` owns parsing TOML
/// and environment overrides into this struct.
#[derive(Debug, Clone)]
pub struct LunaCoreConfig {
    /// Directory where all persistent state (existential/CFIA/lessons/shadow
    /// score) is stored.
    pub data_dir: std::path::PathBuf,
    /// Existential Budget tunables.
    pub economy: EconomyConfig,
    /// Retry policy applied to the LLM capability and judge calls.
    pub retry: RetryConfig,
    /// Per-request timeout applied around the whole pipeline.
    pub request_timeout: Duration,
}

impl LunaCoreConfig {
    /// Build a config rooted at `data_dir` with every other field defaulted.
    #[must_use]
    pub fn new(data_dir: impl Into<std::path::PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            economy: EconomyConfig::default(),
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}
