//! Process-wide settings, built once at startup and never mutated.

use std::time::Duration;

use crate::error::ConfigError;
use crate::orchestrator::RunOptions;
use crate::provider::{DeepSeekClient, RetryPolicy};
use crate::provider::deepseek::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: RetryPolicy::default().max_retries,
        }
    }

    pub fn client(&self) -> anyhow::Result<DeepSeekClient> {
        Ok(DeepSeekClient::new(self.api_key.clone())?
            .with_base_url(self.base_url.clone())
            .with_model(self.model.clone())
            .with_retry(RetryPolicy::new(self.max_retries)))
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub run: RunOptions,
}

impl Settings {
    pub fn new(provider: ProviderSettings, run: RunOptions) -> Result<Self, ConfigError> {
        run.validate()?;
        Ok(Self { provider, run })
    }
}

/// Seconds to an optional timeout; `0` means no timeout.
pub fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
    secs.filter(|s| *s > 0).map(Duration::from_secs)
}
