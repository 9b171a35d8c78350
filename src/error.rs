//! Error types.
//!
//! - [`ConfigError`]: problems found before any unit starts. Fatal to the run.
//! - [`ProviderError`]: a failed translation request.
//! - [`UnitError`]: why a single (group, target language) unit failed. Fatal
//!   to that unit only; sibling units keep going.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("batch size must be greater than 0")]
    InvalidBatchSize,

    #[error("concurrency must be greater than 0")]
    InvalidConcurrency,

    #[error(
        "if you specify --source-lang, --target-lang, --source-file or --target-file, all of them must be provided (missing: {})",
        .0.join(", ")
    )]
    MissingArgs(Vec<&'static str>),

    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("no i18n.yaml found in current or parent directories")]
    NoConfig,

    #[error("config file {} is empty or invalid", .0.display())]
    EmptyConfig(PathBuf),

    #[error("invalid group #{index} in {}: {reason}", .path.display())]
    InvalidGroup {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("rate limited by provider: {message}")]
    RateLimited { message: String },

    #[error("provider returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::RateLimited { .. } | ProviderError::Network(_) => true,
            ProviderError::Status { status, .. } => *status >= 500,
            ProviderError::Auth { .. } | ProviderError::MalformedResponse(_) => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("{}: {reason}", .path.display())]
    FileAccess { path: PathBuf, reason: String },

    #[error("batch {batch} failed: {source}")]
    Provider {
        batch: usize,
        #[source]
        source: ProviderError,
    },

    #[error("batch {batch} returned no translation for {} key(s): {}", .missing.len(), .missing.join(", "))]
    PartialResponse { batch: usize, missing: Vec<String> },

    #[error("timed out after {0}s waiting for the provider")]
    Timeout(u64),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl UnitError {
    pub fn file_access(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        UnitError::FileAccess {
            path: path.into(),
            reason: format!("{:#}", err),
        }
    }
}
