//! CLI argument definitions using clap.
//!
//! Language groups come from one of two places:
//!
//! - a config file (`--config`, or `i18n.yaml` / `i18n.yml` discovered in the
//!   working directory and its parents)
//! - a single pair given by `--source-lang`, `--target-lang`, `--source-file`
//!   and `--target-file`, which must be used together

use std::path::PathBuf;

use clap::Parser;

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::orchestrator::DEFAULT_CONCURRENCY;
use crate::provider::deepseek::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::provider::DEFAULT_MAX_RETRIES;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path to the language group config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source language code (requires all four pair flags)
    #[arg(long, value_name = "CODE")]
    pub source_lang: Option<String>,

    /// Target language code
    #[arg(long, value_name = "CODE")]
    pub target_lang: Option<String>,

    /// Source locale file
    #[arg(long, value_name = "PATH")]
    pub source_file: Option<PathBuf>,

    /// Target locale file (created if missing)
    #[arg(long, value_name = "PATH")]
    pub target_file: Option<PathBuf>,

    /// Maximum number of keys per translation request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Give up on outstanding requests after this many seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Retries for rate-limited or failed requests
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Model name sent to the provider
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Provider endpoint
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Provider API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Report missing keys without translating or writing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Arguments {
    /// Whether any of the single-pair flags was given.
    pub fn has_pair_args(&self) -> bool {
        self.source_lang.is_some()
            || self.target_lang.is_some()
            || self.source_file.is_some()
            || self.target_file.is_some()
    }

    /// Names of the pair flags that were not given.
    pub fn missing_pair_args(&self) -> Vec<&'static str> {
        [
            ("--source-lang", self.source_lang.is_none()),
            ("--target-lang", self.target_lang.is_none()),
            ("--source-file", self.source_file.is_none()),
            ("--target-file", self.target_file.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}
