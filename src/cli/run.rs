//! Turn parsed arguments into settings and language groups, then run.

use std::{env, path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::info;

use super::args::Arguments;
use crate::config::{self, LanguageGroup, LocaleFile, find_config_file};
use crate::error::ConfigError;
use crate::orchestrator::{Orchestrator, RunOptions, RunReport};
use crate::provider::deepseek::API_KEY_ENV;
use crate::settings::{ProviderSettings, Settings, timeout_from_secs};

pub fn run(args: &Arguments) -> Result<RunReport> {
    let settings = settings_from_args(args)?;
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let groups = resolve_groups(args, &cwd)?;

    let translator = Arc::new(settings.provider.client()?);
    let orchestrator = Orchestrator::new(translator, settings.run)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
        .map(|runtime| runtime.block_on(orchestrator.run(&groups)))
}

pub fn settings_from_args(args: &Arguments) -> Result<Settings, ConfigError> {
    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey(API_KEY_ENV))?;

    let provider = ProviderSettings {
        base_url: args.base_url.clone(),
        model: args.model.clone(),
        max_retries: args.max_retries,
        ..ProviderSettings::new(api_key)
    };
    let run = RunOptions {
        batch_size: args.batch_size,
        concurrency: args.concurrency,
        timeout: timeout_from_secs(args.timeout),
        dry_run: args.dry_run,
    };
    Settings::new(provider, run)
}

/// `--config` wins, then the pair flags, then config discovery from `cwd`.
pub fn resolve_groups(args: &Arguments, cwd: &Path) -> Result<Vec<LanguageGroup>, ConfigError> {
    if let Some(path) = &args.config {
        info!("Using config file: {}", path.display());
        return config::load_groups(&cwd.join(path));
    }

    if args.has_pair_args() {
        if let (Some(source_lang), Some(target_lang), Some(source_file), Some(target_file)) = (
            &args.source_lang,
            &args.target_lang,
            &args.source_file,
            &args.target_file,
        ) {
            return Ok(vec![LanguageGroup {
                source: LocaleFile::new(source_lang, cwd.join(source_file)),
                targets: vec![LocaleFile::new(target_lang, cwd.join(target_file))],
            }]);
        }
        return Err(ConfigError::MissingArgs(args.missing_pair_args()));
    }

    let path = find_config_file(cwd).ok_or(ConfigError::NoConfig)?;
    info!("Using config file: {}", path.display());
    config::load_groups(&path)
}
