//! Runs every (group, target language) unit.
//!
//! Per unit: load source, load or init target, diff, batch, translate, merge,
//! write. A unit with nothing missing finishes without touching its file. A
//! unit that fails leaves its file untouched and does not affect other units.
//!
//! Units and the batches inside a unit run concurrently; a shared semaphore
//! caps the provider requests in flight across the whole run. Each unit merges
//! its own results into its own tree, so there is exactly one writer per
//! target tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt, stream};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::batch::{self, DEFAULT_BATCH_SIZE, TranslationBatch};
use crate::config::{LanguageGroup, LocaleFile};
use crate::diff::{self, Leaf, MissingLeaf};
use crate::error::{ConfigError, UnitError};
use crate::merge::{self, MergeStats};
use crate::provider::{TranslationMap, Translator, placeholders, uncovered_ids};
use crate::tree::{KeyPath, Node, Tree, store};

pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub batch_size: usize,
    /// Maximum provider requests in flight, and units processed at once.
    pub concurrency: usize,
    /// Deadline for the whole run; outstanding requests are dropped when it passes.
    pub timeout: Option<Duration>,
    /// Only diff and report, never call the provider or write.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
            dry_run: false,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum UnitOutcome {
    /// Missing keys were filled and the file was written.
    Translated { translated: usize, copied: usize },
    /// Nothing was missing; the file was not touched.
    UpToDate,
    /// Dry run: what would have been filled.
    Pending { translate: usize, copy: usize },
    Failed(UnitError),
}

#[derive(Debug)]
pub struct UnitReport {
    /// 1-based position of the group in the configuration.
    pub group: usize,
    pub source_lang: String,
    pub target_lang: String,
    pub target_path: PathBuf,
    /// Identifiers found missing, in diff order.
    pub missing_keys: Vec<String>,
    pub outcome: UnitOutcome,
}

impl UnitReport {
    pub fn is_done(&self) -> bool {
        !matches!(self.outcome, UnitOutcome::Failed(_))
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub fn all_done(&self) -> bool {
        self.units.iter().all(UnitReport::is_done)
    }

    pub fn failed_count(&self) -> usize {
        self.units.iter().filter(|u| !u.is_done()).count()
    }

    /// Total keys written across all units (translated + copied).
    pub fn written_count(&self) -> usize {
        self.units
            .iter()
            .map(|u| match u.outcome {
                UnitOutcome::Translated { translated, copied } => translated + copied,
                _ => 0,
            })
            .sum()
    }
}

/// A source tree loaded once per group, shared by its target units.
type SharedSource = Result<Arc<Tree>, Arc<anyhow::Error>>;

struct Unit<'a> {
    group: usize,
    source_lang: &'a str,
    source_path: &'a Path,
    source: SharedSource,
    target: &'a LocaleFile,
}

pub struct Orchestrator {
    translator: Arc<dyn Translator>,
    options: RunOptions,
    permits: Semaphore,
}

impl Orchestrator {
    pub fn new(translator: Arc<dyn Translator>, options: RunOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self {
            translator,
            permits: Semaphore::new(options.concurrency),
            options,
        })
    }

    pub async fn run(&self, groups: &[LanguageGroup]) -> RunReport {
        let deadline = self.options.timeout.map(|t| Instant::now() + t);

        let mut units = Vec::new();
        for (i, group) in groups.iter().enumerate() {
            info!(
                "Processing group #{} with source: {} ({})",
                i + 1,
                group.source.lang,
                group.source.path.display()
            );
            let source = load_source(&group.source);
            for target in &group.targets {
                units.push(Unit {
                    group: i + 1,
                    source_lang: &group.source.lang,
                    source_path: &group.source.path,
                    source: source.clone(),
                    target,
                });
            }
        }

        let units: Vec<UnitReport> = stream::iter(units)
            .map(|unit| self.run_unit(unit, deadline))
            .buffered(self.options.concurrency)
            .collect()
            .await;

        RunReport { units }
    }

    async fn run_unit(&self, unit: Unit<'_>, deadline: Option<Instant>) -> UnitReport {
        let Unit {
            group,
            source_lang,
            source_path,
            source,
            target,
        } = unit;
        info!("Translating {} -> {}", source_lang, target.lang);

        let mut missing_keys = Vec::new();
        let outcome = match source {
            Ok(source) => {
                match self
                    .process(&source, source_lang, target, deadline, &mut missing_keys)
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(err) => UnitOutcome::Failed(err),
                }
            }
            Err(err) => UnitOutcome::Failed(UnitError::file_access(source_path, &err)),
        };

        if let UnitOutcome::Failed(err) = &outcome {
            error!(
                "Group #{} {} -> {} failed: {}",
                group, source_lang, target.lang, err
            );
        }

        UnitReport {
            group,
            source_lang: source_lang.to_string(),
            target_lang: target.lang.clone(),
            target_path: target.path.clone(),
            missing_keys,
            outcome,
        }
    }

    async fn process(
        &self,
        source: &Tree,
        source_lang: &str,
        target: &LocaleFile,
        deadline: Option<Instant>,
        missing_keys: &mut Vec<String>,
    ) -> Result<UnitOutcome, UnitError> {
        let (mut tree, existed) = store::read_tree_or_empty(&target.path)
            .map_err(|e| UnitError::file_access(&target.path, &e))?;
        if existed {
            info!("Loaded target file: {}", target.path.display());
        } else {
            warn!(
                "Target file not found, creating new: {}",
                target.path.display()
            );
        }

        let missing = diff::diff(source, &tree);
        if missing.is_empty() {
            info!("No new keys to translate. Target file is up to date.");
            return Ok(UnitOutcome::UpToDate);
        }

        let text_count = diff::text_count(&missing);
        info!(
            "Found {} new keys ({} to translate)",
            missing.len(),
            text_count
        );
        for leaf in &missing {
            debug!("Missing key: {}", leaf.path);
        }
        missing_keys.extend(missing.iter().map(|m| m.path.to_identifier()));

        if self.options.dry_run {
            return Ok(UnitOutcome::Pending {
                translate: text_count,
                copy: missing.len() - text_count,
            });
        }

        let batches = batch::batch(
            &missing,
            self.options.batch_size,
            source_lang,
            &target.lang,
        )?;
        let translations = self.translate_all(&batches, deadline).await?;

        let stats = merge_missing(&mut tree, missing, &batches, translations);
        let (translated, copied) = (stats.texts, stats.written() - stats.texts);
        store::write_tree(&target.path, &tree)
            .map_err(|e| UnitError::file_access(&target.path, &e))?;
        info!(
            "Translated and added {} keys in {}",
            translated + copied,
            target.path.display()
        );

        Ok(UnitOutcome::Translated { translated, copied })
    }

    /// Translate every batch; any failure or incomplete batch fails the whole set.
    async fn translate_all(
        &self,
        batches: &[TranslationBatch],
        deadline: Option<Instant>,
    ) -> Result<TranslationMap, UnitError> {
        let requests = stream::iter(batches)
            .map(|batch| self.translate_batch(batch))
            .buffer_unordered(self.options.concurrency)
            .try_collect::<Vec<_>>();

        let results = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, requests)
                .await
                .map_err(|_| {
                    UnitError::Timeout(self.options.timeout.map_or(0, |t| t.as_secs()))
                })??,
            None => requests.await?,
        };

        Ok(results.into_iter().flatten().collect())
    }

    async fn translate_batch(&self, batch: &TranslationBatch) -> Result<TranslationMap, UnitError> {
        // The semaphore is never closed.
        let _permit = self.permits.acquire().await.ok();

        let mut map = self
            .translator
            .translate(batch)
            .await
            .map_err(|source| UnitError::Provider {
                batch: batch.index,
                source,
            })?;

        let missing = uncovered_ids(batch, &map);
        if !missing.is_empty() {
            return Err(UnitError::PartialResponse {
                batch: batch.index,
                missing,
            });
        }

        let expected: HashMap<&str, &str> = batch
            .items
            .iter()
            .map(|item| (item.id.as_str(), item.text.as_str()))
            .collect();
        map.retain(|id, translated| match expected.get(id.as_str()) {
            Some(source_text) => {
                let tokens = placeholders::mismatched(source_text, translated);
                if !tokens.is_empty() {
                    warn!(
                        "Translation of '{}' changed placeholders: {}",
                        id,
                        tokens.join(", ")
                    );
                }
                true
            }
            None => {
                warn!("Ignoring unexpected key in response: {}", id);
                false
            }
        });

        debug!("Batch {} translated ({} keys)", batch.index, map.len());
        Ok(map)
    }
}

fn load_source(source: &LocaleFile) -> SharedSource {
    match store::read_tree(&source.path) {
        Ok(tree) => {
            info!("Loaded source file: {}", source.path.display());
            Ok(Arc::new(tree))
        }
        Err(err) => {
            error!("Error loading source file: {:#}", err);
            Err(Arc::new(err))
        }
    }
}

/// Merge translated and verbatim leaves in diff order.
///
/// Response identifiers are resolved back to key paths through the batch
/// items that carried them.
fn merge_missing(
    tree: &mut Tree,
    missing: Vec<MissingLeaf>,
    batches: &[TranslationBatch],
    mut translations: TranslationMap,
) -> MergeStats {
    let mut by_path: HashMap<&KeyPath, String> = batches
        .iter()
        .flat_map(|batch| &batch.items)
        .filter_map(|item| translations.remove(&item.id).map(|text| (&item.path, text)))
        .collect();

    let leaves = missing.into_iter().filter_map(|MissingLeaf { path, leaf }| {
        let node = match leaf {
            Leaf::Text(_) => Node::Text(by_path.remove(&path)?),
            Leaf::Verbatim(value) => Node::from_json(value),
        };
        Some((path, node))
    });

    let stats = merge::merge(tree, leaves);
    if stats.skipped > 0 {
        debug!("Skipped {} already filled keys", stats.skipped);
    }
    stats
}
