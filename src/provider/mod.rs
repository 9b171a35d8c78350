//! Translation providers.
//!
//! A [`Translator`] turns one [`TranslationBatch`] into a map from item
//! identifier to translated text. The orchestrator only talks to this trait,
//! so tests can swap in a stub and other providers can be added beside
//! [`deepseek`].

pub mod deepseek;
pub mod placeholders;
mod retry;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::batch::TranslationBatch;
use crate::error::ProviderError;

pub use deepseek::DeepSeekClient;
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy};

/// Identifier -> translated text.
pub type TranslationMap = HashMap<String, String>;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, batch: &TranslationBatch) -> Result<TranslationMap, ProviderError>;
}

/// Identifiers of `batch` that `map` has no translation for, in batch order.
pub fn uncovered_ids(batch: &TranslationBatch, map: &TranslationMap) -> Vec<String> {
    batch
        .ids()
        .filter(|id| !map.contains_key(*id))
        .map(str::to_string)
        .collect()
}
