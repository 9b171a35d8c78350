//! Splitting missing text leaves into translation requests.

use serde_json::{Map, Value};

use crate::diff::MissingLeaf;
use crate::error::ConfigError;
use crate::tree::KeyPath;

/// Default number of keys sent in one request.
pub const DEFAULT_BATCH_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Identifier form of `path`; doubles as the response correlation key.
    pub id: String,
    pub path: KeyPath,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslationBatch {
    /// Position of this batch within its unit, starting at 1.
    pub index: usize,
    pub source_lang: String,
    pub target_lang: String,
    pub items: Vec<BatchItem>,
}

impl TranslationBatch {
    /// The request payload: `{identifier: source text}` in item order.
    pub fn payload(&self) -> Value {
        let map: Map<String, Value> = self
            .items
            .iter()
            .map(|item| (item.id.clone(), Value::String(item.text.clone())))
            .collect();
        Value::Object(map)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Chunk the text leaves of `missing` into batches of at most `max_batch_size`.
///
/// Verbatim leaves are not translated and are skipped here. Order is kept;
/// an input without text leaves yields no batches.
pub fn batch(
    missing: &[MissingLeaf],
    max_batch_size: usize,
    source_lang: &str,
    target_lang: &str,
) -> Result<Vec<TranslationBatch>, ConfigError> {
    if max_batch_size == 0 {
        return Err(ConfigError::InvalidBatchSize);
    }

    let items: Vec<BatchItem> = missing
        .iter()
        .filter_map(|m| {
            m.text().map(|text| BatchItem {
                id: m.path.to_identifier(),
                path: m.path.clone(),
                text: text.to_string(),
            })
        })
        .collect();

    Ok(items
        .chunks(max_batch_size)
        .enumerate()
        .map(|(i, chunk)| TranslationBatch {
            index: i + 1,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            items: chunk.to_vec(),
        })
        .collect())
}
