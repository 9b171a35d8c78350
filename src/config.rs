//! Language group configuration.
//!
//! An `i18n.yaml` file is a list of groups. Each group maps language codes to
//! locale files; the first entry is the source, the rest are targets:
//!
//! ```yaml
//! - en: locales/en/common.json
//!   fr: locales/fr/common.json
//!   zh: locales/zh/common.json
//! - en: locales/en/admin.json
//!   de: locales/de/admin.json
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_yaml::Value;

use crate::error::ConfigError;

pub const CONFIG_FILE_NAMES: &[&str] = &["i18n.yaml", "i18n.yml"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleFile {
    pub lang: String,
    pub path: PathBuf,
}

impl LocaleFile {
    pub fn new(lang: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            lang: lang.into(),
            path: path.into(),
        }
    }
}

/// One source locale file and the files translated from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageGroup {
    pub source: LocaleFile,
    pub targets: Vec<LocaleFile>,
}

/// Search `start_dir` and its parents for a config file.
///
/// Stops at the first directory containing `.git`.
pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for name in CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_groups(path: &Path) -> Result<Vec<LanguageGroup>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_groups(&content, path, base_dir)
}

/// Parse the YAML group list. `path` is only used in error messages.
pub fn parse_groups(
    content: &str,
    path: &Path,
    base_dir: &Path,
) -> Result<Vec<LanguageGroup>, ConfigError> {
    let document: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = match document {
        Value::Null => return Err(ConfigError::EmptyConfig(path.to_path_buf())),
        Value::Sequence(entries) => entries,
        _ => {
            return Err(ConfigError::InvalidGroup {
                path: path.to_path_buf(),
                index: 0,
                reason: "expected a list of groups".to_string(),
            });
        }
    };

    let mut groups = Vec::new();
    for (i, entry) in entries.into_iter().enumerate() {
        let invalid = |reason: String| ConfigError::InvalidGroup {
            path: path.to_path_buf(),
            index: i + 1,
            reason,
        };

        let mapping = match entry {
            Value::Null => continue,
            Value::Mapping(mapping) if mapping.is_empty() => continue,
            Value::Mapping(mapping) => mapping,
            _ => return Err(invalid("expected a mapping of language to file".to_string())),
        };

        let mut files = Vec::with_capacity(mapping.len());
        for (lang, file) in mapping {
            let (Value::String(lang), Value::String(file)) = (lang, file) else {
                return Err(invalid(
                    "language codes and file paths must be strings".to_string(),
                ));
            };
            files.push(LocaleFile::new(lang, base_dir.join(file)));
        }

        let mut files = files.into_iter();
        let Some(source) = files.next() else {
            continue;
        };
        let targets: Vec<LocaleFile> = files.filter(|t| t.lang != source.lang).collect();
        if targets.is_empty() {
            return Err(invalid(format!(
                "source language '{}' has no target languages",
                source.lang
            )));
        }
        groups.push(LanguageGroup { source, targets });
    }

    if groups.is_empty() {
        return Err(ConfigError::EmptyConfig(path.to_path_buf()));
    }
    Ok(groups)
}
