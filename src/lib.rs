//! Locsync - fill missing keys in i18next JSON locale files
//!
//! Locsync compares a source locale file against each of its target locale
//! files, sends only the missing strings to an AI translation provider, and
//! merges the results back without touching existing translations.
//!
//! ## Module Structure
//!
//! - `tree`: Locale tree model, key paths, and JSON file storage
//! - `diff`: Missing-key detection between a source and a target tree
//! - `batch`: Grouping missing strings into provider requests
//! - `provider`: Translation provider trait and the DeepSeek client
//! - `merge`: Writing translated leaves into a target tree
//! - `orchestrator`: Running every (group, target language) unit
//! - `config`: Language group configuration file loading
//! - `settings`: Immutable run and provider settings
//! - `cli`: Command-line interface layer
//! - `logging`: Log subscriber setup

pub mod batch;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod logging;
pub mod merge;
pub mod orchestrator;
pub mod provider;
pub mod settings;
pub mod tree;
