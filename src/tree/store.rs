//! Reading and writing locale files.
//!
//! Output is pretty-printed with 2-space indentation, non-ASCII text left
//! unescaped, and a trailing newline.

use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tempfile::NamedTempFile;

use super::{Tree, tree_from_json, tree_to_json};

/// Read a locale file that must exist.
pub fn read_tree(path: &Path) -> Result<Tree> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_tree(&content, path)
}

/// Read a locale file, or start from an empty tree when it does not exist yet.
///
/// Returns the tree and whether the file existed. An empty (whitespace-only)
/// file is treated as `{}`.
pub fn read_tree_or_empty(path: &Path) -> Result<(Tree, bool)> {
    if !path.exists() {
        return Ok((Tree::new(), false));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok((Tree::new(), true));
    }
    Ok((parse_tree(&content, path)?, true))
}

fn parse_tree(content: &str, path: &Path) -> Result<Tree> {
    let value: Value = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match tree_from_json(value) {
        Some(tree) => Ok(tree),
        None => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}

pub fn render_tree(tree: &Tree) -> Result<String> {
    let content =
        serde_json::to_string_pretty(&tree_to_json(tree)).context("Failed to serialize JSON")?;
    Ok(format!("{}\n", content))
}

/// Write a tree, creating parent directories as needed.
///
/// The content goes to a temporary file in the same directory, which is then
/// renamed over the target, so an interrupted write never leaves a truncated
/// file behind. An existing file keeps its permissions.
pub fn write_tree(path: &Path, tree: &Tree) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let content = render_tree(tree)?;
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {}", dir.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    if let Some(permissions) = target_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .with_context(|| format!("Failed to set permissions: {}", path.display()))?;
    }

    file.persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;
    Ok(())
}

/// Permissions for the replacement file: the existing file's, or the usual
/// `0644` for a new one (temporary files start out as `0600`).
fn target_permissions(path: &Path) -> Option<Permissions> {
    match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => default_permissions(),
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
