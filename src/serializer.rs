//! Serialization of the document tree and output writing.

use crate::document::DocumentTree;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes the document tree to pretty-printed JSON.
///
/// Keys appear in first-insertion order, so the output is deterministic for
/// a given interaction sequence.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(tree: &DocumentTree) -> Result<String> {
    debug!("Serializing document tree to JSON");
    serde_json::to_string_pretty(tree).context("Failed to serialize document tree to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be created or written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
