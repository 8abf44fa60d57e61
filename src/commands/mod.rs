pub mod find;
pub mod navigate;
pub mod replace;
pub mod show_config;

use std::{fs, path::Path};

use anyhow::Context;
use jsonpad_search::Match;

/// Reads the document at `path` as UTF-8 text.
pub fn read_document(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn write_document(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

/// `line:column: text`, 1-based for display.
pub fn format_match(m: &Match) -> String {
    format!("{}:{}: {}", m.line + 1, m.column + 1, m.text.escape_debug())
}
