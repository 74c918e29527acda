//! Level, config and script files. JSON or YAML, chosen by extension.

use std::path::Path;

use anyhow::{Context, bail};
use chrono_kernel::{LevelDef, SessionConfig};
use serde::de::DeserializeOwned;

use crate::script::Script;

/// Parse a JSON (`.json`) or YAML (`.yaml`, `.yml`) document.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display())),
        Some("yaml" | "yml") => serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display())),
        _ => bail!(
            "unsupported file extension for {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    }
}

pub fn load_level(path: &Path) -> anyhow::Result<LevelDef> {
    read_document(path).context("loading level")
}

/// Config file, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => read_document(path).context("loading config"),
        None => Ok(SessionConfig::default()),
    }
}

pub fn load_script(path: Option<&Path>) -> anyhow::Result<Script> {
    match path {
        Some(path) => read_document(path).context("loading input script"),
        None => Ok(Script::default()),
    }
}
