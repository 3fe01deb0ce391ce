use std::io::{IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, bail};
use serde_json::Value;

const NO_INPUT: &str = "No input provided; use --file or pipe a document on stdin";

/// Read a JSON or YAML document from `file`, or from stdin when it is piped.
///
/// Returns `None` when there is nothing to read.
pub fn read_document(file: Option<&Path>) -> anyhow::Result<Option<Value>> {
    let (raw, source) = match file {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        None => {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                return Ok(None);
            }
            let mut raw = String::new();
            stdin
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            (raw, String::from("stdin"))
        }
    };
    parse_document(&raw, &source)
}

/// Like [`read_document`], but a document is required.
pub fn require_document(file: Option<&Path>) -> anyhow::Result<Value> {
    read_document(file)?.context(NO_INPUT)
}

/// Parse JSON, falling back to YAML. The document must be an object.
pub fn parse_document(raw: &str, source: &str) -> anyhow::Result<Option<Value>> {
    let Some(value) = parse_value(raw, source)? else {
        return Ok(None);
    };
    if !value.is_object() {
        bail!("{source} must contain a JSON or YAML object");
    }
    Ok(Some(value))
}

fn parse_value(raw: &str, source: &str) -> anyhow::Result<Option<Value>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(raw) {
        Ok(value) => Ok(Some(value)),
        Err(_) => serde_yaml::from_str(raw)
            .map(Some)
            .with_context(|| format!("{source} is neither valid JSON nor YAML")),
    }
}

/// Read a non-empty JSON or YAML file named by a flag. Any shape is accepted.
pub fn read_file_value(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_value(&raw, &path.display().to_string())?
        .with_context(|| format!("{} is empty", path.display()))
}
