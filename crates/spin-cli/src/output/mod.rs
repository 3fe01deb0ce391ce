use anyhow::bail;
use serde_json::Value;

use crate::cli::GlobalFlags;
use crate::ui;

pub mod jsonpath;

/// How a command prints the document Gate returned.
#[derive(Clone, Debug)]
pub enum OutputFormat {
    Json,
    Yaml,
    JsonPath(jsonpath::Template),
}

impl OutputFormat {
    /// Parse `-o/--output`: `json` (or empty), `yaml`, or `jsonpath=<template>`.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw.trim() {
            "" | "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "jsonpath" => bail!("jsonpath output requires a template: jsonpath=<template>"),
            other => match other.strip_prefix("jsonpath=") {
                Some(expr) if expr.trim().is_empty() => {
                    bail!("jsonpath output requires a non-empty template")
                }
                Some(expr) => Ok(Self::JsonPath(jsonpath::Template::parse(expr)?)),
                None => bail!(
                    "Output format '{other}' is not supported; use json, yaml or jsonpath=<template>"
                ),
            },
        }
    }
}

/// Render a response document in the requested format.
pub fn render(value: &Value, format: &OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
        OutputFormat::JsonPath(template) => template.render(value),
    }
}

/// Print a response document. `--quiet` does not apply here.
pub fn output(value: &Value, flags: &GlobalFlags) -> anyhow::Result<()> {
    let rendered = render(value, &flags.output)?;
    println!("{rendered}");
    Ok(())
}

/// Print an informational line to stderr unless `--quiet`.
pub fn info(message: &str, flags: &GlobalFlags) {
    if flags.quiet {
        return;
    }
    if ui::prefs().color {
        eprintln!("\x1b[32m{message}\x1b[0m");
    } else {
        eprintln!("{message}");
    }
}
