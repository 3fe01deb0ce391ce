use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::GlobalFlags;
pub use root_commands::Commands;

use crate::output::OutputFormat;

/// Top-level CLI parser for the `spin` binary.
#[derive(Debug, Parser)]
#[command(name = "spin", version, about = "Command-line client for Spinnaker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gate API endpoint (overrides the config file)
    #[arg(long, global = true)]
    pub gate_endpoint: Option<String>,

    /// Path to the config file (default: ~/.spin/config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Quiet mode (suppress informational messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Output format: json, yaml, or jsonpath=<template>
    #[arg(
        short,
        long,
        global = true,
        default_value = "json",
        value_parser = OutputFormat::parse
    )]
    pub output: OutputFormat,

    /// Extra request headers, e.g. "X-Team=delivery,X-Env=prod"
    #[arg(long, global = true)]
    pub default_headers: Option<String>,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            output: self.output.clone(),
            quiet: self.quiet,
            verbose: self.verbose,
            no_color: self.no_color,
            insecure: self.insecure,
            gate_endpoint: self.gate_endpoint.clone(),
            config: self.config.clone(),
            default_headers: self.default_headers.clone(),
        }
    }
}
