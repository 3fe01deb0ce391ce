use std::path::PathBuf;

use crate::output::OutputFormat;

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub output: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
    pub insecure: bool,
    pub gate_endpoint: Option<String>,
    pub config: Option<PathBuf>,
    /// Raw `K1=V1,K2=V2` list, validated during bootstrap.
    pub default_headers: Option<String>,
}
