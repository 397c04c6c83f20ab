//! CLI argument parsing for bootcli.
//!
//! Uses clap derive macros for the global options only. Everything from the
//! command name onwards is passed through untouched to the resolver, so
//! commands contributed at runtime need no clap definitions.

use crate::context::{ContextStore, keys};
use clap::Parser;
use std::path::PathBuf;

/// Bootcli: phase-aware command dispatcher for site maintenance.
///
/// Commands declare how far the site must be bootstrapped (base, root,
/// configuration, full); bootcli gets it there, then runs the command.
/// Run `bootcli help` for the list of commands.
#[derive(Parser, Debug)]
#[command(name = "bootcli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log bootstrap, resolution and dispatch details to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// Use PATH as the site root instead of searching upward for bootcli.yaml.
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Print diagnostics as NDJSON records.
    #[arg(long)]
    pub json: bool,

    /// Only print error diagnostics.
    #[arg(short, long)]
    pub quiet: bool,

    /// Command name followed by its arguments and options.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Record the global options under `options.*`.
    pub fn record_options(&self, context: &mut ContextStore) {
        context.set(keys::OPTION_DEBUG, self.debug);
        context.set(keys::OPTION_QUIET, self.quiet);
        context.set(keys::OPTION_JSON, self.json);
        if let Some(root) = &self.root {
            context.set(keys::OPTION_ROOT, root.to_string_lossy().into_owned());
        }
    }
}
