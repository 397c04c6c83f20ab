//! Implementation of the `bootcli version` command.

use crate::context::{ContextStore, keys};
use crate::dispatch::{CommandOutput, Invocation};

/// Execute the `bootcli version` command.
///
/// Prints the full version, or one component with `--major` / `--minor`.
/// `--major` wins when both are given.
pub fn cmd_version(
    invocation: &Invocation<'_>,
    context: &mut ContextStore,
) -> anyhow::Result<CommandOutput> {
    let version = context
        .get_str(keys::CLI_VERSION)
        .unwrap_or(env!("CARGO_PKG_VERSION"));

    let output = if invocation.flag("major") {
        component(version, 0)
    } else if invocation.flag("minor") {
        component(version, 1)
    } else {
        version
    };

    Ok(CommandOutput::from(output))
}

/// Dot-separated component `index` of `version`, `"0"` when absent.
fn component(version: &str, index: usize) -> &str {
    version
        .split(['.', '-', '+'])
        .nth(index)
        .filter(|part| !part.is_empty())
        .unwrap_or("0")
}
