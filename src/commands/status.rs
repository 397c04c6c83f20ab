//! Implementation of the `bootcli status` command.
//!
//! Reports how far bootstrap got for this run and which site is active.

use crate::context::{ContextStore, keys};
use crate::dispatch::{CommandOutput, Invocation};
use serde_json::Value;

/// Execute the `bootcli status` command.
///
/// Displays:
/// - Bootstrap phase reached
/// - Site root and name (when located)
/// - Host, user and working directory
/// - Recorded bootstrap failures
pub fn cmd_status(
    _invocation: &Invocation<'_>,
    context: &mut ContextStore,
) -> anyhow::Result<CommandOutput> {
    let unknown = "(unknown)";
    let mut lines = vec![
        "bootcli status".to_string(),
        "==============".to_string(),
        format!(
            "Version:    {}",
            context.get_str(keys::CLI_VERSION).unwrap_or(unknown)
        ),
        format!(
            "Phase:      {}",
            context.get_str(keys::BOOTSTRAP_PHASE).unwrap_or("none")
        ),
        format!(
            "Site root:  {}",
            context.get_str(keys::SITE_ROOT).unwrap_or("(not located)")
        ),
        format!(
            "Site name:  {}",
            context.get_str(keys::SITE_NAME).unwrap_or("(not configured)")
        ),
        format!(
            "Host:       {}",
            context.get_str(keys::CLI_HOST).unwrap_or(unknown)
        ),
        format!(
            "User:       {}",
            context.get_str(keys::CLI_USER).unwrap_or(unknown)
        ),
        format!(
            "Directory:  {}",
            context.get_str(keys::CLI_CWD).unwrap_or(unknown)
        ),
    ];

    let errors = context
        .get(keys::BOOTSTRAP_ERRORS)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if !errors.is_empty() {
        lines.push(String::new());
        lines.push("Bootstrap failures:".to_string());
        for error in &errors {
            lines.push(format!(
                "  - [{}] {}: {}",
                error.get("phase").and_then(Value::as_str).unwrap_or("?"),
                error.get("code").and_then(Value::as_str).unwrap_or("?"),
                error.get("message").and_then(Value::as_str).unwrap_or("")
            ));
        }
    }

    Ok(CommandOutput::Text(lines.join("\n")))
}
