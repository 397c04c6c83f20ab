//! Callbacks that run an external program.
//!
//! The command template is split with shell-words (no shell is involved),
//! then `{root}`, `{cwd}` and `{command}` are substituted inside each word,
//! so a value never spans or splits words. Positional arguments are appended
//! and options forwarded as `--name` / `--name=value`. The program runs in
//! the site root with `site.env` exported.

use super::callback::{CommandCallback, CommandOutput, Invocation};
use super::template;
use crate::context::{ContextStore, keys};
use crate::error::BootcliError;
use crate::resolver::OptionValue;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Maximum trailing lines of stderr kept in a failure message.
const MAX_ERROR_LINES: usize = 20;

/// Callback for `CallbackRef::Exec`.
#[derive(Debug, Clone)]
pub struct ExecCallback {
    template: String,
}

impl ExecCallback {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Program and arguments for this invocation.
    pub fn command_line(
        &self,
        invocation: &Invocation<'_>,
        context: &ContextStore,
    ) -> Result<Vec<String>, BootcliError> {
        let cwd = context.get_str(keys::CLI_CWD).unwrap_or(".").to_string();
        let root = context
            .get_str(keys::SITE_ROOT)
            .map(str::to_string)
            .unwrap_or_else(|| cwd.clone());

        let variables = BTreeMap::from([
            ("root", root),
            ("cwd", cwd),
            ("command", invocation.command.name.clone()),
        ]);
        let words = shell_words::split(&self.template).map_err(|e| {
            BootcliError::ExecError(format!(
                "failed to parse command '{}': {}\nFix: check for unmatched quotes or invalid escape sequences.",
                self.template, e
            ))
        })?;
        let mut args = words
            .iter()
            .map(|word| template::render(word, &variables))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                BootcliError::ExecError(format!(
                    "invalid command template '{}': {}",
                    self.template, e
                ))
            })?;
        if args.is_empty() {
            return Err(BootcliError::ExecError(format!(
                "command is empty after parsing: '{}'",
                self.template
            )));
        }

        args.extend(invocation.arguments.iter().cloned());
        args.extend(invocation.options.iter().map(|(name, value)| match value {
            OptionValue::Flag => format!("--{}", name),
            OptionValue::Value(value) => format!("--{}={}", name, value),
        }));
        Ok(args)
    }
}

impl CommandCallback for ExecCallback {
    fn call(
        &self,
        invocation: &Invocation<'_>,
        context: &mut ContextStore,
    ) -> anyhow::Result<CommandOutput> {
        let args = self.command_line(invocation, context)?;
        let working_dir = context
            .get_str(keys::SITE_ROOT)
            .or_else(|| context.get_str(keys::CLI_CWD))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let env: BTreeMap<String, String> = context.get_as_or(keys::SITE_ENV, BTreeMap::new());

        debug!(program = %args[0], dir = %working_dir.display(), "running exec callback");
        let output = Command::new(&args[0])
            .args(&args[1..])
            .current_dir(&working_dir)
            .envs(&env)
            .output()
            .map_err(|e| {
                BootcliError::ExecError(format!(
                    "failed to execute '{}': {}\nFix: ensure the command is installed and in PATH.",
                    args[0], e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BootcliError::ExecError(format!(
                "'{}' exited with code {}{}",
                args.join(" "),
                output.status.code().unwrap_or(-1),
                tail_lines(&stderr, MAX_ERROR_LINES)
            ))
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim_end();
        if stdout.is_empty() {
            Ok(CommandOutput::Empty)
        } else {
            Ok(CommandOutput::Text(stdout.to_string()))
        }
    }
}

/// Last `max_lines` of `text`, prefixed with a newline, or empty.
fn tail_lines(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    if lines.is_empty() {
        return String::new();
    }
    let start = lines.len().saturating_sub(max_lines);
    format!("\n{}", lines[start..].join("\n"))
}
