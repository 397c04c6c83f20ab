//! Implementation of the `bootcli help` command.

use crate::context::ContextStore;
use crate::dispatch::{CommandOutput, Invocation};
use crate::error::BootcliError;
use crate::registry::{CommandDescriptor, CommandRegistry};

/// Execute the `bootcli help` command.
///
/// Without an argument, lists every command one per line. With a command
/// name (or alias), prints that command's details.
pub fn cmd_help(
    invocation: &Invocation<'_>,
    _context: &mut ContextStore,
) -> anyhow::Result<CommandOutput> {
    let registry = invocation.registry;

    let Some(name) = invocation.argument(0) else {
        return Ok(CommandOutput::Text(command_list(registry)));
    };

    let descriptor = registry.lookup(name).ok_or_else(|| {
        BootcliError::UserError(format!(
            "no help for '{}': command not found.\n\n\
             Use `bootcli help` to see all commands.",
            name
        ))
    })?;

    Ok(CommandOutput::Text(command_details(descriptor)))
}

/// One line per command: name, aliases, description.
fn command_list(registry: &CommandRegistry) -> String {
    let labels: Vec<(String, &str)> = registry
        .commands()
        .map(|command| {
            let label = if command.aliases.is_empty() {
                command.name.clone()
            } else {
                format!("{} ({})", command.name, command.aliases.join(", "))
            };
            (label, command.description.as_str())
        })
        .collect();
    let width = labels.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let mut lines = vec!["Available commands:".to_string()];
    for (label, description) in &labels {
        lines.push(
            format!("  {:width$}  {}", label, description, width = width)
                .trim_end()
                .to_string(),
        );
    }
    lines.join("\n")
}

fn command_details(command: &CommandDescriptor) -> String {
    let mut lines = vec![command.name.clone()];
    if !command.description.is_empty() {
        lines.push(command.description.clone());
    }

    if !command.declared_arguments.is_empty() {
        lines.push(String::new());
        lines.push("Arguments:".to_string());
        for argument in &command.declared_arguments {
            lines.push(format!("  {}", argument));
        }
    }

    if !command.declared_options.is_empty() {
        lines.push(String::new());
        lines.push("Options:".to_string());
        let width = command
            .declared_options
            .keys()
            .map(|name| name.len() + 2)
            .max()
            .unwrap_or(0);
        for (name, description) in &command.declared_options {
            lines.push(format!(
                "  {:width$}  {}",
                format!("--{}", name),
                description,
                width = width
            ));
        }
    }

    if !command.aliases.is_empty() {
        lines.push(String::new());
        lines.push(format!("Aliases: {}", command.aliases.join(", ")));
    }

    if !command.examples.is_empty() {
        lines.push(String::new());
        lines.push("Examples:".to_string());
        for example in &command.examples {
            lines.push(format!("  {}", example.usage));
            lines.push(format!("      {}", example.explanation));
        }
    }

    lines.push(String::new());
    lines.push(format!("Bootstrap phase: {}", command.required_phase));
    lines.push(format!("Provided by: {}", command.source));
    lines.join("\n")
}
