//! Command registry for bootcli.
//!
//! The registry merges command specs from every [`Contributor`] into one
//! name table and one alias table.
//!
//! # Precedence
//!
//! Contributors are merged in the order given (core first). A name or alias
//! that is already taken is a collision: the earlier command is kept, the later
//! one is dropped whole and a `REGISTRY_COLLISION` warning names both
//! contributors. A contributor flagged with [`Contributor::overrides`] instead
//! replaces every command it collides with, recorded as a `REGISTRY_OVERRIDE`
//! notice. Both tables are `BTreeMap`s, so the same contributors in the same
//! order always produce the same tables and diagnostics.

mod contributor;
mod descriptor;

#[cfg(test)]
mod tests;

pub use contributor::{Contributor, StaticContributor};
pub use descriptor::{CallbackRef, CommandDescriptor, CommandSpec, Example};

use crate::diagnostics::{Diagnostic, codes};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tracing::debug;

/// Valid command names and aliases. Dotted and namespaced names are one token.
static COMMAND_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]*$").expect("command name regex is valid")
});

/// Merged lookup table of commands.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandDescriptor>,
    /// Alias to canonical name.
    aliases: BTreeMap<String, String>,
}

/// Outcome of [`CommandRegistry::build`].
#[derive(Debug, Clone)]
pub struct RegistryBuild {
    pub registry: CommandRegistry,
    /// Collisions, overrides and rejected specs, in merge order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CommandRegistry {
    /// Merge the contributors' commands in order.
    pub fn build<'a, I>(contributors: I) -> RegistryBuild
    where
        I: IntoIterator<Item = &'a dyn Contributor>,
    {
        let mut registry = CommandRegistry::default();
        let mut diagnostics = Vec::new();

        for contributor in contributors {
            let source = contributor.name();
            let overrides = contributor.overrides();
            for spec in contributor.config() {
                registry.insert_spec(spec, source, overrides, &mut diagnostics);
            }
        }

        debug!(
            commands = registry.commands.len(),
            aliases = registry.aliases.len(),
            "command registry built"
        );
        RegistryBuild {
            registry,
            diagnostics,
        }
    }

    /// Find a command by alias or canonical name.
    ///
    /// Absence is an ordinary outcome, e.g. a typo.
    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.commands.get(canonical)
    }

    /// Canonical name an alias points to.
    #[cfg(test)]
    pub fn canonical_name(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// All commands, sorted by name.
    pub fn commands(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.values()
    }

    /// Alias table, sorted by alias.
    #[cfg(test)]
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases
            .iter()
            .map(|(alias, name)| (alias.as_str(), name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn insert_spec(
        &mut self,
        spec: CommandSpec,
        source: &str,
        overrides: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if !COMMAND_NAME_RE.is_match(&spec.name) {
            diagnostics.push(Diagnostic::warning(
                codes::INVALID_COMMAND,
                format!(
                    "contributor '{}' declared a command with invalid name '{}'; it was ignored",
                    source, spec.name
                ),
            ));
            return;
        }
        let descriptor = CommandDescriptor::from_spec(spec, source);
        if let Some(alias) = descriptor
            .aliases
            .iter()
            .find(|alias| !COMMAND_NAME_RE.is_match(alias))
        {
            diagnostics.push(Diagnostic::warning(
                codes::INVALID_COMMAND,
                format!(
                    "command '{}' from '{}' declares invalid alias '{}'; the command was ignored",
                    descriptor.name, source, alias
                ),
            ));
            return;
        }

        let owners = self.owners_of(&descriptor);
        if owners.is_empty() {
            self.insert_descriptor(descriptor);
            return;
        }

        if overrides {
            for owner in &owners {
                if let Some(replaced) = self.remove_descriptor(owner) {
                    diagnostics.push(Diagnostic::notice(
                        codes::REGISTRY_OVERRIDE,
                        format!(
                            "command '{}' from '{}' overrides '{}' from '{}'",
                            descriptor.name, source, replaced.name, replaced.source
                        ),
                    ));
                }
            }
            debug!(command = %descriptor.name, %source, "override applied");
            self.insert_descriptor(descriptor);
            return;
        }

        for owner in &owners {
            let existing_source = self
                .commands
                .get(owner)
                .map(|existing| existing.source.as_str())
                .unwrap_or("unknown");
            diagnostics.push(Diagnostic::warning(
                codes::REGISTRY_COLLISION,
                format!(
                    "command '{}' from '{}' collides with '{}' from '{}'; keeping the first registration",
                    descriptor.name, source, owner, existing_source
                ),
            ));
        }
    }

    /// Canonical names of already registered commands that own any of the
    /// descriptor's name or aliases.
    fn owners_of(&self, descriptor: &CommandDescriptor) -> BTreeSet<String> {
        descriptor
            .keys()
            .filter_map(|key| {
                if self.commands.contains_key(key) {
                    Some(key.to_string())
                } else {
                    self.aliases.get(key).cloned()
                }
            })
            .collect()
    }

    fn insert_descriptor(&mut self, descriptor: CommandDescriptor) {
        for alias in &descriptor.aliases {
            self.aliases.insert(alias.clone(), descriptor.name.clone());
        }
        self.commands.insert(descriptor.name.clone(), descriptor);
    }

    fn remove_descriptor(&mut self, name: &str) -> Option<CommandDescriptor> {
        let removed = self.commands.remove(name)?;
        self.aliases.retain(|_, canonical| canonical != name);
        Some(removed)
    }
}
