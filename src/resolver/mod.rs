//! Command resolution for bootcli.
//!
//! Turns the normalized argument list into a command name, positional
//! arguments and options, then looks the name up in the
//! [`CommandRegistry`].
//!
//! # Token Rules
//!
//! - The first token that is not an option is the command name. Dotted or
//!   namespaced names (`cache.clear`, `db:dump`) are a single token.
//! - `--name`, `--name=value`, `-n` and `-n=value` are options. A bare option
//!   is a flag; repeating an option keeps the last value.
//! - `--` ends option parsing; every later token is positional.
//! - Any other token, including a lone `-`, is a positional argument.
//!
//! Options are accepted whether or not the command declares them. Commands
//! that opt into strict options are checked at dispatch.

mod options;


pub use options::OptionValue;

use crate::registry::{CommandDescriptor, CommandRegistry};
use std::collections::BTreeMap;
use tracing::debug;

/// Argument list split into its parts, before registry lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInvocation {
    pub name: Option<String>,
    pub arguments: Vec<String>,
    pub options: BTreeMap<String, OptionValue>,
}

impl RawInvocation {
    /// Name and positional arguments joined with spaces, for messages.
    pub fn display_input(&self) -> String {
        self.name
            .iter()
            .chain(self.arguments.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A command matched against the registry, ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub descriptor: &'a CommandDescriptor,
    pub arguments: Vec<String>,
    pub options: BTreeMap<String, OptionValue>,
}

impl ParsedCommand<'_> {
    /// Options given on the command line that the command does not declare.
    pub fn undeclared_options(&self) -> Vec<&str> {
        self.options
            .keys()
            .filter(|name| !self.descriptor.declares_option(name))
            .map(String::as_str)
            .collect()
    }
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Found(ParsedCommand<'a>),
    /// Nothing in the registry matches. `input` is what the user typed.
    NotFound { input: String },
}

impl<'a> Resolution<'a> {
    pub fn found(self) -> Option<ParsedCommand<'a>> {
        match self {
            Resolution::Found(parsed) => Some(parsed),
            Resolution::NotFound { .. } => None,
        }
    }
}

/// Split an argument list into command name, positionals and options.
pub fn parse_argv<S: AsRef<str>>(argv: &[S]) -> RawInvocation {
    let mut raw = RawInvocation::default();
    let mut options_done = false;

    for token in argv.iter().map(AsRef::as_ref) {
        if !options_done {
            if token == "--" {
                options_done = true;
                continue;
            }
            if let Some((name, value)) = options::parse_option(token) {
                raw.options.insert(name, value);
                continue;
            }
        }

        if raw.name.is_none() {
            raw.name = Some(token.to_string());
        } else {
            raw.arguments.push(token.to_string());
        }
    }

    raw
}

/// Parse `argv` and look the command up in `registry`.
///
/// An empty argument list, or one with only options, is `NotFound`.
pub fn resolve<'a, S: AsRef<str>>(argv: &[S], registry: &'a CommandRegistry) -> Resolution<'a> {
    let raw = parse_argv(argv);
    let input = raw.display_input();

    let Some(descriptor) = raw.name.as_deref().and_then(|name| registry.lookup(name)) else {
        debug!(%input, "command not found");
        return Resolution::NotFound { input };
    };

    debug!(command = %descriptor.name, %input, "command resolved");
    Resolution::Found(ParsedCommand {
        descriptor,
        arguments: raw.arguments,
        options: raw.options,
    })
}
