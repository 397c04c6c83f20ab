//! Command records supplied by contributors and stored by the registry.

use crate::bootstrap::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a command's implementation lives.
///
/// The registry never resolves this; the dispatcher does, at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackRef {
    /// Callback registered in the dispatcher's table under this id.
    Builtin(String),
    /// External program run from a command template.
    Exec(String),
}

impl fmt::Display for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackRef::Builtin(id) => write!(f, "builtin:{}", id),
            CallbackRef::Exec(command) => write!(f, "exec:{}", command),
        }
    }
}

/// Usage example shown in help output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub usage: String,
    pub explanation: String,
}

impl Example {
    pub fn new(usage: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
            explanation: explanation.into(),
        }
    }
}

/// One command as declared by a contributor.
///
/// Add-on manifests deserialize straight into this; every field except
/// `name` and `callback` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,

    /// Minimum bootstrap phase needed to run the command.
    #[serde(default)]
    pub bootstrap: Phase,

    #[serde(default)]
    pub description: String,

    /// Expected positional argument names (informational).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,

    /// Declared options, name to description.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Written as `callback: {builtin: <id>}` or `callback: {exec: <template>}`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub callback: CallbackRef,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Example>,

    /// Reject options that are not declared in `options`.
    #[serde(default)]
    pub strict_options: bool,
}

impl CommandSpec {
    /// Spec with a builtin callback and everything else defaulted.
    pub fn builtin(name: impl Into<String>, callback_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bootstrap: Phase::Base,
            description: String::new(),
            arguments: Vec::new(),
            options: BTreeMap::new(),
            aliases: Vec::new(),
            callback: CallbackRef::Builtin(callback_id.into()),
            examples: Vec::new(),
            strict_options: false,
        }
    }

    pub fn bootstrap(mut self, phase: Phase) -> Self {
        self.bootstrap = phase;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn argument(mut self, name: impl Into<String>) -> Self {
        self.arguments.push(name.into());
        self
    }

    pub fn option(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.options.insert(name.into(), description.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn example(mut self, usage: impl Into<String>, explanation: impl Into<String>) -> Self {
        self.examples.push(Example::new(usage, explanation));
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict_options = true;
        self
    }
}

/// Validated command stored in the registry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    pub name: String,
    /// Aliases that survived validation, sorted.
    pub aliases: Vec<String>,
    pub required_phase: Phase,
    pub description: String,
    pub callback: CallbackRef,
    pub declared_options: BTreeMap<String, String>,
    pub declared_arguments: Vec<String>,
    pub examples: Vec<Example>,
    pub strict_options: bool,
    /// Contributor that registered the command.
    pub source: String,
}

impl CommandDescriptor {
    pub(super) fn from_spec(spec: CommandSpec, source: &str) -> Self {
        let mut aliases: Vec<String> = spec
            .aliases
            .into_iter()
            .map(|alias| alias.trim().to_string())
            .filter(|alias| !alias.is_empty() && *alias != spec.name)
            .collect();
        aliases.sort();
        aliases.dedup();

        Self {
            name: spec.name,
            aliases,
            required_phase: spec.bootstrap,
            description: spec.description,
            callback: spec.callback,
            declared_options: spec.options,
            declared_arguments: spec.arguments,
            examples: spec.examples,
            strict_options: spec.strict_options,
            source: source.to_string(),
        }
    }

    /// Canonical name followed by aliases.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn declares_option(&self, name: &str) -> bool {
        self.declared_options.contains_key(name)
    }
}
