//! Contributor interface.

use super::descriptor::CommandSpec;

/// A source of command specs: the core command set or an add-on.
pub trait Contributor {
    /// Name used in collision diagnostics.
    fn name(&self) -> &str;

    /// The commands this contributor provides.
    fn config(&self) -> Vec<CommandSpec>;

    /// Whether this contributor's commands replace earlier ones on collision.
    fn overrides(&self) -> bool {
        false
    }
}

/// Contributor backed by a fixed list of specs.
#[derive(Debug, Clone)]
pub struct StaticContributor {
    name: String,
    commands: Vec<CommandSpec>,
    overrides: bool,
}

impl StaticContributor {
    pub fn new(name: impl Into<String>, commands: Vec<CommandSpec>) -> Self {
        Self {
            name: name.into(),
            commands,
            overrides: false,
        }
    }

    /// Mark the contributor as override-capable.
    pub fn overriding(mut self, overrides: bool) -> Self {
        self.overrides = overrides;
        self
    }
}

impl Contributor for StaticContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> Vec<CommandSpec> {
        self.commands.clone()
    }

    fn overrides(&self) -> bool {
        self.overrides
    }
}
