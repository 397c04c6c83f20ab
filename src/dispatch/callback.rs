//! Callback interface and the builtin callback table.

use crate::context::ContextStore;
use crate::registry::{CommandDescriptor, CommandRegistry};
use crate::resolver::OptionValue;
use serde_json::Value;
use std::collections::BTreeMap;

/// What a command hands back for printing.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Nothing to print. Not an error.
    Empty,
    Text(String),
    Json(Value),
}

impl CommandOutput {
    pub fn is_empty(&self) -> bool {
        match self {
            CommandOutput::Empty => true,
            CommandOutput::Text(text) => text.is_empty(),
            CommandOutput::Json(_) => false,
        }
    }
}

/// Boolean results carry no output: `false` is the neutral sentinel and
/// `true` would otherwise print a stray `1`.
impl From<bool> for CommandOutput {
    fn from(_: bool) -> Self {
        CommandOutput::Empty
    }
}

impl From<String> for CommandOutput {
    fn from(text: String) -> Self {
        CommandOutput::Text(text)
    }
}

impl From<&str> for CommandOutput {
    fn from(text: &str) -> Self {
        CommandOutput::Text(text.to_string())
    }
}

impl From<Value> for CommandOutput {
    fn from(value: Value) -> Self {
        CommandOutput::Json(value)
    }
}

/// Everything a callback gets to see about its invocation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub command: &'a CommandDescriptor,
    pub arguments: &'a [String],
    pub options: &'a BTreeMap<String, OptionValue>,
    /// Read-only view of every registered command.
    pub registry: &'a CommandRegistry,
}

impl<'a> Invocation<'a> {
    /// Whether `name` was given, with or without a value.
    pub fn flag(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// Value of `--name=value`. `None` for bare flags and absent options.
    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).and_then(OptionValue::as_str)
    }

    pub fn argument(&self, index: usize) -> Option<&'a str> {
        self.arguments.get(index).map(String::as_str)
    }
}

/// A command implementation.
///
/// Implemented for any `Fn(&Invocation, &mut ContextStore) -> anyhow::Result<CommandOutput>`.
pub trait CommandCallback {
    fn call(
        &self,
        invocation: &Invocation<'_>,
        context: &mut ContextStore,
    ) -> anyhow::Result<CommandOutput>;
}

impl<F> CommandCallback for F
where
    F: Fn(&Invocation<'_>, &mut ContextStore) -> anyhow::Result<CommandOutput>,
{
    fn call(
        &self,
        invocation: &Invocation<'_>,
        context: &mut ContextStore,
    ) -> anyhow::Result<CommandOutput> {
        self(invocation, context)
    }
}

/// Builtin callbacks keyed by the id used in `CallbackRef::Builtin`.
#[derive(Default)]
pub struct CallbackTable {
    builtins: BTreeMap<String, Box<dyn CommandCallback>>,
}

impl std::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.builtins.keys()).finish()
    }
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, callback: impl CommandCallback + 'static) {
        self.builtins.insert(id.into(), Box::new(callback));
    }

    pub fn with(mut self, id: impl Into<String>, callback: impl CommandCallback + 'static) -> Self {
        self.register(id, callback);
        self
    }

    pub fn get(&self, id: &str) -> Option<&dyn CommandCallback> {
        self.builtins.get(id).map(|callback| &**callback)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.builtins.contains_key(id)
    }
}
