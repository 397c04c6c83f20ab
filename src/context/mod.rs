//! Process-wide key/value context for bootcli.
//!
//! The context carries bootstrap results (`bootstrap.phase`, `site.root`,
//! `site.config`, ...), global options and the parsed arguments of the command
//! being dispatched. Values are `serde_json::Value` so any collaborator can
//! store structured data without the store knowing its shape.
//!
//! # Scopes
//!
//! The store is a stack of overlay maps. Lookups walk from the innermost scope
//! outwards; writes always land in the innermost scope. Opening a scope
//! returns a [`ScopeGuard`] that pops the scope when dropped, on every exit
//! path, so nothing written inside a scope can leak into the outer one.

mod guard;


pub use guard::ScopeGuard;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Well-known context keys.
pub mod keys {
    pub const BOOTSTRAP_PHASE: &str = "bootstrap.phase";
    pub const BOOTSTRAP_ERRORS: &str = "bootstrap.errors";
    pub const OPTION_DEBUG: &str = "options.debug";
    pub const OPTION_QUIET: &str = "options.quiet";
    pub const OPTION_JSON: &str = "options.json";
    pub const OPTION_ROOT: &str = "options.root";
    pub const CLI_VERSION: &str = "cli.version";
    pub const CLI_CWD: &str = "cli.cwd";
    pub const CLI_HOST: &str = "cli.host";
    pub const CLI_USER: &str = "cli.user";
    pub const SITE_ROOT: &str = "site.root";
    pub const SITE_CONFIG: &str = "site.config";
    pub const SITE_NAME: &str = "site.name";
    pub const SITE_ENV: &str = "site.env";
    pub const COMMAND_NAME: &str = "command.name";
    pub const COMMAND_ARGUMENTS: &str = "command.arguments";
    pub const COMMAND_OPTIONS: &str = "command.options";
}

/// Scoped key/value store shared by bootstrap phases and commands.
#[derive(Debug, Clone)]
pub struct ContextStore {
    /// Innermost scope last. Never empty: index 0 is the base scope.
    scopes: Vec<BTreeMap<String, Value>>,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    pub fn new() -> Self {
        Self {
            scopes: vec![BTreeMap::new()],
        }
    }

    /// Number of open scopes, including the base scope.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Look up a key, innermost scope first.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(key))
    }

    /// Look up a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Look up a boolean value, `default` when unset or not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// Deserialize a value into `T`.
    ///
    /// Returns `None` when the key is unset or holds a value of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Deserialize a value into `T`, falling back to `default`.
    pub fn get_as_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set a value in the innermost scope, returning the value it shadowed there.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.innermost_mut().insert(key.into(), value.into())
    }

    /// Remove a key from the innermost scope only.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.innermost_mut().remove(key)
    }

    /// All keys visible from the innermost scope, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.scopes
            .iter()
            .flat_map(|scope| scope.keys().map(String::as_str))
            .collect()
    }

    /// Open a nested scope. It is closed when the returned guard drops.
    pub fn push_scope(&mut self) -> ScopeGuard<'_> {
        let outer_depth = self.scopes.len();
        self.scopes.push(BTreeMap::new());
        ScopeGuard::new(self, outer_depth)
    }

    /// Run `f` inside a nested scope.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut ContextStore) -> R) -> R {
        let mut guard = self.push_scope();
        f(&mut *guard)
    }

    /// Drop every scope above `depth`. The base scope always survives.
    fn truncate_scopes(&mut self, depth: usize) {
        self.scopes.truncate(depth.max(1));
    }

    fn innermost_mut(&mut self) -> &mut BTreeMap<String, Value> {
        if self.scopes.is_empty() {
            self.scopes.push(BTreeMap::new());
        }
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
