//! Bootstrap phases and the initializer contract.

use crate::context::ContextStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Ordered stage of environment initialization.
///
/// Variants are declared in bootstrap order; the derived `Ord` is the
/// phase ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Process-level setup only. Always available.
    #[default]
    Base,
    /// Site root located.
    Root,
    /// Site configuration loaded.
    Configuration,
    /// Site fully initialized.
    Full,
}

impl Phase {
    /// Every phase in bootstrap order.
    pub const ALL: [Phase; 4] = [Phase::Base, Phase::Root, Phase::Configuration, Phase::Full];

    /// Highest phase.
    pub const MAX: Phase = Phase::Full;

    pub fn name(self) -> &'static str {
        match self {
            Phase::Base => "base",
            Phase::Root => "root",
            Phase::Configuration => "configuration",
            Phase::Full => "full",
        }
    }

    /// Parse a phase from its name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        Phase::ALL.into_iter().find(|phase| phase.name() == s)
    }

    /// Phases from the first one up to and including `self`.
    pub fn up_to(self) -> impl Iterator<Item = Phase> {
        Phase::ALL.into_iter().filter(move |phase| *phase <= self)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Failure signalled by a phase initializer or teardown.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct PhaseFailure {
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl PhaseFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Environment setup for one phase.
///
/// `initialize` runs at most once per successful entry. `teardown` runs at
/// process end for phases that were entered, in reverse entry order.
pub trait PhaseInitializer {
    fn initialize(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure>;

    fn teardown(&mut self, _context: &mut ContextStore) -> Result<(), PhaseFailure> {
        Ok(())
    }
}
