//! Bootstrap progress for one process run.

use super::phase::{Phase, PhaseFailure};
use std::collections::BTreeMap;

/// How far bootstrap got, and what went wrong on the way.
///
/// Only the [`Bootstrapper`](super::Bootstrapper) mutates this.
/// `current` never decreases.
#[derive(Debug, Clone, Default)]
pub struct BootstrapState {
    /// Highest phase successfully entered, `None` before the first phase.
    pub(super) current: Option<Phase>,

    /// Phase whose initializer failed. Advancement stalls below it.
    pub(super) failed: Option<Phase>,

    /// Failures recorded per phase, in the order they happened.
    pub(super) phase_errors: BTreeMap<Phase, Vec<PhaseFailure>>,

    /// Phases entered, in entry order. Drained by teardown.
    pub(super) entered: Vec<Phase>,
}

impl BootstrapState {
    pub fn current_phase(&self) -> Option<Phase> {
        self.current
    }

    /// Whether `phase` has been entered.
    pub fn has_reached(&self, phase: Phase) -> bool {
        self.current.is_some_and(|current| current >= phase)
    }

    /// The phase that stalled bootstrap, if any.
    pub fn failed_phase(&self) -> Option<Phase> {
        self.failed
    }

    pub fn errors_for(&self, phase: Phase) -> &[PhaseFailure] {
        self.phase_errors
            .get(&phase)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All recorded failures in phase order.
    pub fn errors(&self) -> impl Iterator<Item = (Phase, &PhaseFailure)> {
        self.phase_errors
            .iter()
            .flat_map(|(phase, failures)| failures.iter().map(move |f| (*phase, f)))
    }

    pub fn has_errors(&self) -> bool {
        self.phase_errors.values().any(|failures| !failures.is_empty())
    }

    /// Phases entered so far, in entry order.
    pub fn entered(&self) -> &[Phase] {
        &self.entered
    }
}
