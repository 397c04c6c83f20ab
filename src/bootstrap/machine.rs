//! Phase-by-phase bootstrap driver.

use super::phase::{Phase, PhaseInitializer};
use super::state::BootstrapState;
use crate::context::{ContextStore, keys};
use crate::diagnostics::{Diagnostic, DiagnosticSink, codes};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Advances the environment through [`Phase`]s on demand.
///
/// Owns the [`BootstrapState`] and the per-phase initializers. Phases without
/// an initializer are entered without doing anything.
#[derive(Default)]
pub struct Bootstrapper {
    state: BootstrapState,
    initializers: BTreeMap<Phase, Box<dyn PhaseInitializer>>,
    finished: bool,
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("state", &self.state)
            .field("initializers", &self.initializers.keys().collect::<Vec<_>>())
            .field("finished", &self.finished)
            .finish()
    }
}

impl Bootstrapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the initializer for `phase`, replacing any previous one.
    pub fn with_initializer(
        mut self,
        phase: Phase,
        initializer: impl PhaseInitializer + 'static,
    ) -> Self {
        self.initializers.insert(phase, Box::new(initializer));
        self
    }

    pub fn state(&self) -> &BootstrapState {
        &self.state
    }

    pub fn current_phase(&self) -> Option<Phase> {
        self.state.current
    }

    /// Advance up to `target`, one phase at a time.
    ///
    /// Each phase above the current one and at or below `target` has its
    /// initializer run exactly once. The first failure is recorded against
    /// its phase and stops advancement; that phase stays failed for the rest
    /// of the run unless [`reset_phase`](Self::reset_phase) is called.
    ///
    /// Returns the phase actually reached.
    pub fn advance_to(&mut self, target: Phase, context: &mut ContextStore) -> Option<Phase> {
        if self.state.has_reached(target) || self.finished {
            return self.state.current;
        }
        if let Some(failed) = self.state.failed {
            debug!(%target, %failed, "bootstrap stalled, not advancing");
            return self.state.current;
        }

        for phase in target.up_to() {
            if self.state.has_reached(phase) {
                continue;
            }

            debug!(%phase, "entering bootstrap phase");
            let result = match self.initializers.get_mut(&phase) {
                Some(initializer) => initializer.initialize(context),
                None => Ok(()),
            };

            match result {
                Ok(()) => {
                    self.state.current = Some(phase);
                    self.state.entered.push(phase);
                    context.set(keys::BOOTSTRAP_PHASE, phase.name());
                }
                Err(failure) => {
                    warn!(%phase, code = %failure.code, "bootstrap phase failed: {}", failure.message);
                    self.state.failed = Some(phase);
                    self.state
                        .phase_errors
                        .entry(phase)
                        .or_default()
                        .push(failure);
                    self.publish_errors(context);
                    break;
                }
            }
        }

        self.state.current
    }

    /// Clear the failure recorded for `phase` so a later `advance_to` retries it.
    ///
    /// Returns `false` if `phase` is not the stalled phase.
    pub fn reset_phase(&mut self, phase: Phase, context: &mut ContextStore) -> bool {
        if self.state.failed != Some(phase) {
            return false;
        }
        self.state.failed = None;
        self.state.phase_errors.remove(&phase);
        self.publish_errors(context);
        true
    }

    /// Tear down every entered phase in reverse entry order.
    ///
    /// Best effort: a failing teardown is recorded in `sink` and the remaining
    /// phases are still torn down. Later calls do nothing.
    pub fn finish(&mut self, context: &mut ContextStore, sink: &mut DiagnosticSink) {
        if self.finished {
            return;
        }
        self.finished = true;

        while let Some(phase) = self.state.entered.pop() {
            let Some(initializer) = self.initializers.get_mut(&phase) else {
                continue;
            };
            debug!(%phase, "tearing down bootstrap phase");
            if let Err(failure) = initializer.teardown(context) {
                warn!(%phase, code = %failure.code, "teardown failed: {}", failure.message);
                sink.record(
                    Diagnostic::error(
                        codes::TEARDOWN_FAILED,
                        format!("teardown of phase '{}' failed: {}", phase, failure.message),
                    )
                    .with_phase(phase),
                );
            }
        }
    }

    /// Phase failures as diagnostics, for promotion into the run's sink.
    pub fn error_diagnostics(&self) -> Vec<Diagnostic> {
        self.state
            .errors()
            .map(|(phase, failure)| {
                Diagnostic::error(failure.code.clone(), failure.message.clone()).with_phase(phase)
            })
            .collect()
    }

    fn publish_errors(&self, context: &mut ContextStore) {
        let errors: Vec<_> = self
            .state
            .errors()
            .map(|(phase, failure)| {
                json!({"phase": phase.name(), "code": failure.code, "message": failure.message})
            })
            .collect();
        context.set(keys::BOOTSTRAP_ERRORS, errors);
    }
}

