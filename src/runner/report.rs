//! What one run produced.

use crate::bootstrap::Phase;
use crate::context::ContextStore;
use crate::diagnostics::DiagnosticSink;
use crate::dispatch::CommandOutput;
use crate::exit_codes;
use serde::Serialize;

/// States a run passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    Start,
    BaseBootstrapped,
    CommandResolved,
    PhaseSatisfied,
    Dispatched,
    NotFound,
    NotExecutable,
    Finished,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// The command ran and returned normally.
    Completed,
    /// No command matched the input.
    NotFound,
    /// The command exists but bootstrap never reached its phase.
    NotExecutable,
    /// Not even the `base` phase could be entered.
    BootstrapFailed,
    /// The command could not run, or ran and failed.
    CommandFailed,
}

/// Result of [`Runner::run`](super::Runner::run).
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,

    /// Command output, for completed runs.
    pub output: Option<CommandOutput>,

    /// Every diagnostic recorded during the run, in order.
    pub diagnostics: DiagnosticSink,

    /// Flow states visited, in order. Always ends with `Finished`.
    pub trail: Vec<FlowState>,

    /// Highest bootstrap phase reached.
    pub reached: Option<Phase>,

    /// Canonical name of the resolved command.
    pub command: Option<String>,

    /// Context as left after teardown.
    pub context: ContextStore,
}

impl RunReport {
    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::Completed if self.diagnostics.has_errors() => {
                exit_codes::DIAGNOSTICS_RECORDED
            }
            RunOutcome::Completed => exit_codes::SUCCESS,
            RunOutcome::NotFound => exit_codes::COMMAND_NOT_FOUND,
            RunOutcome::NotExecutable => exit_codes::COMMAND_NOT_EXECUTABLE,
            RunOutcome::BootstrapFailed => exit_codes::BOOTSTRAP_FAILURE,
            RunOutcome::CommandFailed => exit_codes::COMMAND_FAILED,
        }
    }

    pub fn visited(&self, state: FlowState) -> bool {
        self.trail.contains(&state)
    }
}
