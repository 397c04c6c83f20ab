//! Run-scoped coordinator for bootcli.
//!
//! A [`Runner`] owns every piece of state for one invocation (bootstrapper,
//! contributors, dispatcher, context, diagnostics) and drives them through
//! the command flow:
//!
//! ```text
//! start -> base_bootstrapped -> command_resolved -> phase_satisfied -> dispatched -> finished
//!                                      |                   |
//!                                  not_found         not_executable ------------> finished
//! ```
//!
//! Bootstrap teardown runs on every path into `finished`.

mod report;

#[cfg(test)]
mod tests;

pub use report::{FlowState, RunOutcome, RunReport};

use crate::bootstrap::{Bootstrapper, Phase};
use crate::context::ContextStore;
use crate::diagnostics::{Diagnostic, DiagnosticSink, codes};
use crate::dispatch::{CommandOutput, DispatchOutcome, Dispatcher};
use crate::registry::{CommandRegistry, Contributor};
use crate::resolver::{self, Resolution};
use crate::site::{self, AddonContributor};
use tracing::debug;

/// Command used when no name is given and no site configuration says otherwise.
pub const FALLBACK_COMMAND: &str = "help";

/// Coordinator for one invocation.
pub struct Runner {
    bootstrapper: Bootstrapper,
    dispatcher: Dispatcher,
    /// Contributors merged before any add-on, in order.
    contributors: Vec<Box<dyn Contributor>>,
    discover_addons: bool,
    context: ContextStore,
    sink: DiagnosticSink,
    trail: Vec<FlowState>,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("bootstrapper", &self.bootstrapper)
            .field("dispatcher", &self.dispatcher)
            .field(
                "contributors",
                &self.contributors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("discover_addons", &self.discover_addons)
            .finish()
    }
}

impl Runner {
    pub fn new(bootstrapper: Bootstrapper, dispatcher: Dispatcher) -> Self {
        Self {
            bootstrapper,
            dispatcher,
            contributors: Vec::new(),
            discover_addons: true,
            context: ContextStore::new(),
            sink: DiagnosticSink::new(),
            trail: Vec::new(),
        }
    }

    /// Append a contributor. Earlier contributors win collisions.
    pub fn with_contributor(mut self, contributor: impl Contributor + 'static) -> Self {
        self.contributors.push(Box::new(contributor));
        self
    }

    /// Whether to bootstrap to `full` and load add-on manifests.
    pub fn discover_addons(mut self, enabled: bool) -> Self {
        self.discover_addons = enabled;
        self
    }

    /// Context before the run, e.g. for global options.
    pub fn context_mut(&mut self) -> &mut ContextStore {
        &mut self.context
    }

    /// Run one command line through the whole flow.
    pub fn run<S: AsRef<str>>(mut self, argv: &[S]) -> RunReport {
        self.trail.push(FlowState::Start);

        let reached = self.bootstrapper.advance_to(Phase::Base, &mut self.context);
        if reached.is_none() {
            self.sink.extend(self.bootstrapper.error_diagnostics());
            return self.finish(RunOutcome::BootstrapFailed, None, None);
        }
        self.trail.push(FlowState::BaseBootstrapped);

        let addons = self.load_addons();
        let registry = self.build_registry(&addons);
        let argv = self.with_default_command(argv);

        let parsed = match resolver::resolve(&argv, &registry) {
            Resolution::Found(parsed) => parsed,
            Resolution::NotFound { input } => {
                self.trail.push(FlowState::NotFound);
                self.sink.extend(self.bootstrapper.error_diagnostics());
                self.sink.error(
                    codes::COMMAND_NOT_FOUND,
                    format!("The command '{}' could not be found.", input),
                );
                return self.finish(RunOutcome::NotFound, None, None);
            }
        };
        self.trail.push(FlowState::CommandResolved);
        let command = Some(parsed.descriptor.name.clone());

        let required = parsed.descriptor.required_phase;
        self.bootstrapper.advance_to(required, &mut self.context);
        if self.bootstrapper.state().has_reached(required) {
            self.trail.push(FlowState::PhaseSatisfied);
        }

        let outcome = self.dispatcher.dispatch(
            &parsed,
            self.bootstrapper.state(),
            &registry,
            &mut self.context,
        );

        match outcome {
            DispatchOutcome::Completed(output) => {
                self.trail.push(FlowState::Dispatched);
                self.finish(RunOutcome::Completed, Some(output), command)
            }
            DispatchOutcome::Failed(diagnostic) => {
                self.trail.push(FlowState::Dispatched);
                self.sink.record(diagnostic);
                self.finish(RunOutcome::CommandFailed, None, command)
            }
            DispatchOutcome::NotExecutable { required, reached } => {
                self.trail.push(FlowState::NotExecutable);
                self.sink.extend(self.bootstrapper.error_diagnostics());
                let reached = reached.map_or_else(|| "none".to_string(), |p| p.to_string());
                self.sink.record(
                    Diagnostic::error(
                        codes::COMMAND_NOT_EXECUTABLE,
                        format!(
                            "The command '{}' could not be executed: it requires bootstrap phase '{}' but bootstrap stopped at '{}'.",
                            parsed.descriptor.name, required, reached
                        ),
                    )
                    .with_phase(required),
                );
                self.finish(RunOutcome::NotExecutable, None, command)
            }
        }
    }

    /// Bootstrap as far as `full` and read add-on manifests if that worked.
    ///
    /// A stalled bootstrap is not an error here: base-phase commands must
    /// still run outside a site.
    fn load_addons(&mut self) -> Vec<AddonContributor> {
        if !self.discover_addons {
            return Vec::new();
        }

        let reached = self.bootstrapper.advance_to(Phase::Full, &mut self.context);
        if reached != Some(Phase::Full) {
            debug!(?reached, "add-on discovery skipped");
            return Vec::new();
        }

        let (Some(root), Some(config)) =
            (site::site_root(&self.context), site::site_config(&self.context))
        else {
            return Vec::new();
        };

        let discovery = site::discover(&root, &config);
        self.sink.extend(discovery.diagnostics);
        discovery.contributors
    }

    fn build_registry(&mut self, addons: &[AddonContributor]) -> CommandRegistry {
        let mut contributors: Vec<&dyn Contributor> =
            Vec::with_capacity(self.contributors.len() + addons.len());
        for contributor in &self.contributors {
            contributors.push(contributor.as_ref());
        }
        for addon in addons {
            contributors.push(addon);
        }
        let build = CommandRegistry::build(contributors);
        self.sink.extend(build.diagnostics);
        build.registry
    }

    /// Prepend the default command when the input names none.
    fn with_default_command<S: AsRef<str>>(&self, argv: &[S]) -> Vec<String> {
        let mut argv: Vec<String> = argv.iter().map(|arg| arg.as_ref().to_string()).collect();
        if resolver::parse_argv(&argv).name.is_none() {
            let default = site::site_config(&self.context)
                .map(|config| config.default_command)
                .unwrap_or_else(|| FALLBACK_COMMAND.to_string());
            debug!(command = %default, "no command given, using default");
            argv.insert(0, default);
        }
        argv
    }

    fn finish(
        mut self,
        outcome: RunOutcome,
        output: Option<CommandOutput>,
        command: Option<String>,
    ) -> RunReport {
        let reached = self.bootstrapper.current_phase();
        self.bootstrapper.finish(&mut self.context, &mut self.sink);
        self.trail.push(FlowState::Finished);
        debug!(?outcome, trail = ?self.trail, "run finished");

        RunReport {
            outcome,
            output,
            diagnostics: self.sink,
            trail: self.trail,
            reached,
            command,
            context: self.context,
        }
    }
}
