//! Command dispatch for bootcli.
//!
//! The [`Dispatcher`] runs one resolved command against the bootstrap state
//! the caller has already advanced. It never advances bootstrap itself.
//!
//! # Dispatch Order
//!
//! 1. Required phase not reached: `NotExecutable`, callback untouched
//! 2. Strict command given undeclared options: `UNKNOWN_OPTION`
//! 3. Callback reference resolved (`builtin` table lookup or `exec` template)
//! 4. Callback invoked inside a fresh context scope holding `command.*` keys
//!
//! Callback errors and panics stop at this boundary and come back as a
//! [`Diagnostic`].

mod callback;
mod exec;
pub mod panic_hook;
mod template;


pub use callback::{CallbackTable, CommandCallback, CommandOutput, Invocation};
pub use exec::ExecCallback;
pub use template::TemplateError;

use crate::bootstrap::{BootstrapState, Phase};
use crate::context::{ContextStore, keys};
use crate::diagnostics::{Diagnostic, codes};
use crate::registry::{CallbackRef, CommandRegistry};
use crate::resolver::ParsedCommand;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Result of [`Dispatcher::dispatch`].
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// The callback ran and returned normally.
    Completed(CommandOutput),

    /// Bootstrap has not reached the command's required phase.
    NotExecutable {
        required: Phase,
        reached: Option<Phase>,
    },

    /// The command could not run, or ran and failed.
    Failed(Diagnostic),
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed(_))
    }
}

/// Invokes command callbacks.
#[derive(Debug, Default)]
pub struct Dispatcher {
    callbacks: CallbackTable,
}

impl Dispatcher {
    pub fn new(callbacks: CallbackTable) -> Self {
        Self { callbacks }
    }

    /// Run `parsed` if `state` has reached its required phase.
    pub fn dispatch(
        &self,
        parsed: &ParsedCommand<'_>,
        state: &BootstrapState,
        registry: &CommandRegistry,
        context: &mut ContextStore,
    ) -> DispatchOutcome {
        let descriptor = parsed.descriptor;

        if !state.has_reached(descriptor.required_phase) {
            debug!(
                command = %descriptor.name,
                required = %descriptor.required_phase,
                "required phase not reached"
            );
            return DispatchOutcome::NotExecutable {
                required: descriptor.required_phase,
                reached: state.current_phase(),
            };
        }

        if descriptor.strict_options {
            let undeclared = parsed.undeclared_options();
            if !undeclared.is_empty() {
                return DispatchOutcome::Failed(Diagnostic::error(
                    codes::UNKNOWN_OPTION,
                    format!(
                        "command '{}' does not accept option(s): {}",
                        descriptor.name,
                        undeclared
                            .iter()
                            .map(|name| format!("--{}", name))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                ));
            }
        }

        let exec;
        let callback: &dyn CommandCallback = match &descriptor.callback {
            CallbackRef::Builtin(id) => match self.callbacks.get(id) {
                Some(callback) => callback,
                None => {
                    return DispatchOutcome::Failed(Diagnostic::error(
                        codes::CALLBACK_NOT_FOUND,
                        format!(
                            "command '{}' refers to builtin callback '{}', which is not registered",
                            descriptor.name, id
                        ),
                    ));
                }
            },
            CallbackRef::Exec(template) => {
                exec = ExecCallback::new(template.clone());
                &exec
            }
        };

        let invocation = Invocation {
            command: descriptor,
            arguments: &parsed.arguments,
            options: &parsed.options,
            registry,
        };

        let mut scope = context.push_scope();
        scope.set(keys::COMMAND_NAME, descriptor.name.clone());
        scope.set(keys::COMMAND_ARGUMENTS, parsed.arguments.clone());
        scope.set(
            keys::COMMAND_OPTIONS,
            serde_json::to_value(&parsed.options).unwrap_or_default(),
        );

        debug!(command = %descriptor.name, callback = %descriptor.callback, "dispatching");
        let result = panic_hook::silenced(|| {
            panic::catch_unwind(AssertUnwindSafe(|| callback.call(&invocation, &mut scope)))
        });
        drop(scope);

        match result {
            Ok(Ok(output)) => DispatchOutcome::Completed(output),
            Ok(Err(e)) => {
                warn!(command = %descriptor.name, error = %e, "command failed");
                DispatchOutcome::Failed(Diagnostic::error(
                    codes::COMMAND_FAILED,
                    format!("command '{}' failed: {:#}", descriptor.name, e),
                ))
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(command = %descriptor.name, %message, "command panicked");
                DispatchOutcome::Failed(Diagnostic::error(
                    codes::COMMAND_PANICKED,
                    format!("command '{}' panicked: {}", descriptor.name, message),
                ))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
