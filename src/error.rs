//! Error types for the bootcli CLI.
//!
//! Uses thiserror for derive macros. Each variant carries a stable diagnostic
//! code so failures can be folded into the diagnostics sink.

use crate::diagnostics::codes;
use thiserror::Error;

/// Main error type for bootcli operations.
#[derive(Error, Debug)]
pub enum BootcliError {
    /// User provided invalid input or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// Site configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Add-on manifest could not be read or parsed.
    #[error("Add-on manifest error: {0}")]
    ManifestError(String),

    /// External command backing an `exec` callback failed.
    #[error("Command execution failed: {0}")]
    ExecError(String),
}

impl BootcliError {
    /// Returns the diagnostic code recorded for this error.
    pub fn code(&self) -> &'static str {
        match self {
            BootcliError::UserError(_) => codes::USER_ERROR,
            BootcliError::ConfigError(_) => codes::BOOTSTRAP_CONFIG_INVALID,
            BootcliError::ManifestError(_) => codes::ADDON_MANIFEST_INVALID,
            BootcliError::ExecError(_) => codes::COMMAND_FAILED,
        }
    }
}

/// Result type alias for bootcli operations.
pub type Result<T> = std::result::Result<T, BootcliError>;
