//! Exit code constants for the bootcli CLI.
//!
//! - 0: Command dispatched, no error diagnostics recorded
//! - 1: Command not found
//! - 2: Command found but its bootstrap phase could not be reached
//! - 3: The base phase itself could not be entered
//! - 4: Command callback failed
//! - 5: Command ran but error diagnostics were recorded (e.g. teardown)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// No registered command or alias matches the input.
pub const COMMAND_NOT_FOUND: i32 = 1;

/// Command exists but bootstrap stalled below its required phase.
pub const COMMAND_NOT_EXECUTABLE: i32 = 2;

/// The base phase failed, so no command could be considered at all.
pub const BOOTSTRAP_FAILURE: i32 = 3;

/// Callback error, panic, missing callback, or strict option rejection.
pub const COMMAND_FAILED: i32 = 4;

/// Command ran but error-severity diagnostics were recorded along the way.
pub const DIAGNOSTICS_RECORDED: i32 = 5;
