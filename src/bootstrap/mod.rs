//! Bootstrap state machine for bootcli.
//!
//! Commands declare the minimum [`Phase`] they need. The [`Bootstrapper`]
//! moves the environment forward through the ordered phases only as far as a
//! caller asks, never skipping or re-entering one, and records failures
//! instead of aborting.
//!
//! # Lifecycle
//!
//! ```text
//! (none) -> base -> root -> configuration -> full
//! ```
//!
//! A failed phase stalls advancement for the rest of the run. `finish` tears
//! entered phases down in reverse order.

mod machine;
mod phase;
mod state;


pub use machine::Bootstrapper;
pub use phase::{Phase, PhaseFailure, PhaseInitializer};
pub use state::BootstrapState;
