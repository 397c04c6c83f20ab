//! Core commands for bootcli.
//!
//! The `core` contributor is always merged first, so its commands win every
//! collision with a non-overriding add-on.

mod help;
mod status;
mod version;


pub use help::cmd_help;
pub use status::cmd_status;
pub use version::cmd_version;

use crate::bootstrap::Phase;
use crate::dispatch::CallbackTable;
use crate::registry::{CommandSpec, StaticContributor};

/// Contributor name of the core command set.
pub const CORE_CONTRIBUTOR: &str = "core";

/// Builtin callback ids.
pub mod ids {
    pub const HELP: &str = "core.help";
    pub const VERSION: &str = "core.version";
    pub const STATUS: &str = "core.status";
}

/// Specs of the core commands.
pub fn core_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec::builtin("help", ids::HELP)
            .description("Print this help message.")
            .argument("command")
            .example("bootcli help", "A list of available commands, one per line.")
            .example("bootcli help version", "Details of the version command."),
        CommandSpec::builtin("version", ids::VERSION)
            .description("Show bootcli version.")
            .option("major", "Print just the major version number, and nothing else.")
            .option("minor", "Print just the minor version number, and nothing else.")
            .example("bootcli version", "Print just the version number, and nothing else.")
            .example("bootcli version --major", "Print just the major version number.")
            .example("bootcli version --minor", "Print just the minor version number."),
        CommandSpec::builtin("status", ids::STATUS)
            .description("Show how far bootstrap got and which site is active.")
            .alias("st"),
    ]
    .into_iter()
    .map(|spec| spec.bootstrap(Phase::Base))
    .collect()
}

/// The `core` contributor.
pub fn core_contributor() -> StaticContributor {
    StaticContributor::new(CORE_CONTRIBUTOR, core_specs())
}

/// Callback table holding every core command.
pub fn core_callbacks() -> CallbackTable {
    CallbackTable::new()
        .with(ids::HELP, cmd_help)
        .with(ids::VERSION, cmd_version)
        .with(ids::STATUS, cmd_status)
}
