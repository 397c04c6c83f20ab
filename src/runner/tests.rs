//! End-to-end tests for the command flow.

use super::*;
use crate::bootstrap::{PhaseFailure, PhaseInitializer};
use crate::commands::{core_callbacks, core_contributor};
use crate::context::keys;
use crate::exit_codes;
use crate::registry::{CommandSpec, StaticContributor};
use crate::site::{BaseInitializer, standard_bootstrapper};
use crate::test_support::{create_test_site, write_addon};
use tempfile::TempDir;

/// Initializer that always fails with `code`.
struct Failing(&'static str);

impl PhaseInitializer for Failing {
    fn initialize(&mut self, _context: &mut ContextStore) -> Result<(), PhaseFailure> {
        Err(PhaseFailure::new(self.0, "initializer failed"))
    }
}

/// Initializer whose teardown fails.
struct BrokenTeardown;

impl PhaseInitializer for BrokenTeardown {
    fn initialize(&mut self, _context: &mut ContextStore) -> Result<(), PhaseFailure> {
        Ok(())
    }

    fn teardown(&mut self, _context: &mut ContextStore) -> Result<(), PhaseFailure> {
        Err(PhaseFailure::new("LEAK", "handle still open"))
    }
}

fn core_runner(bootstrapper: Bootstrapper) -> Runner {
    Runner::new(bootstrapper, Dispatcher::new(core_callbacks()))
        .with_contributor(core_contributor())
        .discover_addons(false)
}

fn text(report: &RunReport) -> &str {
    match &report.output {
        Some(CommandOutput::Text(text)) => text,
        other => panic!("expected text output, got {:?}", other),
    }
}

#[test]
fn scenario_version_major() {
    let mut runner = core_runner(Bootstrapper::new());
    runner.context_mut().set(keys::CLI_VERSION, "3.1.4");

    let report = runner.run(&["version", "--major"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.command.as_deref(), Some("version"));
    assert_eq!(text(&report), "3");
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
    assert_eq!(
        report.trail,
        vec![
            FlowState::Start,
            FlowState::BaseBootstrapped,
            FlowState::CommandResolved,
            FlowState::PhaseSatisfied,
            FlowState::Dispatched,
            FlowState::Finished,
        ]
    );
}

#[test]
fn scenario_unknown_command() {
    let report = core_runner(Bootstrapper::new()).run(&["nonexistent-command"]);

    assert_eq!(report.outcome, RunOutcome::NotFound);
    assert!(report.diagnostics.has_code(codes::COMMAND_NOT_FOUND));
    assert_eq!(report.exit_code(), exit_codes::COMMAND_NOT_FOUND);
    assert_eq!(
        report.trail,
        vec![
            FlowState::Start,
            FlowState::BaseBootstrapped,
            FlowState::NotFound,
            FlowState::Finished,
        ]
    );
}

#[test]
fn scenario_command_needs_unreachable_phase() {
    let bootstrapper = Bootstrapper::new()
        .with_initializer(Phase::Configuration, Failing(codes::BOOTSTRAP_CONFIG_INVALID));
    let site = StaticContributor::new(
        "site",
        vec![CommandSpec::builtin("cache.rebuild", "site.rebuild").bootstrap(Phase::Full)],
    );
    let runner = Runner::new(bootstrapper, Dispatcher::new(core_callbacks()))
        .with_contributor(core_contributor())
        .with_contributor(site);

    let report = runner.run(&["cache.rebuild"]);

    assert_eq!(report.outcome, RunOutcome::NotExecutable);
    assert_eq!(report.reached, Some(Phase::Root));
    assert!(report.diagnostics.has_code(codes::COMMAND_NOT_EXECUTABLE));
    assert!(report.diagnostics.has_code(codes::BOOTSTRAP_CONFIG_INVALID));
    assert!(!report.diagnostics.has_code(codes::COMMAND_NOT_FOUND));
    assert_eq!(report.exit_code(), exit_codes::COMMAND_NOT_EXECUTABLE);
    assert_ne!(report.exit_code(), exit_codes::COMMAND_NOT_FOUND);
    assert!(report.visited(FlowState::CommandResolved));
    assert!(!report.visited(FlowState::PhaseSatisfied));
    assert!(report.visited(FlowState::NotExecutable));
    assert!(!report.visited(FlowState::Dispatched));
}

#[test]
fn scenario_duplicate_help_keeps_first() {
    let shadow = StaticContributor::new(
        "shadow",
        vec![CommandSpec::builtin("help", "shadow.help").description("Shadow help")],
    );
    let runner = core_runner(Bootstrapper::new()).with_contributor(shadow);

    let report = runner.run(&["help", "help"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(report.diagnostics.has_code(codes::REGISTRY_COLLISION));
    assert!(text(&report).contains("Provided by: core"));
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn phase_errors_are_not_reported_for_base_commands() {
    let bootstrapper =
        Bootstrapper::new().with_initializer(Phase::Root, Failing(codes::BOOTSTRAP_ROOT_NOT_FOUND));
    let runner = Runner::new(bootstrapper, Dispatcher::new(core_callbacks()))
        .with_contributor(core_contributor());

    let report = runner.run(&["version"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn phase_errors_are_promoted_when_not_found() {
    let bootstrapper =
        Bootstrapper::new().with_initializer(Phase::Root, Failing(codes::BOOTSTRAP_ROOT_NOT_FOUND));
    let runner = Runner::new(bootstrapper, Dispatcher::new(core_callbacks()))
        .with_contributor(core_contributor());

    let report = runner.run(&["cache.clear"]);

    let codes_seen: Vec<&str> = report.diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(
        codes_seen,
        vec![codes::BOOTSTRAP_ROOT_NOT_FOUND, codes::COMMAND_NOT_FOUND]
    );
    assert_eq!(report.exit_code(), exit_codes::COMMAND_NOT_FOUND);
}

#[test]
fn base_failure_stops_before_resolution() {
    let bootstrapper =
        Bootstrapper::new().with_initializer(Phase::Base, Failing(codes::BOOTSTRAP_BASE_FAILED));

    let report = core_runner(bootstrapper).run(&["version"]);

    assert_eq!(report.outcome, RunOutcome::BootstrapFailed);
    assert_eq!(report.reached, None);
    assert!(report.diagnostics.has_code(codes::BOOTSTRAP_BASE_FAILED));
    assert_eq!(report.exit_code(), exit_codes::BOOTSTRAP_FAILURE);
    assert_eq!(report.trail, vec![FlowState::Start, FlowState::Finished]);
}

#[test]
fn empty_input_runs_fallback_command() {
    let empty: [&str; 0] = [];
    let report = core_runner(Bootstrapper::new()).run(&empty);

    assert_eq!(report.command.as_deref(), Some(FALLBACK_COMMAND));
    assert!(text(&report).starts_with("Available commands:"));
}

#[test]
fn callback_failure_exits_with_command_failed() {
    let report = core_runner(Bootstrapper::new()).run(&["help", "nope"]);

    assert_eq!(report.outcome, RunOutcome::CommandFailed);
    assert!(report.diagnostics.has_code(codes::COMMAND_FAILED));
    assert_eq!(report.exit_code(), exit_codes::COMMAND_FAILED);
    assert!(report.visited(FlowState::Dispatched));
}

#[test]
fn teardown_failure_is_reported_after_success() {
    let bootstrapper = Bootstrapper::new().with_initializer(Phase::Base, BrokenTeardown);

    let report = core_runner(bootstrapper).run(&["version"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert!(report.diagnostics.has_code(codes::TEARDOWN_FAILED));
    assert_eq!(report.exit_code(), exit_codes::DIAGNOSTICS_RECORDED);
    assert_eq!(report.trail.last(), Some(&FlowState::Finished));
}

#[test]
fn context_is_clean_after_run() {
    let report = core_runner(Bootstrapper::new()).run(&["status"]);

    assert_eq!(report.context.depth(), 1);
    assert!(!report.context.contains(keys::COMMAND_NAME));
}

fn site_runner(cwd: &std::path::Path) -> Runner {
    Runner::new(
        standard_bootstrapper(BaseInitializer::new("1.2.0").with_cwd(cwd), None),
        Dispatcher::new(core_callbacks()),
    )
    .with_contributor(core_contributor())
}

#[test]
fn base_command_runs_when_full_phase_fails_in_site() {
    let site = create_test_site("require_paths: [public]\n");

    let report = site_runner(site.path()).run(&["version"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(text(&report), "1.2.0");
    assert_eq!(report.reached, Some(Phase::Configuration));
    assert_eq!(
        report.trail,
        vec![
            FlowState::Start,
            FlowState::BaseBootstrapped,
            FlowState::CommandResolved,
            FlowState::PhaseSatisfied,
            FlowState::Dispatched,
            FlowState::Finished,
        ]
    );
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn site_default_command_is_used() {
    let site = create_test_site("default_command: status\n");

    let empty: [&str; 0] = [];
    let report = site_runner(site.path()).run(&empty);

    assert_eq!(report.command.as_deref(), Some("status"));
    assert!(text(&report).contains("Phase:      full"));
    assert_eq!(report.reached, Some(Phase::Full));
}

#[test]
fn addon_commands_join_the_registry() {
    let site = create_test_site("");
    write_addon(
        site.path(),
        "cache.yaml",
        r#"
name: cache
commands:
  - name: cache.clear
    bootstrap: full
    description: Remove cached pages
    aliases: [cc]
    callback:
      builtin: core.version
"#,
    );

    let report = site_runner(site.path()).run(&["cc"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.command.as_deref(), Some("cache.clear"));
    assert_eq!(text(&report), "1.2.0");
}

#[test]
fn addon_cannot_shadow_core_without_override() {
    let site = create_test_site("");
    write_addon(
        site.path(),
        "mine.yaml",
        "commands:\n  - name: version\n    callback:\n      builtin: core.status\n",
    );

    let report = site_runner(site.path()).run(&["version"]);

    assert_eq!(text(&report), "1.2.0");
    assert!(report.diagnostics.has_code(codes::REGISTRY_COLLISION));
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn overriding_addon_replaces_core_command() {
    let site = create_test_site("");
    write_addon(
        site.path(),
        "mine.yaml",
        "override: true\ncommands:\n  - name: version\n    callback:\n      builtin: core.status\n",
    );

    let report = site_runner(site.path()).run(&["version"]);

    assert!(text(&report).starts_with("bootcli status"));
    assert!(report.diagnostics.has_code(codes::REGISTRY_OVERRIDE));
}

#[test]
fn invalid_manifest_is_a_warning_only() {
    let site = create_test_site("");
    write_addon(site.path(), "broken.yaml", "commands: [unclosed");

    let report = site_runner(site.path()).run(&["version"]);

    assert!(report.diagnostics.has_code(codes::ADDON_MANIFEST_INVALID));
    assert!(!report.diagnostics.has_errors());
    assert_eq!(report.exit_code(), exit_codes::SUCCESS);
}

#[test]
fn outside_a_site_base_commands_still_run() {
    let dir = TempDir::new().unwrap();

    let report = site_runner(dir.path()).run(&["version", "--minor"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(text(&report), "2");
    assert_eq!(report.reached, Some(Phase::Base));
    assert!(report.diagnostics.is_empty());
}

#[test]
fn site_env_is_torn_down() {
    let site = create_test_site("env:\n  APP_ENV: test\n");

    let report = site_runner(site.path()).run(&["version"]);

    assert_eq!(report.reached, Some(Phase::Full));
    assert!(!report.context.contains(keys::SITE_ENV));
}

#[cfg(unix)]
#[test]
fn exec_addon_runs_in_site_root() {
    let site = create_test_site("env:\n  GREETING: hello\n");
    write_addon(
        site.path(),
        "greet.yaml",
        r#"
commands:
  - name: greet
    bootstrap: full
    callback:
      exec: "sh -c 'echo \"$GREETING $0 $*\"' {command}"
"#,
    );
    std::fs::create_dir_all(site.path().join("nested")).unwrap();

    let report = site_runner(&site.path().join("nested")).run(&["greet", "world", "--loud"]);

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(text(&report), "hello greet world --loud");
}

#[cfg(unix)]
#[test]
fn exec_addon_failure_is_command_failed() {
    let site = create_test_site("");
    write_addon(
        site.path(),
        "fail.yaml",
        "commands:\n  - name: fail\n    callback:\n      exec: \"sh -c 'echo broken >&2; exit 3'\"\n",
    );

    let report = site_runner(site.path()).run(&["fail"]);

    assert_eq!(report.outcome, RunOutcome::CommandFailed);
    let failure = report.diagnostics.errors().next().unwrap();
    assert_eq!(failure.code, codes::COMMAND_FAILED);
    assert!(failure.message.contains("exited with code 3"));
    assert!(failure.message.contains("broken"));
}
