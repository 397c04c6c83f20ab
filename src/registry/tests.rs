//! Tests for registry assembly and lookup.

use super::*;
use crate::bootstrap::Phase;
use crate::diagnostics::Severity;

fn core() -> StaticContributor {
    StaticContributor::new(
        "core",
        vec![
            CommandSpec::builtin("help", "core.help").description("Print this help message."),
            CommandSpec::builtin("version", "core.version")
                .option("major", "Print just the major version number.")
                .option("minor", "Print just the minor version number."),
        ],
    )
}

fn build(contributors: &[&dyn Contributor]) -> RegistryBuild {
    CommandRegistry::build(contributors.iter().copied())
}

fn codes_of(build: &RegistryBuild) -> Vec<&str> {
    build.diagnostics.iter().map(|d| d.code.as_str()).collect()
}

#[test]
fn lookup_by_name() {
    let core = core();
    let build = build(&[&core]);

    assert!(build.diagnostics.is_empty());
    assert_eq!(build.registry.len(), 2);
    let version = build.registry.lookup("version").unwrap();
    assert_eq!(version.source, "core");
    assert_eq!(version.required_phase, Phase::Base);
    assert!(version.declares_option("major"));
}

#[test]
fn lookup_missing_is_none() {
    let core = core();
    let build = build(&[&core]);
    assert!(build.registry.lookup("nonexistent-command").is_none());
    assert!(build.registry.lookup("").is_none());
}

#[test]
fn lookup_by_alias_resolves_to_canonical() {
    let addon = StaticContributor::new(
        "cache",
        vec![
            CommandSpec::builtin("cache.clear", "cache.clear")
                .alias("cc")
                .alias("cache-clear")
                .bootstrap(Phase::Full),
        ],
    );
    let build = build(&[&addon]);

    let by_alias = build.registry.lookup("cc").unwrap();
    assert_eq!(by_alias.name, "cache.clear");
    assert_eq!(build.registry.canonical_name("cache-clear"), Some("cache.clear"));
    assert_eq!(
        build.registry.lookup("cache.clear").unwrap().aliases,
        vec!["cache-clear".to_string(), "cc".to_string()]
    );
}

#[test]
fn self_alias_and_duplicate_aliases_are_dropped_silently() {
    let addon = StaticContributor::new(
        "addon",
        vec![
            CommandSpec::builtin("sync", "addon.sync")
                .alias("sync")
                .alias("s")
                .alias("s"),
        ],
    );
    let build = build(&[&addon]);

    assert!(build.diagnostics.is_empty());
    assert_eq!(build.registry.lookup("sync").unwrap().aliases, vec!["s".to_string()]);
}

#[test]
fn duplicate_name_keeps_first_registration() {
    let core = core();
    let addon = StaticContributor::new(
        "addon",
        vec![CommandSpec::builtin("help", "addon.help").description("Addon help")],
    );
    let build = build(&[&core, &addon]);

    let help = build.registry.lookup("help").unwrap();
    assert_eq!(help.source, "core");
    assert_eq!(help.callback, CallbackRef::Builtin("core.help".to_string()));

    assert_eq!(codes_of(&build), vec![codes::REGISTRY_COLLISION]);
    let message = &build.diagnostics[0].message;
    assert!(message.contains("'core'"));
    assert!(message.contains("'addon'"));
    assert_eq!(build.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn alias_colliding_with_existing_name_drops_later_command() {
    let core = core();
    let addon = StaticContributor::new(
        "addon",
        vec![CommandSpec::builtin("info", "addon.info").alias("version")],
    );
    let build = build(&[&core, &addon]);

    assert!(build.registry.lookup("info").is_none());
    assert_eq!(build.registry.lookup("version").unwrap().source, "core");
    assert_eq!(codes_of(&build), vec![codes::REGISTRY_COLLISION]);
}

#[test]
fn name_colliding_with_existing_alias_is_dropped() {
    let first = StaticContributor::new(
        "first",
        vec![CommandSpec::builtin("status", "first.status").alias("st")],
    );
    let second = StaticContributor::new("second", vec![CommandSpec::builtin("st", "second.st")]);
    let build = build(&[&first, &second]);

    assert_eq!(build.registry.lookup("st").unwrap().name, "status");
    assert_eq!(build.registry.len(), 1);
    assert_eq!(codes_of(&build), vec![codes::REGISTRY_COLLISION]);
}

#[test]
fn override_capable_contributor_replaces_earlier_command() {
    let core = core();
    let site = StaticContributor::new(
        "site",
        vec![CommandSpec::builtin("help", "site.help").alias("h")],
    )
    .overriding(true);
    let build = build(&[&core, &site]);

    let help = build.registry.lookup("help").unwrap();
    assert_eq!(help.source, "site");
    assert_eq!(build.registry.lookup("h").unwrap().source, "site");
    assert_eq!(codes_of(&build), vec![codes::REGISTRY_OVERRIDE]);
    assert_eq!(build.diagnostics[0].severity, Severity::Notice);
}

#[test]
fn override_removes_replaced_aliases() {
    let first = StaticContributor::new(
        "first",
        vec![CommandSpec::builtin("deploy", "first.deploy").alias("d").alias("ship")],
    );
    let second = StaticContributor::new(
        "second",
        vec![CommandSpec::builtin("deploy", "second.deploy").alias("d")],
    )
    .overriding(true);
    let build = build(&[&first, &second]);

    assert!(build.registry.lookup("ship").is_none());
    assert_eq!(build.registry.lookup("d").unwrap().source, "second");
}

#[test]
fn invalid_names_are_rejected() {
    let addon = StaticContributor::new(
        "addon",
        vec![
            CommandSpec::builtin("", "addon.empty"),
            CommandSpec::builtin("--flag", "addon.flag"),
            CommandSpec::builtin("ok", "addon.ok").alias("bad alias"),
            CommandSpec::builtin("db:dump", "addon.dump"),
        ],
    );
    let build = build(&[&addon]);

    assert_eq!(build.registry.len(), 1);
    assert!(build.registry.lookup("db:dump").is_some());
    assert_eq!(
        codes_of(&build),
        vec![codes::INVALID_COMMAND, codes::INVALID_COMMAND, codes::INVALID_COMMAND]
    );
}

#[test]
fn build_is_deterministic() {
    let core = core();
    let addon = StaticContributor::new(
        "addon",
        vec![
            CommandSpec::builtin("help", "addon.help"),
            CommandSpec::builtin("zeta", "addon.zeta").alias("z"),
            CommandSpec::builtin("alpha", "addon.alpha").alias("a"),
        ],
    );

    let first = build(&[&core, &addon]);
    let second = build(&[&core, &addon]);

    let names = |b: &RegistryBuild| b.registry.commands().map(|c| c.name.clone()).collect::<Vec<_>>();
    let aliases = |b: &RegistryBuild| {
        b.registry
            .aliases()
            .map(|(a, n)| (a.to_string(), n.to_string()))
            .collect::<Vec<_>>()
    };
    let diags = |b: &RegistryBuild| {
        b.diagnostics
            .iter()
            .map(|d| (d.code.clone(), d.message.clone()))
            .collect::<Vec<_>>()
    };

    assert_eq!(names(&first), names(&second));
    assert_eq!(aliases(&first), aliases(&second));
    assert_eq!(diags(&first), diags(&second));
    assert_eq!(names(&first), vec!["alpha", "help", "version", "zeta"]);
}

#[test]
fn every_alias_maps_to_one_existing_command() {
    let first = StaticContributor::new(
        "first",
        vec![
            CommandSpec::builtin("a", "a").alias("x"),
            CommandSpec::builtin("b", "b").alias("y"),
        ],
    );
    let second = StaticContributor::new(
        "second",
        vec![
            CommandSpec::builtin("c", "c").alias("x"),
            CommandSpec::builtin("y", "y"),
            CommandSpec::builtin("d", "d").alias("a"),
        ],
    );
    let build = build(&[&first, &second]);

    for (alias, canonical) in build.registry.aliases() {
        let descriptor = build.registry.lookup(alias).unwrap();
        assert_eq!(descriptor.name, canonical);
        assert!(build.registry.lookup(canonical).is_some());
        let alias_is_other_name = build
            .registry
            .commands()
            .any(|c| c.name == alias && c.name != canonical);
        assert!(!alias_is_other_name);
    }
    assert_eq!(build.diagnostics.len(), 3);
}

#[test]
fn command_spec_deserializes_from_yaml() {
    let yaml = r#"
name: cache.clear
bootstrap: full
description: Clear caches
arguments: [bin]
options:
  all: Clear every bin
aliases: [cc]
callback:
  exec: "rm -rf {root}/cache"
examples:
  - usage: bootcli cc
    explanation: Clear the default bin
"#;
    let spec: CommandSpec = serde_yaml::from_str(yaml).unwrap();

    assert_eq!(spec.bootstrap, Phase::Full);
    assert_eq!(spec.arguments, vec!["bin".to_string()]);
    assert_eq!(spec.callback, CallbackRef::Exec("rm -rf {root}/cache".to_string()));
    assert_eq!(spec.examples[0].usage, "bootcli cc");
    assert!(!spec.strict_options);
}

#[test]
fn command_spec_defaults_to_base_phase() {
    let yaml = "name: hello\ncallback:\n  builtin: core.help\n";
    let spec: CommandSpec = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(spec.bootstrap, Phase::Base);
    assert!(spec.aliases.is_empty());
}

#[test]
fn command_spec_callback_serializes_as_map() {
    let spec = CommandSpec::builtin("hello", "core.help");

    let yaml = serde_yaml::to_string(&spec).unwrap();

    assert!(yaml.contains("callback:\n  builtin: core.help"));
    assert!(!yaml.contains('!'));
    let parsed: CommandSpec = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed, spec);
}
