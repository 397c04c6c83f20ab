//! Add-on command manifests.
//!
//! An add-on is a YAML file in the site's `addons_dir` whose file name
//! matches one of `addon_patterns`:
//!
//! ```yaml
//! name: cache
//! override: false
//! commands:
//!   - name: cache.clear
//!     bootstrap: full
//!     description: Remove cached pages
//!     aliases: [cc]
//!     callback:
//!       exec: "rm -rf {root}/var/cache"
//! ```
//!
//! Manifests are contributed in file-name order. A manifest that cannot be
//! read or parsed is skipped with an `ADDON_MANIFEST_INVALID` warning.

use crate::config::SiteConfig;
use crate::diagnostics::Diagnostic;
use crate::error::{BootcliError, Result};
use crate::registry::{CommandSpec, Contributor};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Parsed contents of one manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddonManifest {
    /// Contributor name. Defaults to the file stem.
    pub name: String,

    /// Replace colliding commands instead of being dropped.
    #[serde(rename = "override")]
    pub overrides: bool,

    pub commands: Vec<CommandSpec>,
}

impl AddonManifest {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            BootcliError::ManifestError(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            BootcliError::ManifestError(message) => {
                BootcliError::ManifestError(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
            .map_err(|e| BootcliError::ManifestError(format!("failed to parse YAML: {}", e)))
    }
}

/// Commands contributed by one manifest.
#[derive(Debug, Clone)]
pub struct AddonContributor {
    name: String,
    overrides: bool,
    commands: Vec<CommandSpec>,
}

impl AddonContributor {
    /// Contributor for `manifest`, named after the file at `path` when the
    /// manifest has no name.
    pub fn from_manifest(manifest: AddonManifest, path: &Path) -> Self {
        let name = if manifest.name.trim().is_empty() {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "addon".to_string())
        } else {
            manifest.name.trim().to_string()
        };
        Self {
            name,
            overrides: manifest.overrides,
            commands: manifest.commands,
        }
    }
}

impl Contributor for AddonContributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> Vec<CommandSpec> {
        self.commands.clone()
    }

    fn overrides(&self) -> bool {
        self.overrides
    }
}

/// Outcome of [`discover`].
#[derive(Debug, Clone, Default)]
pub struct AddonDiscovery {
    /// Valid manifests, in file-name order.
    pub contributors: Vec<AddonContributor>,
    /// Manifests that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

/// Load every add-on manifest of the site rooted at `root`.
///
/// A missing add-on directory means no add-ons.
pub fn discover(root: &Path, config: &SiteConfig) -> AddonDiscovery {
    let mut discovery = AddonDiscovery::default();
    let dir = config.addons_path(root);

    if !dir.is_dir() {
        debug!(dir = %dir.display(), "no add-on directory");
        return discovery;
    }

    let matcher = match config.addon_matcher() {
        Ok(matcher) => matcher,
        Err(e) => {
            discovery
                .diagnostics
                .push(Diagnostic::warning(e.code(), e.to_string()));
            return discovery;
        }
    };

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            let err = BootcliError::ManifestError(format!(
                "failed to read add-on directory '{}': {}",
                dir.display(),
                e
            ));
            discovery
                .diagnostics
                .push(Diagnostic::warning(err.code(), err.to_string()));
            return discovery;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .is_some_and(|file_name| matcher.is_match(Path::new(file_name)))
        })
        .collect();
    paths.sort();

    for path in paths {
        match AddonManifest::load(&path) {
            Ok(mut manifest) => {
                if manifest.overrides && !config.allow_addon_overrides {
                    warn!(manifest = %path.display(), "add-on overrides are disabled; flag ignored");
                    manifest.overrides = false;
                }
                let contributor = AddonContributor::from_manifest(manifest, &path);
                debug!(
                    addon = %contributor.name,
                    commands = contributor.commands.len(),
                    "add-on manifest loaded"
                );
                discovery.contributors.push(contributor);
            }
            Err(e) => {
                warn!(manifest = %path.display(), error = %e, "skipping add-on manifest");
                discovery
                    .diagnostics
                    .push(Diagnostic::warning(e.code(), e.to_string()));
            }
        }
    }

    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::codes;
    use crate::registry::CallbackRef;
    use crate::test_support::{create_test_site, write_addon};

    const CACHE_MANIFEST: &str = r#"
name: cache
commands:
  - name: cache.clear
    bootstrap: full
    description: Remove cached pages
    aliases: [cc]
    callback:
      exec: "rm -rf {root}/var/cache"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = AddonManifest::from_yaml(CACHE_MANIFEST).unwrap();

        assert_eq!(manifest.name, "cache");
        assert!(!manifest.overrides);
        assert_eq!(manifest.commands.len(), 1);
        let spec = &manifest.commands[0];
        assert_eq!(spec.bootstrap, crate::bootstrap::Phase::Full);
        assert_eq!(spec.aliases, vec!["cc"]);
        assert_eq!(
            spec.callback,
            CallbackRef::Exec("rm -rf {root}/var/cache".to_string())
        );
    }

    #[test]
    fn test_manifest_without_callback_is_invalid() {
        let err = AddonManifest::from_yaml("commands:\n  - name: broken\n").unwrap_err();
        assert_eq!(err.code(), codes::ADDON_MANIFEST_INVALID);
    }

    #[test]
    fn test_discover_without_addon_dir() {
        let site = create_test_site("");
        let discovery = discover(site.path(), &SiteConfig::default());

        assert!(discovery.contributors.is_empty());
        assert!(discovery.diagnostics.is_empty());
    }

    #[test]
    fn test_discover_in_file_name_order() {
        let site = create_test_site("");
        write_addon(site.path(), "zeta.yaml", "name: zeta\ncommands: []\n");
        write_addon(site.path(), "alpha.yml", "commands: []\n");
        write_addon(site.path(), "notes.txt", "not a manifest");

        let discovery = discover(site.path(), &SiteConfig::default());
        let names: Vec<&str> = discovery
            .contributors
            .iter()
            .map(|contributor| contributor.name())
            .collect();

        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(discovery.diagnostics.is_empty());
    }

    #[test]
    fn test_discover_skips_invalid_manifest() {
        let site = create_test_site("");
        write_addon(site.path(), "cache.yaml", CACHE_MANIFEST);
        write_addon(site.path(), "broken.yaml", "commands: [unclosed");

        let discovery = discover(site.path(), &SiteConfig::default());

        assert_eq!(discovery.contributors.len(), 1);
        assert_eq!(discovery.contributors[0].name(), "cache");
        assert_eq!(discovery.diagnostics.len(), 1);
        assert_eq!(discovery.diagnostics[0].code, codes::ADDON_MANIFEST_INVALID);
        assert!(discovery.diagnostics[0].message.contains("broken.yaml"));
    }

    #[test]
    fn test_override_flag_respects_config() {
        let site = create_test_site("");
        write_addon(site.path(), "theme.yaml", "name: theme\noverride: true\ncommands: []\n");

        let allowed = discover(site.path(), &SiteConfig::default());
        assert!(allowed.contributors[0].overrides());

        let config = SiteConfig {
            allow_addon_overrides: false,
            ..SiteConfig::default()
        };
        let denied = discover(site.path(), &config);
        assert!(!denied.contributors[0].overrides());
    }

    #[test]
    fn test_custom_patterns() {
        let site = create_test_site("");
        write_addon(site.path(), "deploy.cli.yaml", "commands: []\n");
        write_addon(site.path(), "other.yaml", "commands: []\n");

        let config = SiteConfig {
            addon_patterns: vec!["*.cli.yaml".to_string()],
            ..SiteConfig::default()
        };
        let discovery = discover(site.path(), &config);

        assert_eq!(discovery.contributors.len(), 1);
        assert_eq!(discovery.contributors[0].name(), "deploy.cli");
    }
}
