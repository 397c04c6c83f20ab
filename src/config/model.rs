//! SiteConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for one site.
///
/// This struct represents the contents of `bootcli.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Display name of the site. Empty means "use the root directory name".
    pub name: String,

    // =========================================================================
    // Add-on settings
    // =========================================================================
    /// Directory holding add-on manifests, relative to the site root.
    #[serde(default = "default_addons_dir")]
    pub addons_dir: String,

    /// Globs selecting manifest files inside `addons_dir`.
    #[serde(default = "default_addon_patterns")]
    pub addon_patterns: Vec<String>,

    /// Whether add-on manifests may set `override: true`.
    #[serde(default = "default_true")]
    pub allow_addon_overrides: bool,

    // =========================================================================
    // Full bootstrap settings
    // =========================================================================
    /// Paths (relative to the root) that must exist for the `full` phase.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub require_paths: Vec<String>,

    /// Environment exported to `exec` callbacks.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    // =========================================================================
    // Dispatch settings
    // =========================================================================
    /// Command run when no command name is given.
    #[serde(default = "default_command")]
    pub default_command: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            addons_dir: default_addons_dir(),
            addon_patterns: default_addon_patterns(),
            allow_addon_overrides: default_true(),
            require_paths: Vec::new(),
            env: BTreeMap::new(),
            default_command: default_command(),
        }
    }
}
