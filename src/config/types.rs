//! Constants and default value functions used by [`SiteConfig`](super::SiteConfig).

/// File that marks a directory as a site root.
pub const CONFIG_FILE_NAME: &str = "bootcli.yaml";

// Default value functions for serde
pub(crate) fn default_addons_dir() -> String {
    "addons".to_string()
}
pub(crate) fn default_addon_patterns() -> Vec<String> {
    vec!["*.yaml".to_string(), "*.yml".to_string()]
}
pub(crate) fn default_command() -> String {
    "help".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
