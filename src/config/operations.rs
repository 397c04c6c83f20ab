//! Config loading, validation, and utility operations.

use super::model::SiteConfig;
use crate::error::{BootcliError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

impl SiteConfig {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(SiteConfig)` - Successfully loaded and validated config
    /// * `Err(BootcliError::ConfigError)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            BootcliError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SiteConfig = if yaml.trim().is_empty() {
            SiteConfig::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| BootcliError::ConfigError(format!("failed to parse YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    #[cfg(test)]
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| BootcliError::ConfigError(format!("failed to serialize to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `addons_dir` and every `require_paths` entry must be relative and stay inside the root
    /// - `addon_patterns` must be non-empty and each must be a valid glob
    /// - `env` names must be non-empty and contain no `=`
    /// - `default_command` must be non-empty
    pub fn validate(&self) -> Result<()> {
        check_relative("addons_dir", &self.addons_dir)?;

        if self.addon_patterns.is_empty() {
            return Err(BootcliError::ConfigError(
                "validation failed: addon_patterns must not be empty".to_string(),
            ));
        }
        self.addon_matcher()?;

        for path in &self.require_paths {
            check_relative("require_paths", path)?;
        }

        for name in self.env.keys() {
            if name.is_empty() || name.contains('=') {
                return Err(BootcliError::ConfigError(format!(
                    "validation failed: invalid env variable name '{}'",
                    name
                )));
            }
        }

        if self.default_command.trim().is_empty() {
            return Err(BootcliError::ConfigError(
                "validation failed: default_command must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Compile `addon_patterns` into a matcher for manifest file names.
    pub fn addon_matcher(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.addon_patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                BootcliError::ConfigError(format!(
                    "validation failed: invalid addon pattern '{}': {}",
                    pattern, e
                ))
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| {
            BootcliError::ConfigError(format!("failed to build addon pattern set: {}", e))
        })
    }

    /// Absolute add-on directory for a site rooted at `root`.
    pub fn addons_path(&self, root: &Path) -> PathBuf {
        root.join(&self.addons_dir)
    }

    /// Site display name, falling back to the root directory name.
    pub fn display_name(&self, root: &Path) -> String {
        if !self.name.trim().is_empty() {
            return self.name.trim().to_string();
        }
        root.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string())
    }
}

/// Reject absolute paths and paths that climb out of the root.
fn check_relative(field: &str, value: &str) -> Result<()> {
    let path = Path::new(value);
    let escapes = path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if value.trim().is_empty() || escapes {
        return Err(BootcliError::ConfigError(format!(
            "validation failed: {} entry '{}' must be a relative path inside the site root",
            field, value
        )));
    }
    Ok(())
}
