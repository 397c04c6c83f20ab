//! Phase initializers for a bootcli site.

use super::root::SiteRoot;
use crate::bootstrap::{PhaseFailure, PhaseInitializer};
use crate::config::SiteConfig;
use crate::context::{ContextStore, keys};
use crate::diagnostics::codes;
use std::path::PathBuf;
use tracing::debug;

/// `base`: process facts every command may rely on.
#[derive(Debug, Clone)]
pub struct BaseInitializer {
    version: String,
    /// Working directory to record instead of the process one.
    cwd: Option<PathBuf>,
}

impl BaseInitializer {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            cwd: None,
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl PhaseInitializer for BaseInitializer {
    fn initialize(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure> {
        let cwd = match &self.cwd {
            Some(cwd) => cwd.clone(),
            None => std::env::current_dir().map_err(|e| {
                PhaseFailure::new(
                    codes::BOOTSTRAP_BASE_FAILED,
                    format!("failed to get current working directory: {}", e),
                )
            })?,
        };

        context.set(keys::CLI_VERSION, self.version.clone());
        context.set(keys::CLI_CWD, cwd.to_string_lossy().into_owned());
        context.set(keys::CLI_HOST, host_name());
        context.set(keys::CLI_USER, user_name());
        Ok(())
    }
}

fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// `root`: locate the site root.
///
/// Searches upward from `cli.cwd` unless an explicit root was given.
#[derive(Debug, Clone, Default)]
pub struct RootInitializer {
    explicit: Option<PathBuf>,
}

impl RootInitializer {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl PhaseInitializer for RootInitializer {
    fn initialize(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure> {
        let located = match &self.explicit {
            Some(root) => SiteRoot::explicit(root),
            None => match context.get_str(keys::CLI_CWD) {
                Some(cwd) => SiteRoot::locate_from(cwd),
                None => SiteRoot::locate(),
            },
        };
        let site = located
            .map_err(|e| PhaseFailure::new(codes::BOOTSTRAP_ROOT_NOT_FOUND, e.to_string()))?;

        debug!(root = %site.root.display(), "site root located");
        context.set(keys::SITE_ROOT, site.root.to_string_lossy().into_owned());
        Ok(())
    }
}

/// `configuration`: load and validate `bootcli.yaml`.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationInitializer;

impl PhaseInitializer for ConfigurationInitializer {
    fn initialize(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure> {
        let root = super::site_root(context).ok_or_else(|| {
            PhaseFailure::new(
                codes::BOOTSTRAP_CONFIG_INVALID,
                "site root is not known; cannot load configuration",
            )
        })?;
        let site = SiteRoot::explicit(&root)
            .map_err(|e| PhaseFailure::new(codes::BOOTSTRAP_CONFIG_INVALID, e.to_string()))?;

        let config = SiteConfig::load(&site.config_path)
            .map_err(|e| PhaseFailure::new(e.code(), e.to_string()))?;
        let value = serde_json::to_value(&config).map_err(|e| {
            PhaseFailure::new(
                codes::BOOTSTRAP_CONFIG_INVALID,
                format!("failed to store configuration: {}", e),
            )
        })?;

        context.set(keys::SITE_NAME, config.display_name(&root));
        context.set(keys::SITE_CONFIG, value);
        Ok(())
    }
}

/// `full`: check required paths and export the site environment.
///
/// Teardown removes the keys this phase set.
#[derive(Debug, Clone, Default)]
pub struct FullInitializer;

impl PhaseInitializer for FullInitializer {
    fn initialize(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure> {
        let (Some(root), Some(config)) = (super::site_root(context), super::site_config(context))
        else {
            return Err(PhaseFailure::new(
                codes::BOOTSTRAP_FULL_FAILED,
                "site configuration is not loaded",
            ));
        };

        let missing: Vec<&str> = config
            .require_paths
            .iter()
            .filter(|path| !root.join(path).exists())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(PhaseFailure::new(
                codes::BOOTSTRAP_FULL_FAILED,
                format!(
                    "required path(s) missing under '{}': {}",
                    root.display(),
                    missing.join(", ")
                ),
            ));
        }

        let env: serde_json::Map<String, serde_json::Value> = config
            .env
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect();
        debug!(vars = env.len(), "site environment exported");
        context.set(keys::SITE_ENV, env);
        Ok(())
    }

    fn teardown(&mut self, context: &mut ContextStore) -> Result<(), PhaseFailure> {
        context.remove(keys::SITE_ENV);
        Ok(())
    }
}
