//! Site root discovery for bootcli.
//!
//! A site root is a directory containing `bootcli.yaml`. It is found by
//! walking up from the working directory, or given explicitly with `--root`.
//! Every path the later phases use is resolved against it.

use crate::config::CONFIG_FILE_NAME;
use crate::error::{BootcliError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Resolved paths for one site.
///
/// All paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    /// Directory holding `bootcli.yaml`.
    pub root: PathBuf,

    /// Absolute path to `bootcli.yaml`.
    pub config_path: PathBuf,
}

impl SiteRoot {
    /// Locate the site root from the current working directory.
    ///
    /// # Returns
    ///
    /// * `Ok(SiteRoot)` - Nearest ancestor (inclusive) holding `bootcli.yaml`
    /// * `Err(BootcliError::UserError)` - No ancestor holds one
    pub fn locate() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            BootcliError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        Self::locate_from(&cwd)
    }

    /// Locate the site root starting from a specific directory.
    pub fn locate_from<P: AsRef<Path>>(start: P) -> Result<Self> {
        let start = absolutize(start.as_ref())?;

        for dir in start.ancestors() {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Ok(Self {
                    root: dir.to_path_buf(),
                    config_path,
                });
            }
        }

        Err(BootcliError::UserError(format!(
            "no {} found in '{}' or any parent directory.\n\
             Run bootcli from inside a site, or pass --root <PATH>.",
            CONFIG_FILE_NAME,
            start.display()
        )))
    }

    /// Use `root` as the site root without searching.
    ///
    /// The directory must exist and hold `bootcli.yaml`.
    pub fn explicit<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = absolutize(root.as_ref())?;

        if !root.is_dir() {
            return Err(BootcliError::UserError(format!(
                "site root '{}' is not a directory",
                root.display()
            )));
        }

        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Err(BootcliError::UserError(format!(
                "site root '{}' has no {}",
                root.display(),
                CONFIG_FILE_NAME
            )));
        }

        Ok(Self { root, config_path })
    }

    /// Resolve `path` against the site root.
    #[cfg(test)]
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.root.join(path)
    }
}

/// Make `path` absolute against the working directory without touching symlinks.
fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| {
        BootcliError::UserError(format!("failed to get current working directory: {}", e))
    })?;
    Ok(cwd.join(path))
}
