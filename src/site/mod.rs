//! The host environment bootcli bootstraps.
//!
//! A site is a directory tree rooted at a `bootcli.yaml`. Its phases:
//!
//! | Phase | Work | Context keys | Failure code |
//! |---|---|---|---|
//! | `base` | process facts | `cli.version`, `cli.cwd`, `cli.host`, `cli.user` | `BOOTSTRAP_BASE_FAILED` |
//! | `root` | locate the site root | `site.root` | `BOOTSTRAP_ROOT_NOT_FOUND` |
//! | `configuration` | load `bootcli.yaml` | `site.config`, `site.name` | `BOOTSTRAP_CONFIG_INVALID` |
//! | `full` | check `require_paths`, export `env` | `site.env` | `BOOTSTRAP_FULL_FAILED` |
//!
//! Add-on manifests are only read once `full` has been reached.

pub mod addons;
mod initializers;
mod root;


pub use addons::{AddonContributor, AddonDiscovery, AddonManifest, discover};
pub use initializers::{
    BaseInitializer, ConfigurationInitializer, FullInitializer, RootInitializer,
};
pub use root::SiteRoot;

use crate::bootstrap::{Bootstrapper, Phase};
use crate::config::SiteConfig;
use crate::context::{ContextStore, keys};
use std::path::PathBuf;

/// Bootstrapper with the four site phases wired in.
pub fn standard_bootstrapper(base: BaseInitializer, explicit_root: Option<PathBuf>) -> Bootstrapper {
    Bootstrapper::new()
        .with_initializer(Phase::Base, base)
        .with_initializer(Phase::Root, RootInitializer::new(explicit_root))
        .with_initializer(Phase::Configuration, ConfigurationInitializer)
        .with_initializer(Phase::Full, FullInitializer)
}

/// Site root recorded by the `root` phase.
pub fn site_root(context: &ContextStore) -> Option<PathBuf> {
    context.get_str(keys::SITE_ROOT).map(PathBuf::from)
}

/// Configuration recorded by the `configuration` phase.
pub fn site_config(context: &ContextStore) -> Option<SiteConfig> {
    context.get_as(keys::SITE_CONFIG)
}
