//! Site configuration for bootcli.
//!
//! This module defines the [`SiteConfig`] struct that represents
//! `bootcli.yaml` at the site root. It supports forward-compatible YAML
//! parsing (unknown fields are ignored), defaults for every field, and
//! validation of config values.

mod model;
mod operations;
pub mod types;


pub use model::SiteConfig;
pub use types::CONFIG_FILE_NAME;
