//! Diagnostics sink for bootcli.
//!
//! Bootstrap, registry assembly and dispatch all record structured
//! `(code, message)` pairs here instead of aborting. The sink is drained once
//! at process end by the output formatter.
//!
//! # Record Format
//!
//! Each record serializes to a single JSON object:
//! - `ts`: RFC3339 timestamp
//! - `code`: stable machine-readable code (see [`codes`])
//! - `message`: human-readable text
//! - `severity`: `error`, `warning` or `notice`
//! - `phase`: bootstrap phase the record belongs to, if any

use crate::bootstrap::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable diagnostic codes.
pub mod codes {
    pub const COMMAND_NOT_FOUND: &str = "COMMAND_NOT_FOUND";
    pub const COMMAND_NOT_EXECUTABLE: &str = "COMMAND_NOT_EXECUTABLE";
    pub const COMMAND_FAILED: &str = "COMMAND_FAILED";
    pub const COMMAND_PANICKED: &str = "COMMAND_PANICKED";
    pub const CALLBACK_NOT_FOUND: &str = "CALLBACK_NOT_FOUND";
    pub const UNKNOWN_OPTION: &str = "UNKNOWN_OPTION";
    pub const REGISTRY_COLLISION: &str = "REGISTRY_COLLISION";
    pub const REGISTRY_OVERRIDE: &str = "REGISTRY_OVERRIDE";
    pub const INVALID_COMMAND: &str = "INVALID_COMMAND";
    pub const TEARDOWN_FAILED: &str = "TEARDOWN_FAILED";
    pub const ADDON_MANIFEST_INVALID: &str = "ADDON_MANIFEST_INVALID";
    pub const USER_ERROR: &str = "USER_ERROR";
    pub const BOOTSTRAP_BASE_FAILED: &str = "BOOTSTRAP_BASE_FAILED";
    pub const BOOTSTRAP_ROOT_NOT_FOUND: &str = "BOOTSTRAP_ROOT_NOT_FOUND";
    pub const BOOTSTRAP_CONFIG_INVALID: &str = "BOOTSTRAP_CONFIG_INVALID";
    pub const BOOTSTRAP_FULL_FAILED: &str = "BOOTSTRAP_FULL_FAILED";
}

/// How much a diagnostic matters for the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, e.g. an intentional registry override.
    Notice,
    /// Something was dropped or skipped but the run can continue.
    Warning,
    /// Affects the exit status.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Notice => write!(f, "Notice"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
        }
    }
}

/// One recorded failure or notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// When the diagnostic was recorded.
    pub ts: DateTime<Utc>,

    /// Stable machine-readable code.
    pub code: String,

    /// Human-readable message.
    pub message: String,

    pub severity: Severity,

    /// Phase the record is attributed to, for bootstrap failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            code: code.into(),
            message: message.into(),
            severity,
            phase: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    pub fn notice(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Notice, code, message)
    }

    /// Attribute this diagnostic to a bootstrap phase.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Serialize to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}

/// Ordered, append-only collection of diagnostics for one run.
#[derive(Debug, Default, Clone)]
pub struct DiagnosticSink {
    records: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic and return a reference to the stored record.
    pub fn record(&mut self, diagnostic: Diagnostic) -> &Diagnostic {
        self.records.push(diagnostic);
        &self.records[self.records.len() - 1]
    }

    pub fn error(&mut self, code: impl Into<String>, message: impl Into<String>) -> &Diagnostic {
        self.record(Diagnostic::error(code, message))
    }

    pub fn warning(&mut self, code: impl Into<String>, message: impl Into<String>) -> &Diagnostic {
        self.record(Diagnostic::warning(code, message))
    }

    pub fn notice(&mut self, code: impl Into<String>, message: impl Into<String>) -> &Diagnostic {
        self.record(Diagnostic::notice(code, message))
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.records.extend(diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|d| d.severity == Severity::Error)
    }

    /// Whether a diagnostic with `code` was recorded, at any severity.
    pub fn has_code(&self, code: &str) -> bool {
        self.records.iter().any(|d| d.code == code)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}
