//! Option token syntax.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^--?([A-Za-z][A-Za-z0-9_.-]*)(?:=(.*))?$").expect("Invalid option regex")
});

/// Value of a command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Given without a value, e.g. `--major`.
    Flag,
    /// Given as `--name=value`. The value may be empty.
    Value(String),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Flag => None,
            OptionValue::Value(value) => Some(value),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Flag => write!(f, "true"),
            OptionValue::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Flags serialize as `true`, values as strings.
impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            OptionValue::Flag => serializer.serialize_bool(true),
            OptionValue::Value(value) => serializer.serialize_str(value),
        }
    }
}

/// Parse one token as an option, `None` if it is not option syntax.
pub(super) fn parse_option(token: &str) -> Option<(String, OptionValue)> {
    let captures = OPTION_RE.captures(token)?;
    let name = captures.get(1)?.as_str().to_string();
    let value = match captures.get(2) {
        Some(value) => OptionValue::Value(value.as_str().to_string()),
        None => OptionValue::Flag,
    };
    Some((name, value))
}
