//! `{placeholder}` substitution for `exec` command templates.
//!
//! - `{name}` substitutes variable `name` (surrounding whitespace ignored)
//! - `{{` and `}}` render literal braces
//!
//! Unknown placeholders are an error rather than an empty string, so a typo
//! in a manifest never runs a half-rendered command.

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{name}' at position {position}")]
    UnknownPlaceholder { name: String, position: usize },

    #[error("unclosed '{{' at position {position}")]
    Unclosed { position: usize },

    #[error("empty placeholder '{{}}' at position {position}")]
    Empty { position: usize },
}

/// Render `template` with `variables`.
pub fn render(template: &str, variables: &BTreeMap<&str, String>) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                rendered.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, c)) => name.push(c),
                        None => return Err(TemplateError::Unclosed { position }),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::Empty { position });
                }
                let value = variables
                    .get(name)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder {
                        name: name.to_string(),
                        position,
                    })?;
                rendered.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                rendered.push('}');
            }
            _ => rendered.push(ch),
        }
    }

    Ok(rendered)
}
