//! URI templates with `{name}` placeholders used to address resources

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

/// Placeholder values captured from a matched URI, keyed by placeholder name.
pub type UriParams = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template must not be empty")]
    Empty,
    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },
    #[error("invalid placeholder name `{name}`")]
    InvalidPlaceholder { name: String },
    #[error("placeholder `{name}` appears more than once")]
    DuplicatePlaceholder { name: String },
    #[error("failed to compile template pattern")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct UriTemplate {
    raw: String,
    placeholders: Vec<String>,
    pattern: Regex,
}

impl UriTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if raw.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut placeholders: Vec<String> = Vec::new();
        let mut pattern = String::from("^");
        let mut rest = raw;
        let mut offset = 0;

        while let Some(open) = rest.find(['{', '}']) {
            if rest.as_bytes()[open] == b'}' {
                return Err(TemplateError::UnbalancedBrace {
                    position: offset + open,
                });
            }

            let close = rest[open + 1..]
                .find(['{', '}'])
                .map(|index| open + 1 + index)
                .filter(|index| rest.as_bytes()[*index] == b'}')
                .ok_or(TemplateError::UnbalancedBrace {
                    position: offset + open,
                })?;

            let name = &rest[open + 1..close];
            if !is_placeholder_name(name) {
                return Err(TemplateError::InvalidPlaceholder {
                    name: name.to_string(),
                });
            }
            if placeholders.iter().any(|existing| existing == name) {
                return Err(TemplateError::DuplicatePlaceholder {
                    name: name.to_string(),
                });
            }

            pattern.push_str(&regex::escape(&rest[..open]));
            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            placeholders.push(name.to_string());

            offset += close + 1;
            rest = &rest[close + 1..];
        }

        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        Ok(Self {
            raw: raw.to_string(),
            placeholders,
            pattern: Regex::new(&pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// A template without placeholders addresses exactly one URI.
    pub fn is_static(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Two templates are equivalent when they match the same set of URIs,
    /// regardless of how their placeholders are named.
    pub fn is_equivalent(&self, other: &UriTemplate) -> bool {
        self.shape() == other.shape()
    }

    pub fn matches(&self, uri: &str) -> Option<UriParams> {
        let captures = self.pattern.captures(uri)?;
        Some(
            self.placeholders
                .iter()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|value| (name.clone(), value.as_str().to_string()))
                })
                .collect(),
        )
    }

    fn shape(&self) -> String {
        self.placeholders
            .iter()
            .fold(self.raw.clone(), |shape, name| {
                shape.replace(&format!("{{{name}}}"), "{}")
            })
    }
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
