use crate::error::{Error, Result};
use std::collections::HashMap;

/// Named regex fragments that rule patterns reference as `%reName`.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    patterns: HashMap<String, String>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `name=value` lines. `//` comments and blank lines are skipped.
    /// Only the first `=` separates name from value, so values may contain `=`.
    pub fn parse(resource: &str, text: &str) -> Result<Self> {
        let mut table = Self::new();
        for (line_no, line) in super::content_lines(text) {
            let Some((name, value)) = line.split_once('=') else {
                return Err(Error::InvalidResource {
                    resource: resource.to_string(),
                    line: line_no,
                    message: format!("expected name=value, found {line:?}"),
                });
            };
            let name = name.trim();
            if !regex!(r"^[a-zA-Z][a-zA-Z0-9]*$").is_match(name) {
                return Err(Error::InvalidResource {
                    resource: resource.to_string(),
                    line: line_no,
                    message: format!("invalid pattern name {name:?}"),
                });
            }
            table.insert(name, value);
        }
        Ok(table)
    }

    /// Add or replace a pattern variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.patterns.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.patterns.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.patterns.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PatternTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}
