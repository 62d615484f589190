use crate::error::{Error, Result};
use std::collections::HashMap;

/// Lookup tables backing the `%normX(...)` functions in rule templates.
///
/// The resource format is a sequence of `[normX]` section headers, each
/// followed by `"surface","normalized"` lines.
#[derive(Debug, Clone, Default)]
pub struct NormalizationTable {
    functions: HashMap<String, HashMap<String, String>>,
}

impl NormalizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(resource: &str, text: &str) -> Result<Self> {
        let invalid = |line: usize, message: String| Error::InvalidResource {
            resource: resource.to_string(),
            line,
            message,
        };

        let mut table = Self::new();
        let mut current: Option<String> = None;
        for (line_no, line) in super::content_lines(text) {
            if let Some(caps) = regex!(r"^\[(norm[A-Za-z0-9]*)\]$").captures(line) {
                let name = caps[1].to_string();
                table.functions.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let Some(caps) = regex!(r#"^"(.*)"\s*,\s*"(.*)"$"#).captures(line) else {
                return Err(invalid(line_no, format!("expected \"surface\",\"normalized\", found {line:?}")));
            };
            let Some(function) = current.as_deref() else {
                return Err(invalid(line_no, "entry before the first [normX] section".to_string()));
            };
            table.insert(function, &caps[1], &caps[2]);
        }
        Ok(table)
    }

    pub fn insert(&mut self, function: &str, surface: impl Into<String>, normalized: impl Into<String>) {
        self.functions.entry(function.to_string()).or_default().insert(surface.into(), normalized.into());
    }

    /// Normalized form of `surface` under `function`: exact key first, then
    /// the lowercased key.
    pub fn lookup(&self, function: &str, surface: &str) -> Option<&str> {
        let entries = self.functions.get(function)?;
        entries
            .get(surface)
            .or_else(|| entries.get(&surface.to_lowercase()))
            .map(String::as_str)
    }

    pub fn has_function(&self, function: &str) -> bool {
        self.functions.contains_key(function)
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }
}
