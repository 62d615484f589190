//! Process-wide cache of compiled rule sets.
//!
//! Each `(language, temponyms)` key maps to a cell that is filled at most
//! once. The map lock is only held while looking up or inserting the cell;
//! compilation runs outside it, so building one language never blocks readers
//! of another. Callers racing on the same key block until the first builder
//! publishes, then share the same `Arc`.

use super::compiler::compile_rules;
use super::rule::RuleSet;
use crate::error::Result;
use crate::language::Language;
use crate::Category;
use once_cell::sync::{Lazy, OnceCell};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::info;

type CacheKey = (Language, bool);

#[derive(Debug, Default)]
pub struct RuleRepository {
    cells: Mutex<HashMap<CacheKey, Arc<OnceCell<Arc<RuleSet>>>>>,
}

static GLOBAL: Lazy<RuleRepository> = Lazy::new(RuleRepository::new);

impl RuleRepository {
    /// An empty repository. Most callers want [`RuleRepository::global`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static RuleRepository {
        &GLOBAL
    }

    /// The compiled rules for `language`, building them on first request.
    ///
    /// Temponym rules are only compiled in when `include_temponym_rules` is
    /// set; the two variants are cached separately. A failed build is not
    /// cached and is retried by the next caller.
    pub fn get_rule_set(&self, language: Language, include_temponym_rules: bool) -> Result<Arc<RuleSet>> {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry((language, include_temponym_rules)).or_default())
        };
        let rules = cell.get_or_try_init(|| build(language, include_temponym_rules))?;
        Ok(Arc::clone(rules))
    }

    /// Whether the set for this key has already been published.
    pub fn is_cached(&self, language: Language, include_temponym_rules: bool) -> bool {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.get(&(language, include_temponym_rules)).is_some_and(|cell| cell.get().is_some())
    }
}

fn build(language: Language, include_temponym_rules: bool) -> Result<Arc<RuleSet>> {
    let started = Instant::now();
    let resources = language.resources()?;
    let sources = Category::PRIORITY_ORDER
        .into_iter()
        .filter(|category| include_temponym_rules || *category != Category::Temponym)
        .map(|category| (category, resources.rules(category)));

    let (rules, stats) = compile_rules(sources, &resources.patterns, resources.normalization.clone())?;
    info!(
        language = language.name(),
        temponyms = include_temponym_rules,
        rules = stats.compiled,
        malformed = stats.malformed,
        duplicates = stats.duplicates,
        elapsed = ?started.elapsed(),
        "published rule set"
    );
    Ok(Arc::new(rules))
}
