//! Compiled rule representation.

use crate::resources::NormalizationTable;
use crate::sentence::SentenceContainer;
use crate::Category;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Which capture groups delimit the reported span of a match.
///
/// `group(0)-group(0)` (the default) reports the whole match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Offset {
    pub start_group: usize,
    pub end_group: usize,
}

impl Offset {
    pub const WHOLE_MATCH: Offset = Offset { start_group: 0, end_group: 0 };

    /// Parse `group(i)-group(j)`. Anything else yields `None`.
    pub fn parse(text: &str) -> Option<Offset> {
        let caps = regex!(r"^group\(([0-9]+)\)-group\(([0-9]+)\)$").captures(text.trim())?;
        Some(Offset { start_group: caps[1].parse().ok()?, end_group: caps[2].parse().ok()? })
    }

    /// Byte span selected from `caps`, relative to the searched text.
    ///
    /// `None` when either group did not participate in the match.
    pub fn span(&self, caps: &Captures<'_>) -> Option<(usize, usize)> {
        let start = caps.get(self.start_group)?.start();
        let end = caps.get(self.end_group)?.end();
        (start <= end).then_some((start, end))
    }
}

/// `group(N):regex:`: the token starting at group N must carry a POS tag
/// that fully matches `pattern`.
#[derive(Debug, Clone)]
pub struct PosConstraint {
    pub group: usize,
    /// Source text of the tag pattern, before anchoring.
    pub source: String,
    pub(crate) pattern: Regex,
}

impl PosConstraint {
    /// Whether the constraint holds for `caps` matched over `sentence`.
    ///
    /// Fails when the group did not participate, when no token starts at the
    /// group's position, or when that token has no tag.
    pub fn is_satisfied(&self, sentence: &SentenceContainer, caps: &Captures<'_>) -> bool {
        let Some(group) = caps.get(self.group) else {
            return false;
        };
        let Some(token) = sentence.token_starting_at(sentence.begin() + group.start()) else {
            return false;
        };
        token.pos.as_deref().is_some_and(|pos| self.pattern.is_match(pos))
    }
}

/// A single compiled extraction rule.
#[derive(Debug, Clone)]
pub struct RuleInstance {
    pub category: Category,
    pub name: String,
    /// Extraction pattern with variables expanded and spaces widened.
    pub pattern: Regex,
    pub fast_check: Option<Regex>,
    /// Value template, e.g. `group(1)-%normMonth(group(2))`.
    pub normalization: String,
    pub offset: Offset,
    pub quant: Option<String>,
    pub freq: Option<String>,
    pub modifier: Option<String>,
    pub empty_value: Option<String>,
    pub pos_constraints: Vec<PosConstraint>,
}

impl RuleInstance {
    /// `false` means the rule cannot match anywhere in `text` and the full
    /// pattern scan can be skipped.
    pub fn passes_fast_check(&self, text: &str) -> bool {
        self.fast_check.as_ref().is_none_or(|check| check.is_match(text))
    }

    pub fn check_pos_constraints(&self, sentence: &SentenceContainer, caps: &Captures<'_>) -> bool {
        self.pos_constraints.iter().all(|c| c.is_satisfied(sentence, caps))
    }
}

/// The compiled rules of one language, keyed by name within each category.
///
/// Immutable once built; shared between threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct RuleSet {
    by_category: [BTreeMap<String, RuleInstance>; 5],
    normalization: NormalizationTable,
}

impl RuleSet {
    pub(crate) fn new(normalization: NormalizationTable) -> Self {
        Self { by_category: Default::default(), normalization }
    }

    /// Insert `rule` unless its category already holds a rule of that name.
    /// Returns whether the rule was inserted.
    pub(crate) fn insert(&mut self, rule: RuleInstance) -> bool {
        let rules = &mut self.by_category[slot(rule.category)];
        if rules.contains_key(&rule.name) {
            return false;
        }
        rules.insert(rule.name.clone(), rule);
        true
    }

    pub(crate) fn contains(&self, category: Category, name: &str) -> bool {
        self.by_category[slot(category)].contains_key(name)
    }

    /// Rules of `category` in application order.
    pub fn rules(&self, category: Category) -> impl Iterator<Item = &RuleInstance> {
        self.by_category[slot(category)].values()
    }

    pub fn get(&self, category: Category, name: &str) -> Option<&RuleInstance> {
        self.by_category[slot(category)].get(name)
    }

    /// Every rule, category priority first, then name.
    pub fn iter(&self) -> impl Iterator<Item = &RuleInstance> {
        Category::PRIORITY_ORDER.into_iter().flat_map(move |c| self.rules(c))
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category[slot(category)].len()
    }

    pub fn len(&self) -> usize {
        self.by_category.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tables used when expanding value templates.
    pub fn normalization(&self) -> &NormalizationTable {
        &self.normalization
    }
}

fn slot(category: Category) -> usize {
    match category {
        Category::Date => 0,
        Category::Time => 1,
        Category::Duration => 2,
        Category::Set => 3,
        Category::Temponym => 4,
    }
}
