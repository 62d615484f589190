#[macro_use]
mod macros;
mod api;
mod calendar;
mod context;
mod engine;
mod error;
mod language;
mod resources;
mod sentence;

pub use api::{Context, DocumentType, Options, TagResult, Tagger, extract_sentence};
pub use context::{Granularity, Tense, get_last_mentioned_x, get_last_tense, resolve_placeholders};
pub use engine::{
    CategoryMetrics, CompileStats, Offset, PosConstraint, RuleInstance, RuleRepository, RuleSet, RunMetrics,
    check_prefix_suffix, check_sentence_match, check_token_boundaries, compile_rules,
};
pub use error::{Error, Result};
pub use language::Language;
pub use resources::{NormalizationTable, PatternTable};
pub use sentence::{SentenceContainer, Token};

// --- Categories -------------------------------------------------------------

/// The kind of temporal expression a rule produces.
///
/// Variants are declared in application priority order: rules of an earlier
/// category claim a span before rules of a later one are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Date,
    Time,
    Duration,
    Set,
    Temponym,
}

impl Category {
    /// All categories, highest priority first.
    pub const PRIORITY_ORDER: [Category; 5] =
        [Category::Date, Category::Time, Category::Duration, Category::Set, Category::Temponym];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Date => "DATE",
            Category::Time => "TIME",
            Category::Duration => "DURATION",
            Category::Set => "SET",
            Category::Temponym => "TEMPONYM",
        }
    }

    /// Name of the rule resource holding this category's definitions.
    pub fn resource_name(self) -> &'static str {
        match self {
            Category::Date => "daterules",
            Category::Time => "timerules",
            Category::Duration => "durationrules",
            Category::Set => "setrules",
            Category::Temponym => "temponymrules",
        }
    }

    pub fn mask(self) -> CategoryMask {
        match self {
            Category::Date => CategoryMask::DATE,
            Category::Time => CategoryMask::TIME,
            Category::Duration => CategoryMask::DURATION,
            Category::Set => CategoryMask::SET,
            Category::Temponym => CategoryMask::TEMPONYM,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Per-category enable flags for an extraction run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategoryMask: u8 {
        const DATE     = 1 << 0;
        const TIME     = 1 << 1;
        const DURATION = 1 << 2;
        const SET      = 1 << 3;
        const TEMPONYM = 1 << 4;
    }
}

impl Default for CategoryMask {
    fn default() -> Self {
        CategoryMask::DATE | CategoryMask::TIME | CategoryMask::DURATION | CategoryMask::SET
    }
}

// --- Output -----------------------------------------------------------------

/// A temporal expression found in a sentence.
///
/// `begin`/`end` are document-absolute byte offsets. `value` may still carry
/// `UNDEF-` placeholders until [`resolve_placeholders`] has run over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timex {
    pub category: Category,
    /// Normalized value.
    pub value: String,
    /// Start byte index (inclusive).
    pub begin: usize,
    /// End byte index (exclusive).
    pub end: usize,
    pub quant: Option<String>,
    pub freq: Option<String>,
    pub modifier: Option<String>,
    /// Value substituted by consumers when `value` comes out empty.
    pub empty_value: Option<String>,
    /// Name of the rule that produced this expression.
    pub rule: String,
}

impl Timex {
    /// Slice of `text` covered by this expression. `text` must be the full
    /// document the offsets were computed against.
    pub fn covered_text<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.begin..self.end).unwrap_or("")
    }

    pub fn is_resolved(&self) -> bool {
        !self.value.contains("UNDEF")
    }
}
