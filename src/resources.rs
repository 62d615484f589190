//! Rule resources: pattern variables, normalization functions and the
//! per-language bundles compiled into the binary.

mod bundled;
mod normalization;
mod patterns;

pub use normalization::NormalizationTable;
pub use patterns::PatternTable;

use crate::Category;
use crate::context::TensePatterns;
use crate::error::Result;
use crate::language::Language;
use once_cell::sync::OnceCell;
use tracing::debug;

/// Everything a language contributes besides the rule texts themselves.
#[derive(Debug)]
pub(crate) struct LanguageResources {
    pub patterns: PatternTable,
    pub normalization: NormalizationTable,
    pub tense: TensePatterns,
    bundle: &'static bundled::Bundle,
}

impl LanguageResources {
    fn parse(language: Language) -> Result<Self> {
        let bundle = bundled::bundle(language);
        let patterns = PatternTable::parse(&format!("{}/patterns", language.name()), bundle.patterns)?;
        let normalization =
            NormalizationTable::parse(&format!("{}/normalization", language.name()), bundle.normalization)?;
        let tense = TensePatterns::from_table(&patterns)?;
        debug!(
            language = language.name(),
            patterns = patterns.len(),
            functions = normalization.function_count(),
            "loaded language resources"
        );
        Ok(Self { patterns, normalization, tense, bundle })
    }

    /// Raw rule text for `category`.
    pub fn rules(&self, category: Category) -> &'static str {
        self.bundle.rules(category)
    }
}

static ENGLISH: OnceCell<LanguageResources> = OnceCell::new();
static GERMAN: OnceCell<LanguageResources> = OnceCell::new();
static FRENCH: OnceCell<LanguageResources> = OnceCell::new();

pub(crate) fn load(language: Language) -> Result<&'static LanguageResources> {
    let cell = match language {
        Language::English => &ENGLISH,
        Language::German => &GERMAN,
        Language::French => &FRENCH,
    };
    cell.get_or_try_init(|| LanguageResources::parse(language))
}

/// Strip `//` comment lines and blank lines, keeping 1-based line numbers.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("//"))
}
