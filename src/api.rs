use crate::context::resolve_placeholders;
use crate::engine::{Extractor, RuleRepository, RuleSet, RunMetrics};
use crate::error::{Error, Result};
use crate::language::Language;
use crate::sentence::SentenceContainer;
use crate::{CategoryMask, Timex};
use chrono::NaiveDate;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Kind of document being tagged; decides how placeholders are anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentType {
    /// Relative expressions are read against the document creation time.
    News,
    /// Relative expressions are read against the last mentioned expression.
    #[default]
    Narrative,
}

impl FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "news" => Ok(DocumentType::News),
            "narrative" | "narratives" => Ok(DocumentType::Narrative),
            _ => Err(Error::UnknownDocumentType(s.to_string())),
        }
    }
}

/// Per-document context.
///
/// This holds what placeholder resolution needs beyond the text itself.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub document_type: DocumentType,
    /// Document creation time. Only consulted for [`DocumentType::News`].
    pub dct: Option<NaiveDate>,
}

/// Options that affect extraction and resolution.
#[derive(Debug, Clone)]
pub struct Options {
    /// Categories whose rules run. Temponyms are off unless asked for.
    pub categories: CategoryMask,
    /// Drop expressions whose span lies inside a longer (or higher-priority)
    /// one from the same sentence.
    pub drop_subsumed: bool,
    /// Rewrite `UNDEF-` values in [`Tagger::tag_document`].
    pub resolve_context: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { categories: CategoryMask::default(), drop_subsumed: true, resolve_context: true }
    }
}

/// Result from [`Tagger::tag_document`].
#[derive(Debug, Clone)]
pub struct TagResult {
    /// Expressions of every sentence, ordered by start offset.
    pub timexes: Vec<Timex>,
    pub metrics: RunMetrics,
}

/// Apply `rules` to one sentence.
///
/// Offsets in the result are document-absolute. Values are left exactly as the
/// rules produced them; see [`resolve_placeholders`] for the document pass.
///
/// # Example
/// ```
/// use timex::{Language, Options, RuleRepository, SentenceContainer, extract_sentence};
///
/// let rules = RuleRepository::global().get_rule_set(Language::English, false).unwrap();
/// let sentence = SentenceContainer::tokenize_simple("He was born in 1979.", 0);
/// let found = extract_sentence(&rules, &sentence, &Options::default());
/// assert_eq!(found[0].value, "1979");
/// ```
pub fn extract_sentence(rules: &RuleSet, sentence: &SentenceContainer, options: &Options) -> Vec<Timex> {
    Extractor::new(rules, sentence).run(options).0
}

/// A rule set bound to a language and a set of options.
///
/// Cheap to clone; the rule set is shared.
#[derive(Debug, Clone)]
pub struct Tagger {
    language: Language,
    rules: Arc<RuleSet>,
    options: Options,
}

impl Tagger {
    /// Tagger over the bundled rules of `language`, fetched from the global
    /// [`RuleRepository`]. Temponym rules are compiled in only when
    /// `options.categories` asks for them.
    pub fn new(language: Language, options: Options) -> Result<Self> {
        let include_temponyms = options.categories.contains(CategoryMask::TEMPONYM);
        let rules = RuleRepository::global().get_rule_set(language, include_temponyms)?;
        Ok(Self { language, rules, options })
    }

    /// Tagger over a caller-compiled rule set.
    pub fn with_rules(language: Language, rules: Arc<RuleSet>, options: Options) -> Self {
        Self { language, rules, options }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn tag_sentence(&self, sentence: &SentenceContainer) -> Vec<Timex> {
        extract_sentence(&self.rules, sentence, &self.options)
    }

    /// Extract every sentence, then resolve placeholders over the whole
    /// document (unless `resolve_context` is off).
    ///
    /// # Example
    /// ```
    /// use timex::{Context, DocumentType, Language, Options, SentenceContainer, Tagger};
    ///
    /// let tagger = Tagger::new(Language::English, Options::default()).unwrap();
    /// let sentences = SentenceContainer::split_document("It happened in March 2001. The next month was quiet.");
    /// let result = tagger.tag_document(&sentences, &Context::default());
    /// let values: Vec<&str> = result.timexes.iter().map(|t| t.value.as_str()).collect();
    /// assert_eq!(values, ["2001-03", "2001-04"]);
    /// ```
    pub fn tag_document(&self, sentences: &[SentenceContainer], context: &Context) -> TagResult {
        let started = Instant::now();
        let mut metrics = RunMetrics::default();
        let mut timexes = Vec::new();

        for sentence in sentences {
            let (found, sentence_metrics) = Extractor::new(&self.rules, sentence).run(&self.options);
            metrics.merge(&sentence_metrics);
            timexes.extend(found);
        }
        timexes.sort_by_key(|t: &Timex| t.begin);

        if self.options.resolve_context {
            let resolve_started = Instant::now();
            resolve_placeholders(&mut timexes, sentences, self.language, context);
            metrics.resolve = resolve_started.elapsed();
        }

        metrics.total = started.elapsed();
        debug!(
            language = self.language.name(),
            sentences = metrics.sentences,
            timexes = timexes.len(),
            unresolved = timexes.iter().filter(|t| !t.is_resolved()).count(),
            "document tagged"
        );
        TagResult { timexes, metrics }
    }
}
