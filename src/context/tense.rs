use crate::engine::full_match_regex;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::resources::PatternTable;
use crate::sentence::{SentenceContainer, Token};
use crate::Timex;
use regex::Regex;
use std::fmt;
use tracing::{trace, warn};

/// Grammatical tense governing an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tense {
    PresentFuture,
    Past,
    Future,
}

impl Tense {
    pub fn as_str(self) -> &'static str {
        match self {
            Tense::PresentFuture => "PRESENTFUTURE",
            Tense::Past => "PAST",
            Tense::Future => "FUTURE",
        }
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AUXILIARY_TAGS: &[&str] = &["VHZ", "VBZ", "VHP", "VBP", "VER:pres"];
const PARTICIPLE_TAGS: &[&str] = &["VVN", "VER:pper"];
// Participles that keep a present-perfect reading forward-looking.
const PROSPECTIVE_PARTICIPLES: &[&str] = &["expected", "scheduled"];
const PAST_MARKERS: &[&str] = &["since", "depuis"];

/// Per-language tag patterns, all matched against the whole POS value (or
/// token text for `future_word`). A language may leave any of them out.
#[derive(Debug, Default)]
pub(crate) struct TensePatterns {
    present_future: Option<Regex>,
    past: Option<Regex>,
    future: Option<Regex>,
    future_word: Option<Regex>,
}

impl TensePatterns {
    pub fn from_table(table: &PatternTable) -> Result<Self> {
        let compile = |name: &str| -> Result<Option<Regex>> {
            let Some(pattern) = table.get(name) else {
                return Ok(None);
            };
            full_match_regex(pattern).map(Some).map_err(|source| Error::InvalidPattern {
                rule: name.to_string(),
                pattern: pattern.to_string(),
                source,
            })
        };
        Ok(Self {
            present_future: compile("tensePos4PresentFuture")?,
            past: compile("tensePos4Past")?,
            future: compile("tensePos4Future")?,
            future_word: compile("tenseWord4Future")?,
        })
    }

    fn classify(&self, pos: Option<&str>, text: &str) -> Option<Tense> {
        let pos = pos?;
        let matches = |re: &Option<Regex>, s: &str| re.as_ref().is_some_and(|re| re.is_match(s));
        if matches(&self.present_future, pos) {
            Some(Tense::PresentFuture)
        } else if matches(&self.past, pos) {
            Some(Tense::Past)
        } else if matches(&self.future, pos) && matches(&self.future_word, text) {
            Some(Tense::Future)
        } else {
            None
        }
    }
}

/// Tense of the verbal context around `timex`, or `None` when nothing around
/// it is classifiable.
///
/// The nearest classifiable token before the expression decides; failing
/// that, the first classifiable token after it. "since"/"depuis" before the
/// expression force `Past`. A present tense followed by an auxiliary +
/// participle pair becomes `Past`, and in French a past tense next to
/// "prévu"/"envisagé" after a present-tense verb becomes `Future`.
pub fn get_last_tense(timex: &Timex, sentence: &SentenceContainer, language: Language) -> Option<Tense> {
    let patterns = match language.resources() {
        Ok(resources) => &resources.tense,
        Err(err) => {
            warn!(language = language.name(), "tense patterns unavailable: {err}");
            return None;
        }
    };
    classify_context(patterns, timex, sentence, language)
}

fn classify_context(
    patterns: &TensePatterns,
    timex: &Timex,
    sentence: &SentenceContainer,
    language: Language,
) -> Option<Tense> {
    let before: Vec<&Token> = sentence.tokens().iter().filter(|t| t.end < timex.begin).collect();
    let after: Vec<&Token> = sentence.tokens().iter().filter(|t| t.end > timex.end).collect();
    let text = |token: &Token| sentence.token_text(token);

    let mut tense = before
        .iter()
        .rev()
        .find_map(|&t| {
            if PAST_MARKERS.contains(&text(t)) {
                Some(Tense::Past)
            } else {
                patterns.classify(t.pos.as_deref(), text(t))
            }
        })
        .or_else(|| after.iter().find_map(|&t| patterns.classify(t.pos.as_deref(), text(t))))?;

    let is_perfect = |prev: &str, token: &Token| {
        AUXILIARY_TAGS.contains(&prev)
            && token.pos.as_deref().is_some_and(|pos| PARTICIPLE_TAGS.contains(&pos))
            && !PROSPECTIVE_PARTICIPLES.contains(&text(token))
    };
    let mut perfect_override = false;
    if tense == Tense::PresentFuture && (has_pair(&before, is_perfect) || has_pair(&after, is_perfect)) {
        trace!(begin = timex.begin, "auxiliary + participle, PRESENTFUTURE -> PAST");
        tense = Tense::Past;
        perfect_override = true;
    }

    if tense == Tense::Past && language == Language::French {
        let is_planned = |prev: &str, token: &Token| {
            prev == "VER:pres"
                && token.pos.as_deref() == Some("VER:pper")
                && regex!(r"^(?:prévue?s?|envisagée?s?)$").is_match(text(token))
        };
        if has_pair(&before, is_planned) || (!perfect_override && has_pair(&after, is_planned)) {
            trace!(begin = timex.begin, "planned participle, PAST -> FUTURE");
            tense = Tense::Future;
        }
    }

    Some(tense)
}

/// Whether some adjacent pair in `tokens` satisfies `pair(previous_tag, token)`.
fn has_pair(tokens: &[&Token], pair: impl Fn(&str, &Token) -> bool) -> bool {
    let mut prev = "";
    for &token in tokens {
        if pair(prev, token) {
            return true;
        }
        prev = token.pos.as_deref().unwrap_or("");
    }
    false
}
