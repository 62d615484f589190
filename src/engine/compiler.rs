//! Rule text → [`RuleSet`] compilation.
//!
//! One rule per line:
//!
//! ```text
//! RULENAME="date_r0a",EXTRACTION="(%reYear4Digit)-(%reMonthNumber)",NORM_VALUE="group(1)-%normMonth(group(2))"
//! ```
//!
//! followed by any of `OFFSET`, `NORM_QUANT`, `NORM_FREQ`, `NORM_MOD`,
//! `POS_CONSTRAINT`, `EMPTY_VALUE` and `FAST_CHECK`, each as `FIELD="..."`.
//!
//! Lines that do not fit the grammar are skipped with a warning, and so are
//! later lines reusing a rule name within the same category. Problems in a
//! rule that does fit the grammar (unknown `%reX` variable, pattern that does
//! not compile) abort compilation.

use super::rule::{Offset, PosConstraint, RuleInstance, RuleSet};
use crate::error::{Error, Result};
use crate::resources::{NormalizationTable, PatternTable, content_lines};
use crate::Category;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// Replacement for each literal space in an expanded pattern.
const WHITESPACE_CLASS: &str = r"[\s\u{180E}]+";

/// Counters collected while compiling a rule set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CompileStats {
    /// Rules that made it into the set.
    pub compiled: usize,
    /// Non-comment lines that did not match the rule grammar.
    pub malformed: usize,
    /// Rules dropped because an earlier rule in the category had the same name.
    pub duplicates: usize,
}

/// Compile rule texts into a [`RuleSet`].
///
/// `sources` pairs each rule text with the category it defines; they are
/// compiled in category priority order regardless of the order given.
/// `%reX` references resolve against `patterns`, and `normalization` is
/// carried into the set for template expansion at extraction time.
pub fn compile_rules<'a>(
    sources: impl IntoIterator<Item = (Category, &'a str)>,
    patterns: &PatternTable,
    normalization: NormalizationTable,
) -> Result<(RuleSet, CompileStats)> {
    let mut sources: Vec<(Category, &str)> = sources.into_iter().collect();
    sources.sort_by_key(|(category, _)| *category);

    let mut set = RuleSet::new(normalization);
    let mut stats = CompileStats::default();

    for (category, text) in sources {
        for (line_no, line) in content_lines(text) {
            let Some(fields) = RuleFields::parse(line) else {
                warn!(category = %category, line = line_no, "skipping malformed rule line: {line}");
                stats.malformed += 1;
                continue;
            };
            if set.contains(category, fields.name) {
                warn!(category = %category, rule = fields.name, "duplicate rule name, keeping the first definition");
                stats.duplicates += 1;
                continue;
            }
            let rule = compile_rule(category, &fields, patterns)?;
            set.insert(rule);
            stats.compiled += 1;
        }
    }

    debug!(
        compiled = stats.compiled,
        malformed = stats.malformed,
        duplicates = stats.duplicates,
        "compiled rule set"
    );
    Ok((set, stats))
}

/// Raw string fields of one rule line.
#[derive(Debug, Default)]
struct RuleFields<'l> {
    name: &'l str,
    extraction: &'l str,
    norm_value: &'l str,
    offset: Option<&'l str>,
    quant: Option<&'l str>,
    freq: Option<&'l str>,
    modifier: Option<&'l str>,
    pos_constraint: Option<&'l str>,
    empty_value: Option<&'l str>,
    fast_check: Option<&'l str>,
}

impl<'l> RuleFields<'l> {
    fn parse(line: &'l str) -> Option<Self> {
        let caps = regex!(r#"RULENAME="(.*?)",EXTRACTION="(.*?)",NORM_VALUE="(.*?)"(.*)"#).captures(line)?;
        let text = |i: usize| caps.get(i).map_or("", |m| m.as_str());
        let rest = text(4);

        Some(Self {
            name: text(1),
            extraction: text(2),
            norm_value: text(3),
            offset: optional_field(rest, regex!(r#"OFFSET="(.*?)""#)),
            quant: optional_field(rest, regex!(r#"NORM_QUANT="(.*?)""#)),
            freq: optional_field(rest, regex!(r#"NORM_FREQ="(.*?)""#)),
            modifier: optional_field(rest, regex!(r#"NORM_MOD="(.*?)""#)),
            pos_constraint: optional_field(rest, regex!(r#"POS_CONSTRAINT="(.*?)""#)),
            empty_value: optional_field(rest, regex!(r#"EMPTY_VALUE="(.*?)""#)),
            fast_check: optional_field(rest, regex!(r#"FAST_CHECK="(.*?)""#)),
        })
    }
}

// A field given more than once takes its last value.
fn optional_field<'l>(rest: &'l str, field: &Regex) -> Option<&'l str> {
    field.captures_iter(rest).last().and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

fn compile_rule(category: Category, fields: &RuleFields<'_>, patterns: &PatternTable) -> Result<RuleInstance> {
    let name = fields.name;

    let expanded = expand_pattern(name, fields.extraction, patterns)?;
    let pattern = Regex::new(&expanded)
        .map_err(|source| Error::InvalidPattern { rule: name.to_string(), pattern: expanded.clone(), source })?;

    let fast_check = match fields.fast_check {
        Some(check) => {
            let expanded = expand_pattern(name, check, patterns)?;
            let compiled = Regex::new(&expanded)
                .map_err(|source| Error::InvalidPattern { rule: name.to_string(), pattern: expanded, source })?;
            Some(compiled)
        }
        None => None,
    };

    let offset = match fields.offset {
        Some(text) => Offset::parse(text).unwrap_or_else(|| {
            warn!(rule = name, "unparseable OFFSET {text:?}, using the whole match");
            Offset::WHOLE_MATCH
        }),
        None => Offset::WHOLE_MATCH,
    };

    let pos_constraints = match fields.pos_constraint {
        Some(text) => parse_pos_constraints(name, text)?,
        None => Vec::new(),
    };

    Ok(RuleInstance {
        category,
        name: name.to_string(),
        pattern,
        fast_check,
        normalization: fields.norm_value.to_string(),
        offset,
        quant: fields.quant.map(str::to_string),
        freq: fields.freq.map(str::to_string),
        modifier: fields.modifier.map(str::to_string),
        empty_value: fields.empty_value.map(str::to_string),
        pos_constraints,
    })
}

/// Substitute every `%reX` variable in one pass, then widen literal spaces.
///
/// All variable names are checked before anything is substituted, so an
/// unknown name is reported even if it appears after a known one.
pub(crate) fn expand_pattern(rule: &str, text: &str, patterns: &PatternTable) -> Result<String> {
    let variable = regex!(r"%(re[a-zA-Z0-9]*)");
    if let Some(unknown) = variable.captures_iter(text).map(|caps| caps[1].to_string()).find(|n| !patterns.contains(n))
    {
        return Err(Error::UnknownPattern { rule: rule.to_string(), name: unknown });
    }
    let substituted = variable.replace_all(text, |caps: &Captures<'_>| patterns.get(&caps[1]).unwrap_or("").to_string());
    Ok(substituted.replace(' ', WHITESPACE_CLASS))
}

/// Parse one or more `group(N):regex:` entries.
fn parse_pos_constraints(rule: &str, text: &str) -> Result<Vec<PosConstraint>> {
    let mut constraints = Vec::new();
    for caps in regex!(r"group\(([0-9]+)\):(.*?):").captures_iter(text) {
        let Ok(group) = caps[1].parse::<usize>() else {
            warn!(rule, "POS constraint group index out of range: {}", &caps[1]);
            continue;
        };
        let source = caps[2].to_string();
        let pattern = full_match_regex(&source)
            .map_err(|err| Error::InvalidConstraint { rule: rule.to_string(), pattern: source.clone(), source: err })?;
        constraints.push(PosConstraint { group, source, pattern });
    }
    if constraints.is_empty() {
        warn!(rule, "POS_CONSTRAINT {text:?} holds no group(N):tag: entries");
    }
    Ok(constraints)
}

/// Compile `pattern` so that it only matches an entire input.
pub(crate) fn full_match_regex(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}
