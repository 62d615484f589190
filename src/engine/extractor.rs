//! Rule application over one sentence.
//!
//! ```text
//! for category in DATE, TIME, DURATION, SET, TEMPONYM (enabled only)
//!   for rule in category (name order)
//!     fast check ── fail ──> skip rule
//!     for match in pattern.captures_iter(sentence)
//!       offset span ── group missing ──> skip match
//!       prefix/suffix + token boundaries ── fail ──> skip match
//!       POS constraints ── fail ──> skip match
//!       expand template, emit Timex
//! drop subsumed spans (optional), order by start
//! ```

use super::boundaries::check_sentence_match;
use super::metrics::{CategoryMetrics, RunMetrics};
use super::rule::{RuleInstance, RuleSet};
use super::template::expand;
use crate::sentence::SentenceContainer;
use crate::{Category, Options, Timex};
use std::cmp::Reverse;
use std::time::Instant;
use tracing::trace;

/// Applies a [`RuleSet`] to a single sentence.
#[derive(Debug)]
pub(crate) struct Extractor<'a> {
    rules: &'a RuleSet,
    sentence: &'a SentenceContainer,
}

/// A Timex plus the position of the rule that produced it, for stable ordering.
struct Candidate {
    timex: Timex,
    order: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(rules: &'a RuleSet, sentence: &'a SentenceContainer) -> Self {
        Self { rules, sentence }
    }

    pub fn run(&self, options: &Options) -> (Vec<Timex>, RunMetrics) {
        let started = Instant::now();
        let mut metrics = RunMetrics { sentences: 1, ..Default::default() };
        let mut found: Vec<Candidate> = Vec::new();
        let mut order = 0;

        for category in Category::PRIORITY_ORDER {
            if !options.categories.contains(category.mask()) {
                continue;
            }
            let category_started = Instant::now();
            let mut category_metrics = CategoryMetrics::new(category);
            for rule in self.rules.rules(category) {
                self.apply_rule(rule, order, &mut found, &mut category_metrics);
                order += 1;
            }
            category_metrics.duration = category_started.elapsed();
            metrics.categories.push(category_metrics);
        }

        let timexes = if options.drop_subsumed {
            let before = found.len();
            let kept = drop_subsumed(found);
            metrics.subsumed = before - kept.len();
            kept
        } else {
            found.sort_by_key(|c| c.timex.begin);
            found.into_iter().map(|c| c.timex).collect()
        };

        metrics.total = started.elapsed();
        (timexes, metrics)
    }

    fn apply_rule(&self, rule: &RuleInstance, order: usize, out: &mut Vec<Candidate>, metrics: &mut CategoryMetrics) {
        metrics.rules_considered += 1;
        let text = self.sentence.text();
        if !rule.passes_fast_check(text) {
            metrics.fast_rejected += 1;
            return;
        }

        for caps in rule.pattern.captures_iter(text) {
            metrics.candidates += 1;

            let Some((start, end)) = rule.offset.span(&caps).filter(|(start, end)| start < end) else {
                trace!(rule = %rule.name, "offset groups missing from match, skipping");
                metrics.rejected_offset += 1;
                continue;
            };
            if !check_sentence_match(self.sentence, start, end) {
                trace!(rule = %rule.name, start, end, "boundary check rejected {:?}", &text[start..end]);
                metrics.rejected_boundary += 1;
                continue;
            }
            if !rule.check_pos_constraints(self.sentence, &caps) {
                trace!(rule = %rule.name, start, end, "POS constraint rejected {:?}", &text[start..end]);
                metrics.rejected_pos += 1;
                continue;
            }

            let table = self.rules.normalization();
            let annotate = |field: &Option<String>| field.as_deref().map(|t| expand(t, &caps, table));
            let timex = Timex {
                category: rule.category,
                value: expand(&rule.normalization, &caps, table),
                begin: self.sentence.begin() + start,
                end: self.sentence.begin() + end,
                quant: annotate(&rule.quant),
                freq: annotate(&rule.freq),
                modifier: annotate(&rule.modifier),
                empty_value: annotate(&rule.empty_value),
                rule: rule.name.clone(),
            };
            trace!(rule = %rule.name, value = %timex.value, begin = timex.begin, end = timex.end, "emitted");
            metrics.emitted += 1;
            out.push(Candidate { timex, order });
        }
    }
}

/// Keep only spans not covered by an earlier kept span.
///
/// Candidates are visited by start, longest first, then category priority and
/// rule order, so for identical spans the higher-priority rule survives. The
/// result is ordered by start offset.
fn drop_subsumed(mut found: Vec<Candidate>) -> Vec<Timex> {
    found.sort_by_key(|c| (c.timex.begin, Reverse(c.timex.end), c.timex.category, c.order));

    let mut kept: Vec<Timex> = Vec::new();
    let mut widest_end = 0;
    for Candidate { timex, .. } in found {
        // Everything kept so far starts at or before this one, so it is covered
        // exactly when some kept span reaches at least as far.
        let is_subsumed = !kept.is_empty() && timex.end <= widest_end;
        if is_subsumed {
            trace!(rule = %timex.rule, begin = timex.begin, end = timex.end, "subsumed");
            continue;
        }
        widest_end = widest_end.max(timex.end);
        kept.push(timex);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compile_rules;
    use crate::resources::{NormalizationTable, PatternTable};
    use crate::sentence::Token;
    use crate::CategoryMask;

    fn rule_set(sources: &[(Category, &str)]) -> RuleSet {
        let patterns: PatternTable = [("reYear", "[12][0-9]{3}"), ("reMonth", "(?:March|May)")].into_iter().collect();
        let mut table = NormalizationTable::new();
        table.insert("normMonth", "march", "03");
        table.insert("normMonth", "may", "05");
        table.insert("normPart", "early", "START");
        compile_rules(sources.iter().copied(), &patterns, table).unwrap().0
    }

    fn options(drop_subsumed: bool) -> Options {
        Options { drop_subsumed, ..Options::default() }
    }

    const DATES: &str = r#"
RULENAME="d_year",EXTRACTION="(%reYear)",NORM_VALUE="group(1)",FAST_CHECK="[0-9]{4}"
RULENAME="d_month_year",EXTRACTION="(%reMonth) (%reYear)",NORM_VALUE="group(2)-%normMonth(group(1))"
RULENAME="d_early",EXTRACTION="(early) (%reYear)",NORM_VALUE="group(2)",NORM_MOD="%normPart(group(1))",OFFSET="group(2)-group(2)"
"#;

    #[test]
    fn emits_absolute_spans_and_expanded_values() {
        let rules = rule_set(&[(Category::Date, DATES)]);
        let sentence = SentenceContainer::tokenize_simple("It was March 2001.", 100);
        let (timexes, metrics) = Extractor::new(&rules, &sentence).run(&options(true));

        assert_eq!(timexes.len(), 1);
        assert_eq!(timexes[0].value, "2001-03");
        assert_eq!((timexes[0].begin, timexes[0].end), (107, 117));
        assert_eq!(timexes[0].rule, "d_month_year");
        assert_eq!(metrics.subsumed, 1);
        assert_eq!(metrics.category(Category::Date).unwrap().emitted, 2);
    }

    #[test]
    fn keeps_overlaps_when_asked() {
        let rules = rule_set(&[(Category::Date, DATES)]);
        let sentence = SentenceContainer::tokenize_simple("It was March 2001.", 0);
        let (timexes, _) = Extractor::new(&rules, &sentence).run(&options(false));
        let spans: Vec<(usize, usize)> = timexes.iter().map(|t| (t.begin, t.end)).collect();
        assert_eq!(spans, [(7, 17), (13, 17)]);
    }

    #[test]
    fn offset_trims_span_and_modifier_expands() {
        let rules = rule_set(&[(Category::Date, DATES)]);
        let sentence = SentenceContainer::tokenize_simple("in early 1990 it", 0);
        let (timexes, _) = Extractor::new(&rules, &sentence).run(&options(false));
        let early = timexes.iter().find(|t| t.rule == "d_early").unwrap();
        assert_eq!((early.begin, early.end), (9, 13));
        assert_eq!(early.modifier.as_deref(), Some("START"));
    }

    #[test]
    fn fast_check_skips_rules() {
        let rules = rule_set(&[(Category::Date, DATES)]);
        let sentence = SentenceContainer::tokenize_simple("nothing here", 0);
        let (timexes, metrics) = Extractor::new(&rules, &sentence).run(&options(true));
        assert!(timexes.is_empty());
        let date = metrics.category(Category::Date).unwrap();
        assert_eq!(date.rules_considered, 3);
        assert_eq!(date.fast_rejected, 1);
    }

    #[test]
    fn category_mask_disables_categories() {
        let set = r#"RULENAME="s_every",EXTRACTION="every year",NORM_VALUE="P1Y",NORM_QUANT="EVERY""#;
        let rules = rule_set(&[(Category::Date, DATES), (Category::Set, set)]);
        let sentence = SentenceContainer::tokenize_simple("every year since 1999", 0);

        let only_sets = Options { categories: CategoryMask::SET, ..Options::default() };
        let (timexes, metrics) = Extractor::new(&rules, &sentence).run(&only_sets);
        assert_eq!(timexes.len(), 1);
        assert_eq!(timexes[0].quant.as_deref(), Some("EVERY"));
        assert!(metrics.category(Category::Date).is_none());
    }

    #[test]
    fn equal_spans_keep_higher_priority_category() {
        let duration = r#"RULENAME="x_year",EXTRACTION="(%reYear)",NORM_VALUE="P1Y""#;
        let rules = rule_set(&[(Category::Duration, duration), (Category::Date, DATES)]);
        let sentence = SentenceContainer::tokenize_simple("in 1999", 0);
        let (timexes, _) = Extractor::new(&rules, &sentence).run(&options(true));
        assert_eq!(timexes.len(), 1);
        assert_eq!(timexes[0].category, Category::Date);
    }

    #[test]
    fn pos_constraint_filters_matches() {
        let text = r#"RULENAME="d_may",EXTRACTION="(May)",NORM_VALUE="UNDEF-year-%normMonth(group(1))",POS_CONSTRAINT="group(1):NP:""#;
        let rules = rule_set(&[(Category::Date, text)]);

        let modal = SentenceContainer::new(
            "May I",
            0,
            vec![Token::with_pos(0, 3, "MD"), Token::with_pos(4, 5, "PP")],
        );
        assert!(Extractor::new(&rules, &modal).run(&options(true)).0.is_empty());

        let month = SentenceContainer::new(
            "in May",
            0,
            vec![Token::with_pos(0, 2, "IN"), Token::with_pos(3, 6, "NP")],
        );
        let (timexes, _) = Extractor::new(&rules, &month).run(&options(true));
        assert_eq!(timexes[0].value, "UNDEF-year-05");
    }

    #[test]
    fn overflowing_sum_keeps_its_arguments() {
        let text = r#"RULENAME="d_sum",EXTRACTION="([0-9]+)",NORM_VALUE="%SUM%(group(1),1)""#;
        let rules = rule_set(&[(Category::Date, text)]);
        let sentence = SentenceContainer::tokenize_simple("9223372036854775807", 0);
        let (timexes, _) = Extractor::new(&rules, &sentence).run(&options(true));
        assert_eq!(timexes.len(), 1);
        assert_eq!(timexes[0].value, "9223372036854775807,1");
    }

    #[test]
    fn drop_subsumed_handles_chains() {
        let make = |begin, end, category| Candidate {
            timex: Timex {
                category,
                value: String::new(),
                begin,
                end,
                quant: None,
                freq: None,
                modifier: None,
                empty_value: None,
                rule: format!("{begin}-{end}"),
            },
            order: 0,
        };
        let kept = drop_subsumed(vec![
            make(5, 8, Category::Date),
            make(0, 10, Category::Duration),
            make(9, 14, Category::Set),
            make(11, 13, Category::Date),
        ]);
        let spans: Vec<(usize, usize)> = kept.iter().map(|t| (t.begin, t.end)).collect();
        assert_eq!(spans, [(0, 10), (9, 14)]);
    }
}
