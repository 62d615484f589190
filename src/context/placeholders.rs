//! Rewrites `UNDEF-` values into concrete ones.
//!
//! ```text
//! UNDEF-REFDATE                 -> PRESENT_REF | DCT day
//! UNDEF-REF-<unit>-PLUS-<n>...  -> anchor(unit) + n, rest appended
//! UNDEF-<this|last|next>-<unit> -> anchor(unit) + 0 | -1 | +1, rest appended
//! UNDEF-<century|decade|year>   -> anchor(unit), rest appended
//! ```
//!
//! The anchor is the document creation time in news documents and the last
//! mentioned value otherwise.

use super::mentioned::{Granularity, get_last_mentioned_x};
use super::tense::{Tense, get_last_tense};
use crate::calendar::Unit;
use crate::language::Language;
use crate::sentence::SentenceContainer;
use crate::{Context, DocumentType, Timex};
use chrono::Datelike;
use tracing::debug;

/// Resolve every placeholder in `timexes`, in document order.
///
/// `timexes` must be sorted by start offset. Resolved values are visible to the
/// expressions after them, so a chain like "March 2001 ... the next month ...
/// in December" anchors each step on the previous one. Values that cannot be
/// anchored are left untouched.
pub fn resolve_placeholders(
    timexes: &mut [Timex],
    sentences: &[SentenceContainer],
    language: Language,
    context: &Context,
) {
    for index in 0..timexes.len() {
        if !timexes[index].value.starts_with("UNDEF") {
            continue;
        }
        let resolver = Resolver { timexes: &*timexes, index, sentences, language, context };
        match resolver.resolve(&timexes[index].value) {
            Some(value) => {
                debug!(from = %timexes[index].value, to = %value, "placeholder resolved");
                timexes[index].value = value;
            }
            None => debug!(value = %timexes[index].value, begin = timexes[index].begin, "no anchor, placeholder kept"),
        }
    }
}

struct Resolver<'a> {
    timexes: &'a [Timex],
    index: usize,
    sentences: &'a [SentenceContainer],
    language: Language,
    context: &'a Context,
}

impl Resolver<'_> {
    fn resolve(&self, value: &str) -> Option<String> {
        if let Some(rest) = value.strip_prefix("UNDEF-REFDATE") {
            let reference = match (self.context.document_type, self.context.dct) {
                (DocumentType::News, Some(dct)) => Unit::Day.format(dct),
                _ => "PRESENT_REF".to_string(),
            };
            return Some(reference + rest);
        }

        if let Some(caps) = regex!(r"^UNDEF-REF-(century|decade|year|quarter|month|week|day)-(PLUS|MINUS)-([0-9]+)(.*)$")
            .captures(value)
        {
            let unit = Unit::parse(&caps[1])?;
            let count: i64 = caps[3].parse().ok()?;
            let amount = if &caps[2] == "MINUS" { -count } else { count };
            return Some(unit.shift(&self.anchor(unit)?, amount)? + &caps[4]);
        }

        if let Some(caps) = regex!(r"^UNDEF-(this|last|next)-(century|decade|year|quarter|month|week|day)(.*)$").captures(value) {
            let unit = Unit::parse(&caps[2])?;
            let amount = match &caps[1] {
                "last" => -1,
                "next" => 1,
                _ => 0,
            };
            return Some(unit.shift(&self.anchor(unit)?, amount)? + &caps[3]);
        }

        if let Some(caps) = regex!(r"^UNDEF-(century|decade|year)(.*)$").captures(value) {
            let unit = Unit::parse(&caps[1])?;
            let rest = &caps[2];
            let mut anchor = self.anchor(unit)?;
            if unit == Unit::Year {
                anchor = self.adjust_year_for_tense(anchor, rest);
            }
            return Some(anchor + rest);
        }

        debug!(value, "unrecognized placeholder shape");
        None
    }

    fn anchor(&self, unit: Unit) -> Option<String> {
        if let (DocumentType::News, Some(dct)) = (self.context.document_type, self.context.dct) {
            return Some(unit.format(dct));
        }
        get_last_mentioned_x(self.timexes, self.index, granularity(unit))
    }

    /// In news, a bare month is read relative to the DCT: a past-tense month
    /// later in the year than the DCT belongs to the previous year, a future one
    /// earlier in the year to the next.
    fn adjust_year_for_tense(&self, year: String, rest: &str) -> String {
        let (DocumentType::News, Some(dct)) = (self.context.document_type, self.context.dct) else {
            return year;
        };
        let Some(month) = regex!(r"^-([0-9]{2})").captures(rest).and_then(|caps| caps[1].parse::<u32>().ok()) else {
            return year;
        };

        let timex = &self.timexes[self.index];
        let Some(sentence) = self.sentences.iter().find(|s| s.contains_span(timex.begin, timex.end)) else {
            return year;
        };
        let amount = match get_last_tense(timex, sentence, self.language) {
            Some(Tense::Past) if month > dct.month() => -1,
            Some(Tense::Future | Tense::PresentFuture) if month < dct.month() => 1,
            _ => return year,
        };
        debug!(begin = timex.begin, amount, "year shifted by tense");
        Unit::Year.shift(&year, amount).unwrap_or(year)
    }
}

fn granularity(unit: Unit) -> Granularity {
    match unit {
        Unit::Century => Granularity::Century,
        Unit::Decade => Granularity::Decade,
        Unit::Year => Granularity::Year,
        Unit::Quarter => Granularity::Quarter,
        Unit::Month => Granularity::Month,
        Unit::Week => Granularity::Week,
        Unit::Day => Granularity::Day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;
    use crate::sentence::Token;
    use chrono::NaiveDate;

    fn timex(value: &str, begin: usize, end: usize) -> Timex {
        Timex {
            category: Category::Date,
            value: value.to_string(),
            begin,
            end,
            quant: None,
            freq: None,
            modifier: None,
            empty_value: None,
            rule: "test".to_string(),
        }
    }

    fn news(year: i32, month: u32, day: u32) -> Context {
        Context { document_type: DocumentType::News, dct: NaiveDate::from_ymd_opt(year, month, day) }
    }

    fn values(timexes: &[Timex]) -> Vec<&str> {
        timexes.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn narrative_chains_on_resolved_values() {
        let mut timexes =
            vec![timex("2001-03", 0, 10), timex("UNDEF-next-month", 20, 30), timex("UNDEF-year-12", 40, 48)];
        resolve_placeholders(&mut timexes, &[], Language::English, &Context::default());
        assert_eq!(values(&timexes), ["2001-03", "2001-04", "2001-12"]);
    }

    #[test]
    fn news_anchors_on_dct() {
        let mut timexes = vec![
            timex("UNDEF-REF-day-MINUS-1", 0, 9),
            timex("UNDEF-REFDATE", 10, 13),
            timex("UNDEF-this-week", 20, 29),
            timex("UNDEF-last-year-SU", 30, 41),
            timex("UNDEF-this-dayT15:30", 50, 60),
        ];
        resolve_placeholders(&mut timexes, &[], Language::English, &news(2010, 1, 15));
        assert_eq!(values(&timexes), ["2010-01-14", "2010-01-15", "2010-W02", "2009-SU", "2010-01-15T15:30"]);
    }

    #[test]
    fn unanchored_placeholders_are_kept() {
        let mut timexes = vec![timex("UNDEF-last-year", 0, 9), timex("UNDEF-REFDATE", 10, 13)];
        resolve_placeholders(&mut timexes, &[], Language::English, &Context::default());
        assert_eq!(values(&timexes), ["UNDEF-last-year", "PRESENT_REF"]);
    }

    #[test]
    fn past_tense_month_after_dct_is_previous_year() {
        let sentence = SentenceContainer::new(
            "He left in December",
            0,
            vec![
                Token::with_pos(0, 2, "PP"),
                Token::with_pos(3, 7, "VVD"),
                Token::with_pos(8, 10, "IN"),
                Token::with_pos(11, 19, "NP"),
            ],
        );
        let mut timexes = vec![timex("UNDEF-year-12", 11, 19)];
        resolve_placeholders(&mut timexes, &[sentence], Language::English, &news(2010, 3, 15));
        assert_eq!(values(&timexes), ["2009-12"]);
    }

    #[test]
    fn future_tense_month_before_dct_is_next_year() {
        let sentence = SentenceContainer::new(
            "They will meet in January",
            0,
            vec![
                Token::with_pos(0, 4, "PP"),
                Token::with_pos(5, 9, "MD"),
                Token::with_pos(10, 14, "VV"),
                Token::with_pos(15, 17, "IN"),
                Token::with_pos(18, 25, "NP"),
            ],
        );
        let mut timexes = vec![timex("UNDEF-year-01", 18, 25)];
        resolve_placeholders(&mut timexes, &[sentence], Language::English, &news(2010, 3, 15));
        assert_eq!(values(&timexes), ["2011-01"]);
    }

    #[test]
    fn ref_offsets_shift_by_count() {
        let mut timexes = vec![timex("2008-Q4", 0, 7), timex("UNDEF-REF-quarter-PLUS-2", 10, 20)];
        resolve_placeholders(&mut timexes, &[], Language::English, &Context::default());
        assert_eq!(values(&timexes), ["2008-Q4", "2009-Q2"]);
    }

    #[test]
    fn out_of_range_offsets_are_kept() {
        let mut timexes = vec![
            timex("UNDEF-REF-quarter-PLUS-2147483647", 0, 9),
            timex("UNDEF-REF-month-PLUS-2147483647", 10, 19),
            timex("UNDEF-REF-month-MINUS-2147483648", 20, 29),
            timex("UNDEF-REF-day-PLUS-99999999999999999999", 30, 39),
        ];
        let before: Vec<String> = timexes.iter().map(|t| t.value.clone()).collect();
        resolve_placeholders(&mut timexes, &[], Language::English, &news(2010, 5, 1));
        assert_eq!(values(&timexes), before);
    }
}
