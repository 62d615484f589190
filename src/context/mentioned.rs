use crate::calendar::{iso_week, quarter_of_month, season_of_month};
use crate::error::Error;
use crate::Timex;
use std::fmt;
use std::str::FromStr;

/// Granularity requested from [`get_last_mentioned_x`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Century,
    Decade,
    Year,
    /// A year-prefixed value, returned whole.
    DateYear,
    Month,
    /// A month-prefixed value, returned whole.
    MonthWithDetails,
    Day,
    Week,
    Quarter,
    /// An explicit `YYYY-Qn` value only.
    DateQuarter,
    Season,
}

impl Granularity {
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Century => "century",
            Granularity::Decade => "decade",
            Granularity::Year => "year",
            Granularity::DateYear => "dateYear",
            Granularity::Month => "month",
            Granularity::MonthWithDetails => "month-with-details",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Quarter => "quarter",
            Granularity::DateQuarter => "dateQuarter",
            Granularity::Season => "season",
        }
    }

    const ALL: [Granularity; 11] = [
        Granularity::Century,
        Granularity::Decade,
        Granularity::Year,
        Granularity::DateYear,
        Granularity::Month,
        Granularity::MonthWithDetails,
        Granularity::Day,
        Granularity::Week,
        Granularity::Quarter,
        Granularity::DateQuarter,
        Granularity::Season,
    ];
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Granularity::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| Error::UnknownGranularity(s.to_string()))
    }
}

/// Most recent earlier expression usable as an anchor at `granularity`.
///
/// Scans `expressions` backward from `current - 1`. Entries sharing the start
/// offset of `expressions[current]` are skipped, as are values containing
/// `funcDate`. When `current` is past the end, the scan starts at the last
/// entry and nothing is skipped for its offset. Returns `None` when no entry
/// qualifies, or when the nearest date-shaped entry is not a real date.
pub fn get_last_mentioned_x(expressions: &[Timex], current: usize, granularity: Granularity) -> Option<String> {
    let current_begin = expressions.get(current).map(|timex| timex.begin);
    let end = current.min(expressions.len());

    expressions[..end]
        .iter()
        .rev()
        .filter(|timex| Some(timex.begin) != current_begin)
        .filter(|timex| !timex.value.contains("funcDate"))
        .find_map(|timex| extract(&timex.value, granularity))
        .flatten()
}

/// The anchor `value` provides at `granularity`.
///
/// `None` when `value` does not have a usable shape and the scan moves on;
/// `Some(None)` when it has the shape but no valid anchor (an impossible date
/// or month), which ends the scan.
fn extract(value: &str, granularity: Granularity) -> Option<Option<String>> {
    let prefix = |re: &regex::Regex| re.find(value).map(|m| Some(m.as_str().to_string()));
    let whole = |re: &regex::Regex| re.is_match(value).then(|| Some(value.to_string()));
    match granularity {
        Granularity::Century => prefix(regex!(r"^(?:BC)?[0-9]{2}")),
        Granularity::Decade => prefix(regex!(r"^(?:BC)?[0-9]{3}")),
        Granularity::Year => prefix(regex!(r"^(?:BC)?[0-9]{4}")),
        Granularity::DateYear => whole(regex!(r"^(?:BC)?[0-9]{4}")),
        Granularity::Month => prefix(regex!(r"^(?:BC)?[0-9]{4}-[0-9]{2}")),
        Granularity::MonthWithDetails => whole(regex!(r"^[0-9]{4}-[0-9]{2}")),
        Granularity::Day => prefix(regex!(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}")),
        Granularity::Week => {
            if let Some(date) = regex!(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").find(value) {
                Some(iso_week(date.as_str()).map(|(year, week)| format!("{year:04}-W{week:02}")))
            } else {
                prefix(regex!(r"^[0-9]{4}-W[0-9]{2}"))
            }
        }
        Granularity::Quarter => {
            if let Some(caps) = regex!(r"^([0-9]{4})-([0-9]{2})").captures(value) {
                let quarter = quarter_of_month(&caps[2]).unwrap_or("1");
                Some(Some(format!("{}-Q{quarter}", &caps[1])))
            } else {
                prefix(regex!(r"^[0-9]{4}-Q[1-4]"))
            }
        }
        Granularity::DateQuarter => prefix(regex!(r"^[0-9]{4}-Q[1-4]")),
        Granularity::Season => {
            if let Some(caps) = regex!(r"^([0-9]{4})-([0-9]{2})").captures(value) {
                Some(season_of_month(&caps[2]).map(|season| format!("{}-{season}", &caps[1])))
            } else {
                prefix(regex!(r"^[0-9]{4}-(?:SP|SU|FA|WI)"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn timex(value: &str, begin: usize) -> Timex {
        Timex {
            category: Category::Date,
            value: value.to_string(),
            begin,
            end: begin + 4,
            quant: None,
            freq: None,
            modifier: None,
            empty_value: None,
            rule: "test".to_string(),
        }
    }

    fn history(values: &[&str]) -> Vec<Timex> {
        values.iter().enumerate().map(|(i, v)| timex(v, i * 10)).collect()
    }

    #[test]
    fn most_recent_match_wins() {
        let prior = history(&["2001-03", "2001-Q2", "1999"]);
        assert_eq!(get_last_mentioned_x(&prior, 3, Granularity::Year).as_deref(), Some("1999"));
        assert_eq!(get_last_mentioned_x(&prior, 3, Granularity::Quarter).as_deref(), Some("2001-Q2"));
        assert_eq!(get_last_mentioned_x(&prior, 3, Granularity::Month).as_deref(), Some("2001-03"));
        assert_eq!(get_last_mentioned_x(&prior, 2, Granularity::Year).as_deref(), Some("2001"));
        assert_eq!(get_last_mentioned_x(&prior, 0, Granularity::Year), None);
    }

    #[test]
    fn month_maps_to_quarter_and_season() {
        let prior = history(&["2010-08-14", "current"]);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Quarter).as_deref(), Some("2010-Q3"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Season).as_deref(), Some("2010-SU"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Week).as_deref(), Some("2010-W32"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Day).as_deref(), Some("2010-08-14"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::DateQuarter), None);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::MonthWithDetails).as_deref(), Some("2010-08-14"));
    }

    #[test]
    fn bc_values_for_coarse_granularities_only() {
        let prior = history(&["BC0190-05", "x"]);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Century).as_deref(), Some("BC01"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Decade).as_deref(), Some("BC019"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Year).as_deref(), Some("BC0190"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::DateYear).as_deref(), Some("BC0190-05"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Month).as_deref(), Some("BC0190-05"));
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::MonthWithDetails), None);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Day), None);
    }

    #[test]
    fn skips_same_offset_and_function_dates() {
        let mut prior = history(&["1999", "2005", "funcDate:2007", "x"]);
        prior[1].begin = 30;
        prior[3].begin = 30;
        assert_eq!(get_last_mentioned_x(&prior, 3, Granularity::Year).as_deref(), Some("1999"));
    }

    #[test]
    fn week_values_pass_through() {
        let prior = history(&["2012-W07", "x"]);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Week).as_deref(), Some("2012-W07"));
    }

    #[test]
    fn impossible_date_ends_the_search() {
        let prior = history(&["2010-01-29", "2010-02-30", "x"]);
        assert_eq!(get_last_mentioned_x(&prior, 2, Granularity::Week), None);
        assert_eq!(get_last_mentioned_x(&prior, 1, Granularity::Week).as_deref(), Some("2010-W04"));

        let prior = history(&["2010-08", "2010-13", "x"]);
        assert_eq!(get_last_mentioned_x(&prior, 2, Granularity::Season), None);
        assert_eq!(get_last_mentioned_x(&prior, 2, Granularity::Month).as_deref(), Some("2010-13"));
    }

    #[test]
    fn granularity_names_round_trip() {
        for g in Granularity::ALL {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
        assert!("fortnight".parse::<Granularity>().is_err());
    }
}
