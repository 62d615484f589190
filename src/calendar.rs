//! Calendar arithmetic over normalized value strings.
//!
//! Values come in the granularities produced by the rules: `YY` (century),
//! `YYY` (decade), `YYYY`, `YYYY-Qn`, `YYYY-MM`, `YYYY-Www` and `YYYY-MM-DD`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Granularity at which a placeholder is anchored and shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unit {
    Century,
    Decade,
    Year,
    Quarter,
    Month,
    Week,
    Day,
}

impl Unit {
    pub fn parse(name: &str) -> Option<Unit> {
        Some(match name {
            "century" => Unit::Century,
            "decade" => Unit::Decade,
            "year" => Unit::Year,
            "quarter" => Unit::Quarter,
            "month" => Unit::Month,
            "week" => Unit::Week,
            "day" => Unit::Day,
            _ => return None,
        })
    }

    /// `date` rendered at this granularity.
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            Unit::Century => format!("{:02}", date.year().div_euclid(100)),
            Unit::Decade => format!("{:03}", date.year().div_euclid(10)),
            Unit::Year => format!("{:04}", date.year()),
            Unit::Quarter => format!("{:04}-Q{}", date.year(), (date.month() - 1) / 3 + 1),
            Unit::Month => format!("{:04}-{:02}", date.year(), date.month()),
            Unit::Week => {
                let week = date.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Unit::Day => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Shift `value` (formatted at this granularity) by `amount` units.
    ///
    /// `None` when the value does not have this granularity's shape, is a BC
    /// value, or the result leaves the representable range.
    pub fn shift(self, value: &str, amount: i64) -> Option<String> {
        let amount = i32::try_from(amount).ok()?;
        match self {
            Unit::Century => shift_number(value, 2, amount),
            Unit::Decade => shift_number(value, 3, amount),
            Unit::Year => shift_number(value, 4, amount),
            Unit::Quarter => {
                let caps = regex!(r"^([0-9]{4})-Q([1-4])$").captures(value)?;
                let year: i32 = caps[1].parse().ok()?;
                let quarter: i32 = caps[2].parse().ok()?;
                let zero_based = (quarter - 1).checked_add(amount)?;
                let year = year.checked_add(zero_based.div_euclid(4))?;
                in_range(year).then(|| format!("{:04}-Q{}", year, zero_based.rem_euclid(4) + 1))
            }
            Unit::Month => {
                let caps = regex!(r"^([0-9]{4})-([0-9]{2})$").captures(value)?;
                let (year, month) = add_months(caps[1].parse().ok()?, caps[2].parse().ok()?, amount)?;
                in_range(year).then(|| format!("{year:04}-{month:02}"))
            }
            Unit::Week => {
                let caps = regex!(r"^([0-9]{4})-W([0-9]{2})$").captures(value)?;
                let monday = NaiveDate::from_isoywd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, Weekday::Mon)?;
                let shifted = monday.checked_add_signed(Duration::try_weeks(amount.into())?)?;
                in_range(shifted.year()).then(|| Unit::Week.format(shifted))
            }
            Unit::Day => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
                let shifted = date.checked_add_signed(Duration::try_days(amount.into())?)?;
                in_range(shifted.year()).then(|| Unit::Day.format(shifted))
            }
        }
    }
}

/// ISO-8601 week-year and week number of a `YYYY-MM-DD` date.
pub fn iso_week(date: &str) -> Option<(i32, u32)> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let week = date.iso_week();
    Some((week.year(), week.week()))
}

/// Quarter number (`"1"`..`"4"`) of a two-digit month.
pub fn quarter_of_month(month: &str) -> Option<&'static str> {
    Some(match month {
        "01" | "02" | "03" => "1",
        "04" | "05" | "06" => "2",
        "07" | "08" | "09" => "3",
        "10" | "11" | "12" => "4",
        _ => return None,
    })
}

/// Season code of a two-digit month (meteorological, northern hemisphere).
pub fn season_of_month(month: &str) -> Option<&'static str> {
    Some(match month {
        "12" | "01" | "02" => "WI",
        "03" | "04" | "05" => "SP",
        "06" | "07" | "08" => "SU",
        "09" | "10" | "11" => "FA",
        _ => return None,
    })
}

/// `(year, month)` moved by `months`, month 1-based. `None` on overflow.
pub(crate) fn add_months(year: i32, month: u32, months: i32) -> Option<(i32, u32)> {
    let zero_based = i32::try_from(month).ok()?.checked_sub(1)?.checked_add(months)?;
    let year = year.checked_add(zero_based.div_euclid(12))?;
    let month = (zero_based.rem_euclid(12) + 1) as u32;
    Some((year, month))
}

fn shift_number(value: &str, width: usize, amount: i32) -> Option<String> {
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let shifted = value.parse::<i32>().ok()?.checked_add(amount)?;
    (shifted >= 0 && shifted < 10_i32.pow(width as u32)).then(|| format!("{shifted:0width$}"))
}

fn in_range(year: i32) -> bool {
    (0..=9999).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_months_wraps_years() {
        assert_eq!(add_months(2024, 1, 1), Some((2024, 2)));
        assert_eq!(add_months(2023, 11, 3), Some((2024, 2)));
        assert_eq!(add_months(2024, 1, -1), Some((2023, 12)));
        assert_eq!(add_months(2024, 3, -27), Some((2021, 12)));
        assert_eq!(add_months(2024, 12, i32::MAX), None);
    }

    #[test]
    fn huge_shifts_are_rejected_not_wrapped() {
        let max = i64::from(i32::MAX);
        let min = i64::from(i32::MIN);
        assert_eq!(Unit::Quarter.shift("2001-Q2", max), None);
        assert_eq!(Unit::Quarter.shift("2001-Q1", min), None);
        assert_eq!(Unit::Month.shift("2001-02", max), None);
        assert_eq!(Unit::Month.shift("2001-01", min), None);
        assert_eq!(Unit::Year.shift("2001", max), None);
        assert_eq!(Unit::Week.shift("2001-W02", max), None);
        assert_eq!(Unit::Day.shift("2001-01-02", max), None);
        assert_eq!(Unit::Month.shift("2001-01", max + 1), None);
    }

    #[test]
    fn shifts_each_granularity() {
        assert_eq!(Unit::Century.shift("19", 1).as_deref(), Some("20"));
        assert_eq!(Unit::Decade.shift("199", -1).as_deref(), Some("198"));
        assert_eq!(Unit::Year.shift("2000", -1).as_deref(), Some("1999"));
        assert_eq!(Unit::Quarter.shift("2001-Q4", 1).as_deref(), Some("2002-Q1"));
        assert_eq!(Unit::Quarter.shift("2001-Q1", -1).as_deref(), Some("2000-Q4"));
        assert_eq!(Unit::Month.shift("2001-12", 2).as_deref(), Some("2002-02"));
        assert_eq!(Unit::Week.shift("2009-W53", 1).as_deref(), Some("2010-W01"));
        assert_eq!(Unit::Day.shift("2024-02-28", 1).as_deref(), Some("2024-02-29"));
        assert_eq!(Unit::Day.shift("2024-03-01", -1).as_deref(), Some("2024-02-29"));
    }

    #[test]
    fn shift_rejects_wrong_shapes() {
        assert_eq!(Unit::Year.shift("2001-03", 1), None);
        assert_eq!(Unit::Year.shift("BC0190", 1), None);
        assert_eq!(Unit::Month.shift("2001", 1), None);
        assert_eq!(Unit::Day.shift("2001-02-30", 1), None);
        assert_eq!(Unit::Year.shift("0000", -1), None);
    }

    #[test]
    fn formats_dates_per_unit() {
        let date = NaiveDate::from_ymd_opt(2010, 1, 2).unwrap();
        assert_eq!(Unit::Century.format(date), "20");
        assert_eq!(Unit::Decade.format(date), "201");
        assert_eq!(Unit::Quarter.format(date), "2010-Q1");
        assert_eq!(Unit::Month.format(date), "2010-01");
        assert_eq!(Unit::Week.format(date), "2009-W53");
        assert_eq!(Unit::Day.format(date), "2010-01-02");
    }

    #[test]
    fn iso_weeks_and_lookups() {
        assert_eq!(iso_week("2010-01-29"), Some((2010, 4)));
        assert_eq!(iso_week("2010-01-01"), Some((2009, 53)));
        assert_eq!(iso_week("2010-13-01"), None);
        assert_eq!(quarter_of_month("05"), Some("2"));
        assert_eq!(quarter_of_month("5"), None);
        assert_eq!(season_of_month("12"), Some("WI"));
        assert_eq!(season_of_month("07"), Some("SU"));
    }
}
