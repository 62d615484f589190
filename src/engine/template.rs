//! Value template expansion.
//!
//! A template such as `UNDEF-year-%normMonth(group(1))-%normDay(group(2))` is
//! expanded in two steps: `group(N)` references are replaced with the captured
//! text, then function calls are evaluated innermost first until none remain.
//!
//! Functions:
//!
//! - `%normX(arg)`: lookup in the `normX` normalization table; the argument is
//!   kept as is when the table has no entry.
//! - `%UPPERCASE%(arg)`, `%LOWERCASE%(arg)`
//! - `%SUM%(a,b,...)`: integer sum.
//! - `%SUBSTRING%(text,from,to)`: character range of `text`.

use crate::resources::NormalizationTable;
use regex::Captures;
use tracing::{debug, trace};

// Deepest function nesting evaluated before giving up.
const MAX_NESTING: usize = 8;

pub(crate) fn expand(template: &str, caps: &Captures<'_>, table: &NormalizationTable) -> String {
    let with_groups = regex!(r"group\(([0-9]+)\)").replace_all(template, |g: &Captures<'_>| {
        g[1].parse::<usize>()
            .ok()
            .and_then(|idx| caps.get(idx))
            .map(|m| collapse_whitespace(m.as_str()))
            .unwrap_or_default()
    });
    apply_functions(&with_groups, table)
}

fn apply_functions(value: &str, table: &NormalizationTable) -> String {
    let call = regex!(r"%(norm[A-Za-z0-9]*|UPPERCASE%|LOWERCASE%|SUM%|SUBSTRING%)\(([^()]*)\)");
    let mut current = value.to_string();
    for _ in 0..MAX_NESTING {
        if !call.is_match(&current) {
            break;
        }
        current = call
            .replace_all(&current, |c: &Captures<'_>| evaluate(&c[1], &c[2], table))
            .into_owned();
    }
    current
}

fn evaluate(function: &str, arg: &str, table: &NormalizationTable) -> String {
    match function {
        "UPPERCASE%" => arg.to_uppercase(),
        "LOWERCASE%" => arg.to_lowercase(),
        "SUM%" => sum(arg).map(|n| n.to_string()).unwrap_or_else(|| arg.to_string()),
        "SUBSTRING%" => substring(arg).unwrap_or_else(|| arg.to_string()),
        norm => match table.lookup(norm, arg) {
            Some(normalized) => normalized.to_string(),
            None => {
                if table.has_function(norm) {
                    trace!(function = norm, arg, "no normalization entry");
                } else {
                    debug!(function = norm, "unknown normalization function");
                }
                arg.to_string()
            }
        },
    }
}

fn sum(arg: &str) -> Option<i64> {
    arg.split(',').try_fold(0i64, |acc, part| acc.checked_add(part.trim().parse().ok()?))
}

fn substring(arg: &str) -> Option<String> {
    let mut parts = arg.rsplitn(3, ',');
    let to: usize = parts.next()?.trim().parse().ok()?;
    let from: usize = parts.next()?.trim().parse().ok()?;
    let text = parts.next()?;
    Some(text.chars().skip(from).take(to.saturating_sub(from)).collect())
}

fn collapse_whitespace(text: &str) -> String {
    regex!(r"\s+").replace_all(text, " ").into_owned()
}
