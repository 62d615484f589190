//! Property-based checks for rule compilation and fast checks.

use proptest::prelude::*;
use std::collections::BTreeSet;
use timex::{Category, Language, NormalizationTable, PatternTable, RuleRepository, compile_rules};

/// Fragments that sit close to what the bundled fast checks and patterns look
/// for, so generated texts hit both sides of each check.
const FRAGMENTS: &[&str] = &[
    "1999", "2010", "3", "12", "04", "199", "0s", "0er", "-", "/", ".", ":", "T", "am", "p.m.", "pm", "h", "Uhr",
    "heures", "ago", "before", "later", "vor", "il", "y", "a", "every", "Each", "Monday", "quarter", "Quartal",
    "first", "the", "early", "century", "21st", "Jahrhundert", "Jahr", "days", "Tagen", "jours", "March", "Mai",
];
const SEPARATORS: &[&str] = &["", " ", "  ", "\t"];

fn arb_text() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        4 => prop::sample::select(FRAGMENTS).prop_map(str::to_string),
        1 => "[a-zA-Z0-9 .:/-]{1,6}",
    ];
    let separator = prop::sample::select(SEPARATORS);
    prop::collection::vec((piece, separator), 0..10)
        .prop_map(|parts| parts.into_iter().map(|(piece, sep)| piece + sep).collect())
}

fn category(index: usize) -> Category {
    Category::PRIORITY_ORDER[index % Category::PRIORITY_ORDER.len()]
}

proptest! {
    #[test]
    fn fast_check_rejection_implies_no_match(text in arb_text()) {
        for language in Language::ALL {
            let rules = RuleRepository::global().get_rule_set(language, true).unwrap();
            for rule in rules.iter().filter(|rule| rule.fast_check.is_some()) {
                if !rule.passes_fast_check(&text) {
                    prop_assert!(
                        !rule.pattern.is_match(&text),
                        "{language} {} matched {text:?} although its fast check failed",
                        rule.name
                    );
                }
            }
        }
    }

    #[test]
    fn compiled_rules_keep_name_and_category(
        names in prop::collection::btree_set("[a-z][a-z0-9_]{0,10}", 1..8),
        index in 0usize..5,
    ) {
        let category = category(index);
        let text: String = names
            .iter()
            .map(|name| format!("RULENAME=\"{name}\",EXTRACTION=\"(%reYear)\",NORM_VALUE=\"group(1)\"\n"))
            .collect();
        let patterns: PatternTable = [("reYear", "[12][0-9]{3}")].into_iter().collect();

        let (set, stats) = compile_rules([(category, text.as_str())], &patterns, NormalizationTable::new()).unwrap();
        prop_assert_eq!(stats.compiled, names.len());
        prop_assert_eq!(set.count(category), names.len());
        let compiled: BTreeSet<(String, Category)> = set.iter().map(|r| (r.name.clone(), r.category)).collect();
        let expected: BTreeSet<(String, Category)> = names.iter().map(|n| (n.clone(), category)).collect();
        prop_assert_eq!(compiled, expected);
    }
}

#[test]
fn duplicate_names_keep_the_first_definition() {
    let text = r#"
RULENAME="date_r1",EXTRACTION="(%reYear)",NORM_VALUE="first"
RULENAME="date_r1",EXTRACTION="in (%reYear)",NORM_VALUE="second"
RULENAME="date_r2",EXTRACTION="(%reYear)s",NORM_VALUE="group(1)"
"#;
    let patterns: PatternTable = [("reYear", "[12][0-9]{3}")].into_iter().collect();
    let (set, stats) = compile_rules([(Category::Date, text)], &patterns, NormalizationTable::new()).unwrap();

    assert_eq!(stats.duplicates, 1);
    assert_eq!(set.count(Category::Date), 2);
    let kept = set.get(Category::Date, "date_r1").unwrap();
    assert_eq!(kept.normalization, "first");
    assert!(kept.pattern.is_match("1999"));
}

#[test]
fn same_name_in_different_categories_is_not_a_duplicate() {
    let line = r#"RULENAME="r1",EXTRACTION="(%reYear)",NORM_VALUE="group(1)""#;
    let patterns: PatternTable = [("reYear", "[12][0-9]{3}")].into_iter().collect();
    let (set, stats) =
        compile_rules([(Category::Set, line), (Category::Date, line)], &patterns, NormalizationTable::new()).unwrap();

    assert_eq!(stats.duplicates, 0);
    assert!(set.get(Category::Date, "r1").is_some());
    assert!(set.get(Category::Set, "r1").is_some());
}
