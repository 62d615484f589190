//! Match validation against the surrounding text and token layout.
//!
//! Offsets taken by these functions are byte offsets relative to the start of
//! the sentence text.

use crate::sentence::SentenceContainer;

/// Reject matches glued to neighbouring material.
///
/// A match fails when the text before it ends in a digit followed by a
/// period, a word character, or `$`/`+` (optionally followed by whitespace),
/// or when the text after it starts with a word character or `°`, or with
/// `.`/`,` followed by a digit.
///
/// ```
/// assert!(!timex::check_prefix_suffix("53453.1999", 6, 10));
/// assert!(timex::check_prefix_suffix("In 1999 he left", 3, 7));
/// ```
pub fn check_prefix_suffix(text: &str, start: usize, end: usize) -> bool {
    let prefix = text.get(..start).unwrap_or("");
    if !prefix.is_empty() && regex!(r"\d\.$|\w$|[$+]\s*$").is_match(prefix) {
        return false;
    }
    let suffix = text.get(end..).unwrap_or("");
    suffix.is_empty() || !regex!(r"^[°\w]|^[.,]\d").is_match(suffix)
}

/// Require the match to start and end on token boundaries.
///
/// Accepted outright when the match covers the whole sentence, or when both
/// ends touch whitespace or the sentence edge. Otherwise each end is checked
/// on its own: the start must coincide with a token start or follow a
/// punctuation character, and the end must coincide with a token end or
/// precede a punctuation character. A sentence without tokens accepts
/// nothing past the whitespace check.
pub fn check_token_boundaries(sentence: &SentenceContainer, start: usize, end: usize) -> bool {
    if end.saturating_sub(start) == sentence.len() {
        return true;
    }

    let text = sentence.text();
    let (Some(before), Some(after)) = (text.get(..start), text.get(end..)) else {
        return false;
    };

    let open_before = before.chars().next_back().is_none_or(char::is_whitespace);
    let open_after = after.chars().next().is_none_or(char::is_whitespace);
    if open_before && open_after {
        return true;
    }

    if sentence.tokens().is_empty() {
        return false;
    }

    let abs_start = sentence.begin() + start;
    let abs_end = sentence.begin() + end;
    let start_ok =
        regex!(r"\p{P}\z").is_match(before) || sentence.tokens().iter().any(|token| token.begin == abs_start);
    let end_ok = regex!(r"\A\p{P}").is_match(after) || sentence.tokens().iter().any(|token| token.end == abs_end);
    start_ok && end_ok
}

/// Both checks above, in the order the extractor applies them.
pub fn check_sentence_match(sentence: &SentenceContainer, start: usize, end: usize) -> bool {
    check_prefix_suffix(sentence.text(), start, end) && check_token_boundaries(sentence, start, end)
}
