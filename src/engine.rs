//! Rule compilation and extraction engine.
//!
//! ## How the parts work together
//!
//! ```text
//! rule texts + PatternTable ──┐
//!                             │  compile_rules              (compiler.rs)
//!                             │   - parse RULENAME/EXTRACTION/NORM_VALUE lines
//!                             │   - expand %reX variables, widen spaces
//!                             │   - compile pattern, fast check, constraints
//!                             v
//!                          RuleSet  (rule.rs)  ── cached per language by
//!                             │                   RuleRepository (repository.rs)
//!                             │
//! SentenceContainer ──────────┼─ Extractor::run              (extractor.rs)
//!                             │   - category order DATE, TIME, DURATION, SET, TEMPONYM
//!                             │   - fast check, regex scan, offset selection
//!                             │   - prefix/suffix + token boundaries (boundaries.rs)
//!                             │   - POS constraints
//!                             │   - template expansion        (template.rs)
//!                             v
//!                   Vec<Timex> (+ RunMetrics, metrics.rs)
//! ```
//!
//! Rules within a category are applied in ascending rule-name order, which
//! keeps output deterministic for a given rule set and sentence.
//!
//! ## Debugging
//!
//! Everything here logs through `tracing`. Compilation warnings (malformed or
//! duplicate rule lines) are emitted at `warn`; per-match rejections at
//! `trace`.

#[path = "engine/boundaries.rs"]
mod boundaries;
#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/extractor.rs"]
mod extractor;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/repository.rs"]
mod repository;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/template.rs"]
mod template;

pub use boundaries::{check_prefix_suffix, check_sentence_match, check_token_boundaries};
pub use compiler::{CompileStats, compile_rules};
pub(crate) use extractor::Extractor;
pub use metrics::{CategoryMetrics, RunMetrics};
pub use repository::RuleRepository;
pub use rule::{Offset, PosConstraint, RuleInstance, RuleSet};
pub(crate) use compiler::full_match_regex;
