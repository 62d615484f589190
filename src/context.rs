//! Context-dependent value resolution.
//!
//! - [`get_last_mentioned_x`]: backward search through earlier expressions for
//!   an anchor at a given granularity.
//! - [`get_last_tense`]: tense governing an expression, from POS tags and a few
//!   lexical cues around it.
//! - [`resolve_placeholders`]: document-level rewrite of `UNDEF-` values using
//!   the two above and the document creation time.

mod mentioned;
mod placeholders;
mod tense;

pub use mentioned::{Granularity, get_last_mentioned_x};
pub use placeholders::resolve_placeholders;
pub(crate) use tense::TensePatterns;
pub use tense::{Tense, get_last_tense};
