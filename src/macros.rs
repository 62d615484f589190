/// Compile a literal regular expression once and hand out a `&'static Regex`.
///
/// Only for patterns written in this crate; authored rule patterns go through
/// the compiler and report their errors instead.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}
