use thiserror::Error;

/// Errors raised while building a rule set or parsing configuration values.
///
/// Everything here is an authoring or configuration defect: the rule text,
/// resource or setting has to be fixed before the tagger can run. Data-dependent
/// conditions (malformed lines, duplicates, missing POS tags) never surface
/// as an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("rule {rule}: pattern variable %{name} does not exist")]
    UnknownPattern { rule: String, name: String },

    #[error("rule {rule}: cannot compile pattern {pattern:?}: {source}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule {rule}: cannot compile POS constraint {pattern:?}: {source}")]
    InvalidConstraint {
        rule: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    #[error("unknown granularity '{0}'")]
    UnknownGranularity(String),

    #[error("unknown document type '{0}' (expected news or narrative)")]
    UnknownDocumentType(String),

    #[error("{resource}:{line}: {message}")]
    InvalidResource { resource: String, line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
