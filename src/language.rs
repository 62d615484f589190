use crate::error::{Error, Result};
use crate::resources::{self, LanguageResources};
use std::fmt;
use std::str::FromStr;

/// Languages with a bundled rule resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    German,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::German, Language::French];

    /// Lowercase language name; also the resource folder name.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::German => "german",
            Language::French => "french",
        }
    }

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::French => "fr",
        }
    }

    /// Parsed pattern, normalization and tense tables for this language.
    ///
    /// Loaded on first use and shared for the life of the process.
    pub(crate) fn resources(self) -> Result<&'static LanguageResources> {
        resources::load(self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts the language name or its ISO code, in any case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted || lang.code() == wanted)
            .ok_or_else(|| Error::UnknownLanguage(s.to_string()))
    }
}
