use crate::Category;
use crate::language::Language;

/// Resource texts for one language, embedded at build time.
#[derive(Debug)]
pub(crate) struct Bundle {
    pub patterns: &'static str,
    pub normalization: &'static str,
    daterules: &'static str,
    timerules: &'static str,
    durationrules: &'static str,
    setrules: &'static str,
    temponymrules: &'static str,
}

impl Bundle {
    pub fn rules(&self, category: Category) -> &'static str {
        match category {
            Category::Date => self.daterules,
            Category::Time => self.timerules,
            Category::Duration => self.durationrules,
            Category::Set => self.setrules,
            Category::Temponym => self.temponymrules,
        }
    }
}

macro_rules! bundle {
    ($dir:literal) => {
        Bundle {
            patterns: include_str!(concat!("../../resources/", $dir, "/patterns.txt")),
            normalization: include_str!(concat!("../../resources/", $dir, "/normalization.txt")),
            daterules: include_str!(concat!("../../resources/", $dir, "/daterules.txt")),
            timerules: include_str!(concat!("../../resources/", $dir, "/timerules.txt")),
            durationrules: include_str!(concat!("../../resources/", $dir, "/durationrules.txt")),
            setrules: include_str!(concat!("../../resources/", $dir, "/setrules.txt")),
            temponymrules: include_str!(concat!("../../resources/", $dir, "/temponymrules.txt")),
        }
    };
}

static ENGLISH: Bundle = bundle!("english");
static GERMAN: Bundle = bundle!("german");
static FRENCH: Bundle = bundle!("french");

pub(crate) fn bundle(language: Language) -> &'static Bundle {
    match language {
        Language::English => &ENGLISH,
        Language::German => &GERMAN,
        Language::French => &FRENCH,
    }
}
