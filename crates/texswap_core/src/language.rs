use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::LanguageError;

/// A localized variant of the game's textures.
///
/// The declaration order is also the order in which a mapping entry's
/// languages are scanned during resolution.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "ES")]
    Spanish,
    #[serde(rename = "FR")]
    French,
    #[serde(rename = "DE")]
    German,
    #[serde(rename = "IT")]
    Italian,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
    ];

    /// The two letter code used as a key in mapping files.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::Spanish => "ES",
            Language::French => "FR",
            Language::German => "DE",
            Language::Italian => "IT",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "Deutsch",
            Language::Italian => "Italian",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    /// Accepts either the code (`fr`) or the display name (`French`), ignoring case.
    /// `German` is accepted alongside `Deutsch`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| {
                needle.eq_ignore_ascii_case(lang.code())
                    || needle.eq_ignore_ascii_case(lang.display_name())
            })
            .or_else(|| needle.eq_ignore_ascii_case("german").then_some(Language::German))
            .ok_or_else(|| LanguageError::Unknown(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::English);
        assert_eq!("fr".parse::<Language>().unwrap(), Language::French);
        assert_eq!(" Deutsch ".parse::<Language>().unwrap(), Language::German);
        assert_eq!("german".parse::<Language>().unwrap(), Language::German);
        assert_eq!("italian".parse::<Language>().unwrap(), Language::Italian);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "JP".parse::<Language>().unwrap_err();
        assert!(matches!(err, LanguageError::Unknown(ref code) if code == "JP"));
    }

    #[test]
    fn test_scan_order_follows_declaration() {
        let mut langs = vec![Language::Italian, Language::English, Language::German];
        langs.sort();
        assert_eq!(
            langs,
            vec![Language::English, Language::German, Language::Italian]
        );
        assert_eq!(Language::ALL.map(|l| l.code()), ["EN", "ES", "FR", "DE", "IT"]);
    }
}
