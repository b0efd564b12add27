use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Languages the platform transcribes, translates and converses in.
///
/// The declaration order is the canonical iteration order used when
/// populating transcript caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Yoruba,
    Hausa,
    Igbo,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    /// Every supported language, English first.
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Yoruba,
        Language::Hausa,
        Language::Igbo,
    ];

    /// Wire/storage code, e.g. `"yoruba"`.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Yoruba => "yoruba",
            Language::Hausa => "hausa",
            Language::Igbo => "igbo",
        }
    }

    /// Human readable name used in prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Yoruba => "Yoruba",
            Language::Hausa => "Hausa",
            Language::Igbo => "Igbo",
        }
    }

    /// All supported languages except `self`.
    pub fn others(&self) -> impl Iterator<Item = Language> + '_ {
        Self::ALL.into_iter().filter(move |lang| lang != self)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "yoruba" | "yo" => Ok(Language::Yoruba),
            "hausa" | "ha" => Ok(Language::Hausa),
            "igbo" | "ig" => Ok(Language::Igbo),
            _ => Err(UnsupportedLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Yoruba".parse::<Language>().unwrap(), Language::Yoruba);
        assert_eq!(" HAUSA ".parse::<Language>().unwrap(), Language::Hausa);
        assert_eq!("ig".parse::<Language>().unwrap(), Language::Igbo);
        assert!("french".parse::<Language>().is_err());
    }

    #[test]
    fn test_others_excludes_self_in_canonical_order() {
        let others: Vec<Language> = Language::English.others().collect();
        assert_eq!(others, vec![Language::Yoruba, Language::Hausa, Language::Igbo]);

        let others: Vec<Language> = Language::Hausa.others().collect();
        assert_eq!(others, vec![Language::English, Language::Yoruba, Language::Igbo]);
    }

    #[test]
    fn test_serde_uses_lowercase_codes() {
        let json = serde_json::to_string(&Language::Igbo).unwrap();
        assert_eq!(json, "\"igbo\"");

        let map: std::collections::BTreeMap<Language, String> =
            serde_json::from_str(r#"{"yoruba":"E kaaro","english":"Good morning"}"#).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![Language::English, Language::Yoruba]);
    }
}
