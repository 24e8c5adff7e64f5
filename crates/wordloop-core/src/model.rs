//! Core data model types for wordloop.
//!
//! Languages, raw catalog entries as produced by a data source, and the
//! key normalization every other component relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported drill languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "de")]
    German,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Every language, in display order.
    pub const ALL: [Language; 4] = [
        Language::German,
        Language::Japanese,
        Language::Spanish,
        Language::English,
    ];

    /// Short ISO 639-1 code (e.g. "de").
    pub fn code(&self) -> &'static str {
        match self {
            Language::German => "de",
            Language::Japanese => "ja",
            Language::Spanish => "es",
            Language::English => "en",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Language::German => "German",
            Language::Japanese => "Japanese",
            Language::Spanish => "Spanish",
            Language::English => "English",
        }
    }

    /// BCP-47 tag used for synthesis and the fallback voice.
    pub fn bcp47(&self) -> &'static str {
        match self {
            Language::German => "de-DE",
            Language::Japanese => "ja-JP",
            Language::Spanish => "es-ES",
            Language::English => "en-US",
        }
    }

    /// Name of the word package shipped for this language.
    pub fn default_package(&self) -> String {
        format!("mini-{}-package-k3", self.label().to_lowercase())
    }

    /// Leading articles stripped from display words when building keys.
    pub fn leading_articles(&self) -> &'static [&'static str] {
        match self {
            Language::German => &["der", "die", "das"],
            Language::Spanish => &["el", "la", "los", "las"],
            Language::Japanese | Language::English => &[],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "de" | "german" => Ok(Language::German),
            "ja" | "japanese" => Ok(Language::Japanese),
            "es" | "spanish" => Ok(Language::Spanish),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// One raw row yielded by a catalog source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// The word as written in the source (e.g. "der Hund").
    pub raw_word: String,
    /// Identifier of the entry inside its package.
    pub catalog_id: String,
    /// Image references for this entry, in source order.
    pub images: Vec<String>,
}

impl CatalogEntry {
    pub fn new(
        raw_word: impl Into<String>,
        catalog_id: impl Into<String>,
        images: Vec<String>,
    ) -> Self {
        Self {
            raw_word: raw_word.into(),
            catalog_id: catalog_id.into(),
            images,
        }
    }
}

/// Normalize a display word into its catalog key.
///
/// Lowercases, trims, and strips the language's leading articles. Stripping
/// repeats until no article prefix is left, so the function is idempotent.
pub fn normalize_word(raw: &str, language: Language) -> String {
    let mut key = raw.to_lowercase().trim().to_string();
    'strip: loop {
        for article in language.leading_articles() {
            if let Some(rest) = key.strip_prefix(article) {
                if rest.starts_with(char::is_whitespace) {
                    key = rest.trim().to_string();
                    continue 'strip;
                }
            }
        }
        break;
    }
    key
}
