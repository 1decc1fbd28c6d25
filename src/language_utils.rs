use anyhow::{Result, anyhow};
use isolang::Language as IsoLanguage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language utilities for subtitle language selection
///
/// The `Language` enum declares every language carried by a voiceover line.
/// Its declaration order is the index order of the persisted `langObjects`
/// array and of the `timestamps_<lang>` / `lines_<lang>` source columns, so
/// adding a language means adding both the variant and the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Jp,
}

impl Language {
    /// Number of declared languages
    pub const COUNT: usize = 2;

    /// All languages in declaration order
    pub const ALL: [Language; Language::COUNT] = [Language::En, Language::Jp];

    /// Position of this language in `langObjects`
    pub fn index(self) -> usize {
        match self {
            Self::En => 0,
            Self::Jp => 1,
        }
    }

    /// Lowercase suffix used in source column names
    pub fn column_suffix(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Jp => "jp",
        }
    }

    /// Name of the timestamps column for this language
    pub fn timestamps_column(self) -> String {
        format!("timestamps_{}", self.column_suffix())
    }

    /// Name of the lines column for this language
    pub fn lines_column(self) -> String {
        format!("lines_{}", self.column_suffix())
    }

    fn iso(self) -> IsoLanguage {
        match self {
            Self::En => IsoLanguage::Eng,
            Self::Jp => IsoLanguage::Jpn,
        }
    }

    /// English name of the language
    pub fn display_name(self) -> &'static str {
        self.iso().to_name()
    }

    /// Name of the language in itself, falling back to the English name
    pub fn native_name(self) -> &'static str {
        self.iso().to_autonym().unwrap_or_else(|| self.display_name())
    }

    /// Resolve a language from a column suffix, an ISO 639-1/639-3 code or an English name
    pub fn from_code(code: &str) -> Result<Self> {
        let normalized_code = code.trim().to_lowercase();

        for language in Self::ALL {
            if normalized_code == language.column_suffix() {
                return Ok(language);
            }

            let iso = language.iso();
            let matches_part1 = iso.to_639_1().is_some_and(|c| c == normalized_code);
            let matches_part3 = iso.to_639_3() == normalized_code;
            let matches_name = iso.to_name().eq_ignore_ascii_case(&normalized_code);

            if matches_part1 || matches_part3 || matches_name {
                return Ok(language);
            }
        }

        Err(anyhow!("Unsupported subtitle language: {}", code))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_suffix().to_uppercase())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}
