//! Culture used when reading numbers and dates
//!
//! The locale decides the decimal separator and the order of day and month
//! in slash dates. Unknown codes are kept in `Other` and read like the
//! European cultures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Locale for entity recognition
///
/// # Examples
///
/// ```
/// use trade_bot::recognizer::Locale;
///
/// let locale = Locale::from_code("es-ES");
/// assert_eq!(locale, Locale::Spanish);
/// assert_eq!(locale.decimal_separator(), ',');
/// assert!(Locale::English.month_first());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    /// English (United States conventions)
    #[default]
    English,
    Spanish,
    French,
    German,
    /// Other cultures (BCP 47 code)
    Other(String),
}

impl Locale {
    /// Primary language subtag
    pub fn code(&self) -> &str {
        match self {
            Locale::English => "en",
            Locale::Spanish => "es",
            Locale::French => "fr",
            Locale::German => "de",
            Locale::Other(code) => code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Locale::English => "English",
            Locale::Spanish => "Spanish",
            Locale::French => "French",
            Locale::German => "German",
            Locale::Other(code) => code,
        }
    }

    /// Parse a culture code such as `en-us`, `es` or `German`
    pub fn from_code(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "english" => Locale::English,
            "es" | "spanish" => Locale::Spanish,
            "fr" | "french" => Locale::French,
            "de" | "german" => Locale::German,
            _ => Locale::Other(lower),
        }
    }

    pub fn decimal_separator(&self) -> char {
        match self {
            Locale::English => '.',
            _ => ',',
        }
    }

    pub fn thousands_separator(&self) -> char {
        match self {
            Locale::English => ',',
            _ => '.',
        }
    }

    /// Whether `03/01/2024` means March 1st
    pub fn month_first(&self) -> bool {
        matches!(self, Locale::English)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Locale {
    fn from(s: &str) -> Self {
        Locale::from_code(s)
    }
}
