//! Locale identifiers and the locale-keyed lookups built on the settings tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::settings;

/// A language/script identifier such as `en`, `pt-BR` or `zh-TW`.
///
/// Stored lowercased with `_` replaced by `-` so that payloads using either
/// convention compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase().replace('_', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag (`pt` for `pt-br`).
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or("")
    }

    /// Identical locales, or both members of the simplified/traditional
    /// Chinese pair.
    pub fn is_equivalent(&self, other: &Locale) -> bool {
        settings().locales.are_equivalent(&self.0, &other.0)
    }

    /// Whether matching operates on word lists (true) or whole-string
    /// summaries (false).
    pub fn is_word_based(&self) -> bool {
        is_word_based_locale(self)
    }

    /// Correction diffs are skipped for logographic locales.
    pub fn supports_correction(&self) -> bool {
        let primary = self.primary();
        !settings()
            .locales
            .correction_unsupported
            .iter()
            .any(|l| l == primary || l == &self.0)
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Self::new(&code)
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locale-keyed lookup: most locales match on words; scripts without
/// whitespace-delimited tokens match on summaries.
pub fn is_word_based_locale(locale: &Locale) -> bool {
    let primary = locale.primary();
    !settings()
        .locales
        .summary_based
        .iter()
        .any(|l| l == primary || l == locale.as_str())
}
