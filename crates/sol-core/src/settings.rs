//! Global settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`
//!
//! The locale tables and flag rules here are the only state shared between
//! challenge sessions; they are immutable once initialized.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::locale::Locale;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub locales: LocaleSettings,
    pub matching: MatchingSettings,
    pub view: ViewSettings,
    pub export: ExportSettings,
    /// Flag rules keyed by primary language subtag. A rule's bit is its index.
    #[serde(default)]
    flags: BTreeMap<String, Vec<FlagRule>>,
}

impl Settings {
    /// Flag rules for a primary language subtag (empty if none configured).
    pub fn flag_rules(&self, primary: &str) -> &[FlagRule] {
        self.flags.get(primary).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flag rules for `locale`: its primary subtag, its full code, then
    /// the first configured locale equivalent to it.
    pub fn flag_rules_for(&self, locale: &Locale) -> &[FlagRule] {
        [locale.primary(), locale.as_str()]
            .iter()
            .find_map(|key| self.flags.get(*key))
            .or_else(|| {
                self.flags
                    .iter()
                    .find(|(key, _)| self.locales.are_equivalent(key, locale.as_str()))
                    .map(|(_, rules)| rules)
            })
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocaleSettings {
    pub summary_based: Vec<String>,
    pub correction_unsupported: Vec<String>,
    pub chinese_variants: Vec<String>,
}

impl LocaleSettings {
    /// Identical codes, or both members of the Chinese variant set.
    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        a == b || (self.chinese_variants.iter().any(|v| v == a) && self.chinese_variants.iter().any(|v| v == b))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    pub ignore_diacritics: bool,
    pub ignore_word_order: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewSettings {
    pub page_sizes: Vec<usize>,
    pub default_page_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    pub confirm_threshold: usize,
}

/// One locale-specific flag: set when any solution word is in `words_any`
/// or the text contains any of `contains_any`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlagRule {
    pub name: String,
    #[serde(default)]
    pub words_any: Vec<String>,
    #[serde(default)]
    pub contains_any: Vec<String>,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_empty {
        ($section:ident . $field:ident) => {
            if s.$section.$field.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        };
    }

    check_positive_usize!(view.default_page_size);
    check_positive_usize!(export.confirm_threshold);
    check_non_empty!(view.page_sizes);

    if s.view.page_sizes.contains(&0) {
        return Err(SettingsError::InvalidValue {
            field: "view.page_sizes".to_string(),
            reason: "sizes must be positive".to_string(),
        });
    }
    if !s.view.page_sizes.contains(&s.view.default_page_size) {
        return Err(SettingsError::InvalidValue {
            field: "view.default_page_size".to_string(),
            reason: "must be one of view.page_sizes".to_string(),
        });
    }

    for (locale, rules) in &s.flags {
        // Bitmask is u32.
        if rules.len() > 32 {
            return Err(SettingsError::InvalidValue {
                field: format!("flags.{locale}"),
                reason: "at most 32 flags per locale".to_string(),
            });
        }
        for rule in rules {
            if rule.words_any.is_empty() && rule.contains_any.is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: format!("flags.{locale}.{}", rule.name),
                    reason: "needs words_any or contains_any".to_string(),
                });
            }
        }
    }

    Ok(())
}
