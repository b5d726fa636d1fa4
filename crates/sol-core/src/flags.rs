//! Locale-specific solution flags, driven by the `[flags.<locale>]` tables.

use crate::locale::Locale;
use crate::settings::{settings, FlagRule};
use crate::unicode::match_words;

/// Named flag option offered for a locale; `bit` is the mask to test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagOption {
    pub name: String,
    pub bit: u32,
}

/// Flag options configured for `locale`.
pub fn flag_options(locale: &Locale) -> Vec<FlagOption> {
    settings()
        .flag_rules_for(locale)
        .iter()
        .enumerate()
        .map(|(i, rule)| FlagOption {
            name: rule.name.clone(),
            bit: 1 << i,
        })
        .collect()
}

/// Bitmask of the configured flags that apply to `text`.
pub fn compute_flags(locale: &Locale, text: &str) -> u32 {
    compute_flags_with(settings().flag_rules_for(locale), text)
}

pub(crate) fn compute_flags_with(rules: &[FlagRule], text: &str) -> u32 {
    if rules.is_empty() {
        return 0;
    }
    let words = match_words(text, false);
    let lowered = text.to_lowercase();
    let mut mask = 0u32;
    for (i, rule) in rules.iter().enumerate() {
        let word_hit = rule
            .words_any
            .iter()
            .any(|w| words.iter().any(|x| x == &w.to_lowercase()));
        let text_hit = rule
            .contains_any
            .iter()
            .any(|needle| lowered.contains(&needle.to_lowercase()));
        if word_hit || text_hit {
            mask |= 1 << i;
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_english_flags() {
        let en = Locale::new("en");
        let options = flag_options(&en);
        assert_eq!(options[0].name, "contraction");
        assert_eq!(options[1].bit, 2);

        assert_eq!(compute_flags(&en, "I'm happy"), 1);
        assert_eq!(compute_flags(&en, "I like the colour grey"), 2);
        assert_eq!(compute_flags(&en, "I don't like the colour"), 3);
        assert_eq!(compute_flags(&en, "I am happy"), 0);
    }

    #[test]
    fn test_chinese_variants_share_flags() {
        for code in ["zh-TW", "zs", "zt"] {
            let locale = Locale::new(code);
            assert_eq!(flag_options(&locale)[0].name, "traditional_characters");
            assert_eq!(compute_flags(&locale, "這是我的貓"), 1);
            assert_eq!(compute_flags(&locale, "这是我的猫"), 0);
        }
    }

    #[test]
    fn test_words_match_whole_words_only() {
        let fr = Locale::new("fr-FR");
        // "tuile" contains "tu" but is not the pronoun.
        assert_eq!(compute_flags(&fr, "La tuile est rouge"), 0);
        assert_eq!(compute_flags(&fr, "Tu es là"), 1);
        assert_eq!(compute_flags(&fr, "Vous êtes là"), 2);
    }

    #[test]
    fn test_unconfigured_locale_has_no_flags() {
        let it = Locale::new("it");
        assert!(flag_options(&it).is_empty());
        assert_eq!(compute_flags(&it, "Ciao, come stai?"), 0);
    }

    #[test]
    fn test_custom_rules() {
        let rules = vec![FlagRule {
            name: "exclaims".into(),
            words_any: vec![],
            contains_any: vec!["!".into()],
        }];
        assert_eq!(compute_flags_with(&rules, "Hi!"), 1);
        assert_eq!(compute_flags_with(&rules, "Hi."), 0);
    }
}
