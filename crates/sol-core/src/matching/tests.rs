use std::collections::BTreeSet;

use super::score::{score_answer, word_similarity};
use super::*;
use crate::graph::{SolutionGraph, Vertex};
use crate::locale::Locale;
use crate::solution::{ChallengeMeta, ListKind, ParsedSolutions, SolutionList};

fn sentences(locale: &str, texts: &[&str]) -> ParsedSolutions {
    ParsedSolutions::from_sentences(
        texts.iter().map(|s| s.to_string()).collect(),
        &Locale::new(locale),
    )
}

fn opts(ignore_diacritics: bool, ignore_word_order: bool) -> MatchingOptions {
    MatchingOptions {
        ignore_diacritics,
        ignore_word_order,
    }
}

#[test]
fn test_word_set_is_union_of_word_lists() {
    let mut list = sentences("en", &["The cat sleeps.", "A cat sleeps!", "The dog, sleeping"]);
    assert!(list.build_matching(opts(false, false)));

    let mut union = BTreeSet::new();
    for s in list.solutions() {
        union.extend(s.matching().unwrap().words().unwrap().iter().cloned());
    }
    let word_set = list.matching().unwrap().word_set.clone().unwrap();
    assert_eq!(word_set, union.into_iter().collect::<Vec<_>>());
    assert_eq!(word_set, vec!["a", "cat", "dog", "sleeping", "sleeps", "the"]);
}

#[test]
fn test_build_is_noop_when_built() {
    let mut list = sentences("en", &["Hello"]);
    assert!(list.build_matching(opts(false, false)));
    assert!(!list.build_matching(opts(true, true)));
    assert!(!list.matching().unwrap().options.ignore_diacritics);
}

#[test]
fn test_unparsed_list_is_not_parsed_error() {
    let meta = ChallengeMeta {
        locale: Locale::new("en"),
        whitespace_delimited: true,
    };
    let graph = SolutionGraph::new(vec![vec![Vertex::new("hi")]], true);
    let mut list = SolutionList::unparsed(Some(graph), None, meta);
    let err = build_list_matching_data(&mut list, MatchingOptions::default()).unwrap_err();
    assert!(matches!(err, SolutionError::NotParsed));
    assert!(matches!(score_answer(&mut list, "hi"), Err(SolutionError::NotParsed)));

    list.ensure_parsed(ListKind::Expanded).unwrap();
    build_list_matching_data(&mut list, MatchingOptions::default()).unwrap();
    assert!(list.parsed().unwrap().matching().is_some());
}

#[test]
fn test_diacritics_stripped_only_for_matching() {
    let mut list = sentences("fr", &["Ça va très bien"]);
    list.build_matching(opts(true, false));
    let s = &list.solutions()[0];
    assert_eq!(s.text(), "Ça va très bien");
    assert_eq!(s.matching().unwrap().words().unwrap(), ["ca", "va", "tres", "bien"]);
}

#[test]
fn test_word_order_option_sorts_words() {
    let mut list = sentences("en", &["happy I am"]);
    list.build_matching(opts(false, true));
    assert_eq!(
        list.solutions()[0].matching().unwrap().words().unwrap(),
        ["am", "happy", "i"]
    );
}

#[test]
fn test_summary_locale_has_no_word_set() {
    let mut list = sentences("zh-CN", &["我喜欢猫。", "我爱猫"]);
    list.build_matching(opts(false, false));
    assert!(!list.matching().unwrap().is_word_based());
    assert_eq!(list.solutions()[0].matching().unwrap().summary(), Some("我喜欢猫"));
}

#[test]
fn test_identical_answer_scores_highest() {
    let mut list = sentences("en", &["I am happy", "I was happy", "We are happy", "I am very happy"]);
    let best = list.score("  i AM happy ").unwrap();
    assert!((best - 1.0).abs() < 1e-12);
    let top = list
        .solutions()
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
        .unwrap();
    assert_eq!(top.reference, 0);
    for s in &list.solutions()[1..] {
        assert!(s.score.unwrap() < 1.0);
    }
}

#[test]
fn test_typo_prefers_closest_solution() {
    let mut list = sentences("en", &["I am happy", "I was happy"]);
    list.score("I am hapy");
    let scores: Vec<f64> = list.solutions().iter().map(|s| s.score.unwrap()).collect();
    assert!(scores[0] > scores[1]);
    assert!(scores[0] < 1.0);
}

#[test]
fn test_word_order_matters_unless_ignored() {
    let mut ordered = sentences("en", &["I am happy"]);
    ordered.build_matching(opts(false, false));
    ordered.score("happy am I");
    assert!(ordered.solutions()[0].score.unwrap() < 1.0);

    let mut unordered = sentences("en", &["I am happy"]);
    unordered.build_matching(opts(false, true));
    unordered.score("happy am I");
    assert!((unordered.solutions()[0].score.unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_ignore_diacritics_in_scoring() {
    let mut list = sentences("es", &["Él está aquí"]);
    list.build_matching(opts(true, false));
    list.score("El esta aqui");
    assert!((list.solutions()[0].score.unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn test_empty_answer_clears_scores() {
    let mut list = sentences("en", &["I am happy", "I was happy"]);
    list.score("I am happy");
    assert!(list.has_scores());
    assert_eq!(list.score("   "), None);
    assert_eq!(list.score("?!"), None);
    assert!(!list.has_scores());
}

#[test]
fn test_rescoring_overwrites() {
    let mut list = sentences("en", &["I am happy", "I was happy"]);
    list.score("I was happy");
    assert!(list.solutions()[1].score.unwrap() > list.solutions()[0].score.unwrap());
    list.score("I am happy");
    assert!(list.solutions()[0].score.unwrap() > list.solutions()[1].score.unwrap());
}

#[test]
fn test_summary_scoring() {
    let mut list = sentences("ja", &["私は学生です", "彼は先生です"]);
    list.score("私は学生です。");
    let s: Vec<f64> = list.solutions().iter().map(|s| s.score.unwrap()).collect();
    assert!((s[0] - 1.0).abs() < 1e-12);
    assert!(s[1] < s[0]);
}

#[test]
fn test_folded_solution_scores_best_variation() {
    let mut list = ParsedSolutions::from_patterns(
        &["I [am/'m] happy".to_string(), "I [was/were] sad".to_string()],
        &Locale::new("en"),
    );
    list.score("I'm happy");
    let s: Vec<f64> = list.solutions().iter().map(|s| s.score.unwrap()).collect();
    assert!((s[0] - 1.0).abs() < 1e-12);
    assert!(s[1] < 0.5);
}

#[test]
fn test_omitted_optional_word_scores_as_identical() {
    let mut list = ParsedSolutions::from_patterns(
        &["[The/] cat and the dog".to_string(), "Cat and the dog a".to_string()],
        &Locale::new("en"),
    );
    let best = list.score("cat and the dog");
    let s: Vec<f64> = list.solutions().iter().map(|s| s.score.unwrap()).collect();
    assert!((s[0] - 1.0).abs() < 1e-12);
    assert!(s[1] < s[0]);
    assert_eq!(best, Some(s[0]));
}

#[test]
fn test_word_similarity() {
    assert!((word_similarity("happy", "happy") - 1.0).abs() < 1e-12);
    assert!(word_similarity("happy", "hapy") > word_similarity("happy", "sad"));
    assert_eq!(word_similarity("abc", "xyz"), 0.0);
}
