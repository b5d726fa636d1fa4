use super::*;
use crate::locale::Locale;
use crate::solution::{ChallengeMeta, ParsedSolutions, SolutionList};

fn sentences(locale: &str, texts: &[&str]) -> ParsedSolutions {
    ParsedSolutions::from_sentences(
        texts.iter().map(|s| s.to_string()).collect(),
        &Locale::new(locale),
    )
}

#[test]
fn test_typo_against_scored_solutions() {
    let mut list = sentences("en", &["I am happy", "I was happy"]);
    list.solutions_mut()[0].score = Some(0.9);
    list.solutions_mut()[1].score = Some(0.5);

    let outcome = list.build_correction("I am hapy");
    let correction = outcome.correction().unwrap();
    assert_eq!(correction.reference, 0);
    assert_eq!(correction.variation, "I am happy");
    assert_eq!(
        correction.diff,
        vec![
            DiffSegment {
                kind: DiffKind::Unchanged,
                text: "I am ".into()
            },
            DiffSegment {
                kind: DiffKind::Removed,
                text: "hapy".into()
            },
            DiffSegment {
                kind: DiffKind::Added,
                text: "happy".into()
            },
        ]
    );
    assert_eq!(correction.render_inline(), "I am [-hapy-]{+happy+}");
}

#[test]
fn test_identical_variation_gives_no_correction() {
    let list = sentences("en", &["I am happy", "I was happy"]);
    assert_eq!(list.build_correction("i am happy."), CorrectionOutcome::None);
}

#[test]
fn test_unscored_list_considers_every_solution() {
    let list = sentences("en", &["He is happy", "He are happy"]);
    let outcome = list.build_correction("He are hapy");
    assert_eq!(outcome.correction().unwrap().reference, 1);
}

#[test]
fn test_best_score_subset_only() {
    let mut list = sentences("en", &["He is happy", "He are happy"]);
    list.solutions_mut()[0].score = Some(0.8);
    list.solutions_mut()[1].score = Some(0.2);
    let outcome = list.build_correction("He are hapy");
    assert_eq!(outcome.correction().unwrap().reference, 0);
}

#[test]
fn test_tie_broken_by_reference() {
    let list = sentences("en", &["I am sad", "I am mad"]);
    let outcome = list.build_correction("I am bad");
    let correction = outcome.correction().unwrap();
    // same group count and same changed length: earliest wins
    assert_eq!(correction.reference, 0);
}

#[test]
fn test_folded_solution_picks_closest_variation() {
    let mut list = ParsedSolutions::from_patterns(&["I [am/'m] happy".to_string()], &Locale::new("en"));
    list.score("I'm hapy");
    let outcome = list.build_correction("I'm hapy");
    assert_eq!(outcome.correction().unwrap().variation, "I'm happy");
}

#[test]
fn test_answer_equal_to_folded_variation_needs_no_correction() {
    let mut list = ParsedSolutions::from_patterns(
        &["[The/] cat and the dog".to_string(), "Cat and the dog a".to_string()],
        &Locale::new("en"),
    );
    list.score("cat and the dog");
    assert_eq!(list.best_solutions().len(), 1);
    assert_eq!(list.best_solutions()[0].reference, 0);
    assert_eq!(list.build_correction("cat and the dog"), CorrectionOutcome::None);
}

#[test]
fn test_empty_answer_and_empty_list() {
    let list = sentences("en", &["I am happy"]);
    assert_eq!(list.build_correction("   "), CorrectionOutcome::None);

    let empty = sentences("en", &[]);
    assert_eq!(empty.build_correction("hello"), CorrectionOutcome::None);
}

#[test]
fn test_unsupported_locale() {
    let list = sentences("ja", &["私は学生です"]);
    assert_eq!(list.build_correction("私は先生です"), CorrectionOutcome::Unsupported);
}

#[test]
fn test_unparsed_list_is_error() {
    let meta = ChallengeMeta {
        locale: Locale::new("en"),
        whitespace_delimited: true,
    };
    let list = SolutionList::unparsed(None, Some(vec!["hi".into()]), meta);
    assert!(matches!(build_correction(&list, "hi"), Err(SolutionError::NotParsed)));
}
