use super::*;
use crate::graph::Vertex;

fn meta(locale: &str) -> ChallengeMeta {
    ChallengeMeta {
        locale: Locale::new(locale),
        whitespace_delimited: true,
    }
}

fn two_by_one() -> SolutionGraph {
    SolutionGraph::new(
        vec![vec![Vertex::new("a"), Vertex::new("b")], vec![Vertex::new("x")]],
        true,
    )
}

fn texts(list: &ParsedSolutions) -> Vec<String> {
    list.solutions().iter().map(Solution::text).collect()
}

#[test]
fn test_graph_list_parses_to_every_path() {
    let mut list = SolutionList::unparsed(Some(two_by_one()), None, meta("en"));
    assert!(!list.is_parsed());
    let parsed = list.ensure_parsed(ListKind::Expanded).unwrap();
    assert_eq!(parsed.kind(), ListKind::Expanded);
    assert_eq!(texts(parsed), ["a x", "b x"]);
    let refs: Vec<usize> = parsed.solutions().iter().map(|s| s.reference).collect();
    assert_eq!(refs, [0, 1]);
    assert!(list.is_parsed());
}

#[test]
fn test_preferred_kind_with_fallback() {
    let patterns = Some(vec!["I [am/'m] happy".to_string()]);

    let mut both = SolutionList::unparsed(Some(two_by_one()), patterns.clone(), meta("en"));
    assert_eq!(both.ensure_parsed(ListKind::Compact).unwrap().kind(), ListKind::Compact);

    let mut graph_only = SolutionList::unparsed(Some(two_by_one()), None, meta("en"));
    assert_eq!(
        graph_only.ensure_parsed(ListKind::Compact).unwrap().kind(),
        ListKind::Expanded
    );

    let mut patterns_only = SolutionList::unparsed(None, patterns, meta("en"));
    let parsed = patterns_only.ensure_parsed(ListKind::Expanded).unwrap();
    assert_eq!(parsed.kind(), ListKind::Compact);
    assert_eq!(texts(parsed), ["I [am/'m] happy"]);
}

#[test]
fn test_second_parse_keeps_first_result() {
    let patterns = Some(vec!["hello".to_string()]);
    let mut list = SolutionList::unparsed(Some(two_by_one()), patterns, meta("en"));
    list.ensure_parsed(ListKind::Expanded).unwrap();
    let again = list.ensure_parsed(ListKind::Compact).unwrap();
    assert_eq!(again.kind(), ListKind::Expanded);
    assert_eq!(again.len(), 2);
}

#[test]
fn test_nothing_to_parse_gives_empty_list() {
    let mut list = SolutionList::unparsed(None, None, meta("fr"));
    let parsed = list.ensure_parsed(ListKind::Compact).unwrap();
    assert!(parsed.is_empty());
    assert_eq!(parsed.kind(), ListKind::Compact);
    assert_eq!(parsed.locale().as_str(), "fr");
}

#[test]
fn test_malformed_graph_leaves_list_unparsed() {
    let graph = SolutionGraph::new(
        vec![vec![Vertex::with_next("a", vec![3])], vec![Vertex::new("x")]],
        true,
    );
    let mut list = SolutionList::unparsed(Some(graph), None, meta("en"));
    let err = list.ensure_parsed(ListKind::Expanded).unwrap_err();
    assert!(matches!(err, SolutionError::MalformedGraph { target: 3, .. }));
    assert!(!list.is_parsed());
    assert!(matches!(list.parsed(), Err(SolutionError::NotParsed)));
}

#[test]
fn test_folded_solution_variations() {
    let list = ParsedSolutions::from_patterns(&["I [am/'m] happy".to_string()], &Locale::new("en"));
    let solution = list.get(0).unwrap();
    assert!(solution.is_folded());
    assert_eq!(solution.variation_count(), 2);
    assert_eq!(solution.variations(), ["I am happy", "I'm happy"]);
    assert!(list.get(1).is_none());
}

#[test]
fn test_word_bank_join() {
    let tokens = vec![vec!["I".to_string(), "am".to_string(), "happy".to_string()]];
    let spaced = ParsedSolutions::from_word_bank(tokens, &Locale::new("en"), true);
    assert_eq!(texts(&spaced), ["I am happy"]);

    let tokens = vec![vec!["私".to_string(), "は".to_string(), "学生".to_string()]];
    let joined = ParsedSolutions::from_word_bank(tokens, &Locale::new("ja"), false);
    assert_eq!(texts(&joined), ["私は学生"]);
}

#[test]
fn test_flags_follow_locale_table() {
    let list = ParsedSolutions::from_sentences(
        vec!["I'm happy".to_string(), "I am happy".to_string()],
        &Locale::new("en"),
    );
    // bit 0 is the English contraction flag
    assert_eq!(list.solutions()[0].flags & 1, 1);
    assert_eq!(list.solutions()[1].flags & 1, 0);
}

#[test]
fn test_duplicate_sentences_are_kept() {
    let graph = SolutionGraph::new(
        vec![vec![Vertex::new("a"), Vertex::new("a")], vec![Vertex::new("x")]],
        true,
    );
    let list = ParsedSolutions::from_graph(&graph, &Locale::new("en")).unwrap();
    assert_eq!(texts(&list), ["a x", "a x"]);
}
