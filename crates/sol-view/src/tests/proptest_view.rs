//! Property-based tests for resumable matching, narrowing and pagination.

use proptest::prelude::*;

use super::make_list;
use crate::filter::{MatchState, StepBudget, WordMatchCache};
use crate::{ListView, MatchType, PageSize, ViewParams, WordFilter};

fn arb_word() -> impl Strategy<Value = String> {
    "[abc]{1,4}"
}

fn arb_match_type() -> impl Strategy<Value = MatchType> {
    prop_oneof![
        Just(MatchType::Exact),
        Just(MatchType::Start),
        Just(MatchType::End),
        Just(MatchType::Anywhere),
    ]
}

fn one_pass(query: &str, words: &[String], match_type: MatchType) -> MatchState {
    WordMatchCache::new().match_words(query, 0, words, match_type, &mut StepBudget::unlimited())
}

proptest! {
    #[test]
    fn prop_interrupted_matching_agrees(
        words in prop::collection::vec(arb_word(), 0..8),
        query in arb_word(),
        match_type in arb_match_type(),
        step in 1usize..3,
    ) {
        let expected = one_pass(&query, &words, match_type);
        let mut cache = WordMatchCache::new();
        let mut state = MatchState::Pending;
        for _ in 0..=words.len() {
            state = cache.match_words(&query, 0, &words, match_type, &mut StepBudget::limited(step));
            if state != MatchState::Pending {
                break;
            }
        }
        prop_assert_eq!(state, expected);
    }

    #[test]
    fn prop_warm_cache_agrees(
        words in prop::collection::vec(arb_word(), 0..8),
        query in arb_word(),
        first in arb_match_type(),
        second in arb_match_type(),
    ) {
        let mut cache = WordMatchCache::new();
        cache.match_words(&query, 3, &words, first, &mut StepBudget::unlimited());
        let warm = cache.match_words(&query, 3, &words, second, &mut StepBudget::unlimited());
        prop_assert_eq!(warm, one_pass(&query, &words, second));
    }

    #[test]
    fn prop_narrowing_matches_fresh_view(
        sentences in prop::collection::vec(prop::collection::vec(arb_word(), 1..4), 1..12),
        filters in prop::collection::vec((arb_word(), arb_match_type(), any::<bool>()), 1..4),
    ) {
        let texts: Vec<String> = sentences.iter().map(|s| s.join(" ")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let list = make_list("en", &refs);
        let filters: Vec<WordFilter> = filters
            .into_iter()
            .map(|(word, match_type, exclude)| WordFilter { word, match_type, exclude })
            .collect();

        let mut incremental = ListView::new();
        let mut params = ViewParams { page_size: PageSize::All, ..ViewParams::default() };
        incremental.refresh(&list, &params);
        for filter in &filters {
            params.filters.push(filter.clone());
            incremental.refresh(&list, &params);
        }

        let mut fresh = ListView::new();
        fresh.refresh(&list, &params);
        prop_assert_eq!(incremental.filtered(), fresh.filtered());
        prop_assert_eq!(incremental.sorted(), fresh.sorted());
    }

    #[test]
    fn prop_view_resize_keeps_top_item(
        count in 1usize..150,
        old in prop::sample::select(vec![10usize, 20, 50, 100]),
        new in prop::sample::select(vec![10usize, 20, 50, 100]),
        page_seed in 0usize..20,
    ) {
        let texts: Vec<String> = (0..count).map(|i| format!("item {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let list = make_list("en", &refs);
        let mut view = ListView::new();

        let old = PageSize::Fixed(old);
        let mut params = ViewParams {
            page: page_seed % old.page_count(count),
            page_size: old,
            ..ViewParams::default()
        };
        let before = view.refresh(&list, &params);
        let top = before.items[0];

        let new = PageSize::Fixed(new);
        params.page = crate::resize_page(params.page, old, new);
        params.page_size = new;
        let after = view.refresh(&list, &params);
        prop_assert!(after.items.contains(&top));
    }
}
