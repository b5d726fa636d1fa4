//! Pagination.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use sol_core::settings::settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    Fixed(usize),
    All,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Fixed(settings().view.default_page_size)
    }
}

impl PageSize {
    /// Configured fixed sizes followed by `All`.
    pub fn choices() -> Vec<PageSize> {
        settings()
            .view
            .page_sizes
            .iter()
            .map(|&n| Self::Fixed(n))
            .chain(std::iter::once(Self::All))
            .collect()
    }

    /// `None` for `All`. A zero fixed size is treated as one.
    fn fixed(self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(n.max(1)),
            Self::All => None,
        }
    }

    /// Number of pages for `total` items; never less than one.
    pub fn page_count(self, total: usize) -> usize {
        match self.fixed() {
            Some(n) => total.div_ceil(n).max(1),
            None => 1,
        }
    }

    /// Index range of `page` (clamped to the last page).
    pub fn bounds(self, page: usize, total: usize) -> Range<usize> {
        match self.fixed() {
            Some(n) => {
                let page = page.min(self.page_count(total) - 1);
                let start = (page * n).min(total);
                start..(start + n).min(total)
            }
            None => 0..total,
        }
    }
}

/// Page to show after switching from `old` to `new` so that the item at
/// the top of page `page` stays visible.
pub fn resize_page(page: usize, old: PageSize, new: PageSize) -> usize {
    let top = match old.fixed() {
        Some(n) => page.saturating_mul(n),
        None => 0,
    };
    match new.fixed() {
        Some(n) => top / n,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_count() {
        assert_eq!(PageSize::Fixed(20).page_count(100), 5);
        assert_eq!(PageSize::Fixed(20).page_count(101), 6);
        assert_eq!(PageSize::Fixed(20).page_count(0), 1);
        assert_eq!(PageSize::All.page_count(1000), 1);
    }

    #[test]
    fn test_bounds_clamp() {
        assert_eq!(PageSize::Fixed(20).bounds(2, 100), 40..60);
        assert_eq!(PageSize::Fixed(20).bounds(4, 90), 80..90);
        assert_eq!(PageSize::Fixed(20).bounds(9, 90), 80..90);
        assert_eq!(PageSize::All.bounds(3, 7), 0..7);
        assert_eq!(PageSize::Fixed(20).bounds(0, 0), 0..0);
    }

    #[test]
    fn test_item_41_of_100() {
        // item 41 is index 40, top of page 2 at size 20
        let page = 2;
        assert_eq!(PageSize::Fixed(20).bounds(page, 100).start, 40);
        let new_page = resize_page(page, PageSize::Fixed(20), PageSize::Fixed(50));
        assert_eq!(new_page, 0);
        assert!(PageSize::Fixed(50).bounds(new_page, 100).contains(&40));
    }

    #[test]
    fn test_resize_to_and_from_all() {
        assert_eq!(resize_page(3, PageSize::Fixed(10), PageSize::All), 0);
        assert_eq!(resize_page(0, PageSize::All, PageSize::Fixed(10)), 0);
    }

    #[test]
    fn test_choices_end_with_all() {
        let choices = PageSize::choices();
        assert_eq!(choices.last(), Some(&PageSize::All));
        assert!(choices.contains(&PageSize::default()));
    }

    proptest! {
        #[test]
        fn prop_resize_keeps_top_item(
            total in 1usize..500,
            old in 1usize..120,
            new in 1usize..120,
            page_seed in 0usize..1000,
        ) {
            let old = PageSize::Fixed(old);
            let new = PageSize::Fixed(new);
            let page = page_seed % old.page_count(total);
            let top = old.bounds(page, total).start;
            let new_page = resize_page(page, old, new);
            prop_assert!(new.bounds(new_page, total).contains(&top));
        }
    }
}
