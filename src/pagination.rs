//! Page window computation shared by paginated listings.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Pages always linked at each end of the bar.
const EDGE_PAGES: usize = 2;
/// Pages linked on each side of the current one.
const AROUND_CURRENT: usize = 2;

/// Page links for a bar of `total_pages`, with `None` where pages are
/// skipped.
fn page_window(total_pages: usize, current_page: usize) -> Vec<Option<usize>> {
    let near_edge = |p: usize| p <= EDGE_PAGES || p + EDGE_PAGES > total_pages;
    let near_current = |p: usize| p.abs_diff(current_page) <= AROUND_CURRENT;

    let mut pages = Vec::new();
    let mut previous = 0;
    for page in (1..=total_pages).filter(|&p| near_edge(p) || near_current(p)) {
        if page > previous + 1 {
            pages.push(None);
        }
        pages.push(Some(page));
        previous = page;
    }
    pages
}

#[derive(Debug, Serialize)]
/// One page of items plus the page links to render. `None` marks a gap.
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total: usize, per_page: usize) -> Self {
        let current_page = current_page.max(1);
        let total_pages = total.div_ceil(per_page.max(1));

        let pages = page_window(total_pages, current_page);

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total: self.total,
        }
    }
}

/// Offset of the first row for a 1-based page number.
pub fn page_offset(page: usize, per_page: usize) -> i64 {
    i64::try_from((page.max(1) - 1).saturating_mul(per_page)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pages_for_empty_listing() {
        let page: Paginated<u8> = Paginated::new(vec![], 1, 0, 20);
        assert!(page.pages.is_empty());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn long_listing_has_gaps() {
        let page: Paginated<u8> = Paginated::new(vec![], 10, 400, 20);
        assert_eq!(
            page.pages,
            vec![
                Some(1),
                Some(2),
                None,
                Some(8),
                Some(9),
                Some(10),
                Some(11),
                Some(12),
                None,
                Some(19),
                Some(20),
            ]
        );
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        assert_eq!(page_offset(0, 20), 0);
        assert_eq!(page_offset(3, 20), 40);
    }

    #[test]
    fn huge_page_offset_never_goes_negative() {
        assert_eq!(page_offset(usize::MAX, 20), i64::MAX);
        assert!(page_offset(usize::MAX / 10, 20) > 0);
    }
}
