//! Page slicing and page-number windowing for the pokemon listing.
//!
//! [`paginate`] is a pure function of the requested page, the filtered items
//! and the page size. Views call it again whenever one of those inputs
//! changes instead of keeping derived pagination state around.

use crate::config::DEFAULT_PAGE_SIZE;
use std::fmt;

/// Number of page-number buttons shown together as one navigation block
pub const PAGES_PER_BLOCK: usize = 5;

/// Number of items per page, always at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageSize(usize);

impl PageSize {
    /// Clamp a numeric page size to the minimum of 1
    pub fn new(value: i64) -> Self {
        PageSize(usize::try_from(value).unwrap_or(0).max(1))
    }

    /// Convert page-size text coming from an input widget.
    ///
    /// Surrounding whitespace is ignored. Text that is not an integer falls
    /// back to 1, as does zero or a negative number.
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(value) => PageSize::new(value),
            Err(_) => {
                log::debug!("Page size {:?} is not a number, using 1", text);
                PageSize(1)
            }
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(DEFAULT_PAGE_SIZE)
    }
}

impl From<usize> for PageSize {
    fn from(value: usize) -> Self {
        PageSize(value.max(1))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One computed page of a filtered item sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<'a, T> {
    pub items_on_page: &'a [T],
    pub current_page: i64,
    pub last_page: usize,
    pub pages_in_block: Vec<usize>,
    pub pages_per_block: usize,
    pub page_size: usize,
    start: usize,
}

impl<T> PageResult<'_, T> {
    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.last_page as i64
    }

    /// Page reached by a "previous" action, kept inside `1..=last_page`
    pub fn prev_page(&self) -> Option<i64> {
        if self.can_go_prev() {
            Some((self.current_page - 1).min(self.last_page as i64))
        } else {
            None
        }
    }

    /// Page reached by a "next" action, kept inside `1..=last_page`
    pub fn next_page(&self) -> Option<i64> {
        if self.can_go_next() {
            Some((self.current_page + 1).max(1))
        } else {
            None
        }
    }

    /// True when the requested page lies outside `1..=last_page`
    pub fn is_out_of_range(&self) -> bool {
        self.current_page < 1 || self.current_page > self.last_page as i64
    }

    /// Index range of `items_on_page` within the full sequence
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.start + self.items_on_page.len())
    }
}

/// Compute the page `current_page` (1-based) of `items`.
///
/// Never panics: pages below 1 or past the last page produce an empty
/// `items_on_page` while `last_page` and `pages_in_block` stay correct. A
/// page below 1 is windowed as if it were page 1.
pub fn paginate<T>(current_page: i64, items: &[T], page_size: PageSize) -> PageResult<'_, T> {
    let size = page_size.get();
    let (start, end) = slice_bounds(current_page, items.len(), size);

    let last_page = if items.is_empty() {
        1
    } else {
        items.len().div_ceil(size)
    };

    PageResult {
        items_on_page: &items[start..end],
        current_page,
        last_page,
        pages_in_block: pages_in_block(current_page, last_page),
        pages_per_block: PAGES_PER_BLOCK,
        page_size: size,
        start,
    }
}

fn slice_bounds(current_page: i64, len: usize, size: usize) -> (usize, usize) {
    if current_page < 1 {
        return (0, 0);
    }
    let start = usize::try_from(current_page - 1)
        .ok()
        .and_then(|page| page.checked_mul(size))
        .unwrap_or(usize::MAX)
        .min(len);
    let end = start.saturating_add(size).min(len);
    (start, end)
}

fn pages_in_block(current_page: i64, last_page: usize) -> Vec<usize> {
    let page = current_page.max(1) as u64;
    let per_block = PAGES_PER_BLOCK as u64;
    // ceil(page / per_block) - 1, without overflowing near u64::MAX
    let block_index = (page - 1) / per_block;
    let min_page = block_index * per_block + 1;
    let max_page = (min_page + per_block - 1).min(last_page as u64);

    (min_page..=max_page).map(|p| p as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Vec<usize> {
        (0..count).collect()
    }

    #[test]
    fn test_empty_items() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(1, &items, PageSize::new(12));

        assert!(page.items_on_page.is_empty());
        assert_eq!(page.last_page, 1);
        assert_eq!(page.pages_in_block, vec![1]);
        assert_eq!(page.pages_per_block, 5);
        assert!(!page.can_go_prev());
        assert!(!page.can_go_next());
    }

    #[test]
    fn test_first_page_of_27() {
        let items = numbered(27);
        let page = paginate(1, &items, PageSize::new(12));

        assert_eq!(page.items_on_page, &items[0..12]);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.pages_in_block, vec![1, 2, 3]);
        assert_eq!(page.range(), (0, 12));
        assert!(page.can_go_next());
        assert_eq!(page.next_page(), Some(2));
    }

    #[test]
    fn test_last_partial_page_of_27() {
        let items = numbered(27);
        let page = paginate(3, &items, PageSize::new(12));

        assert_eq!(page.items_on_page, &items[24..27]);
        assert_eq!(page.items_on_page.len(), 3);
        assert_eq!(page.last_page, 3);
        assert!(!page.can_go_next());
        assert_eq!(page.prev_page(), Some(2));
    }

    #[test]
    fn test_block_window_in_second_block() {
        // 20 pages of 10 items each
        let items = numbered(200);
        let page = paginate(7, &items, PageSize::new(10));

        assert_eq!(page.last_page, 20);
        assert_eq!(page.pages_in_block, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_block_boundaries() {
        let items = numbered(200);
        let size = PageSize::new(10);

        assert_eq!(paginate(5, &items, size).pages_in_block, vec![1, 2, 3, 4, 5]);
        assert_eq!(paginate(6, &items, size).pages_in_block, vec![6, 7, 8, 9, 10]);
        assert_eq!(
            paginate(20, &items, size).pages_in_block,
            vec![16, 17, 18, 19, 20]
        );
    }

    #[test]
    fn test_block_truncated_by_last_page() {
        // 7 pages: second block only has 6 and 7
        let items = numbered(70);
        let page = paginate(6, &items, PageSize::new(10));

        assert_eq!(page.last_page, 7);
        assert_eq!(page.pages_in_block, vec![6, 7]);
    }

    #[test]
    fn test_page_far_beyond_last_page() {
        let items = numbered(10);
        let page = paginate(999, &items, PageSize::new(12));

        assert!(page.items_on_page.is_empty());
        assert_eq!(page.last_page, 1);
        // Block 200 starts at page 996, past the last page
        assert!(page.pages_in_block.is_empty());
        assert!(page.is_out_of_range());
        assert_eq!(page.range(), (10, 10));
        // "previous" jumps straight back into range
        assert_eq!(page.prev_page(), Some(1));
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_page_just_past_last_page_keeps_block() {
        let items = numbered(27);
        let page = paginate(4, &items, PageSize::new(12));

        assert!(page.items_on_page.is_empty());
        assert_eq!(page.pages_in_block, vec![1, 2, 3]);
        assert!(page.is_out_of_range());
    }

    #[test]
    fn test_page_zero_and_negative() {
        let items = numbered(27);

        for current_page in [0, -1, -250, i64::MIN] {
            let page = paginate(current_page, &items, PageSize::new(12));
            assert!(page.items_on_page.is_empty(), "page {}", current_page);
            assert_eq!(page.last_page, 3);
            assert_eq!(page.pages_in_block, vec![1, 2, 3]);
            assert!(page.is_out_of_range());
            assert!(!page.can_go_prev());
            assert_eq!(page.next_page(), Some(1));
        }
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let items = numbered(27);
        let page = paginate(i64::MAX, &items, PageSize::new(i64::MAX));

        assert!(page.items_on_page.is_empty());
        assert_eq!(page.last_page, 1);
        assert!(page.pages_in_block.is_empty());
    }

    #[test]
    fn test_page_size_larger_than_items() {
        let items = numbered(10);
        let page = paginate(1, &items, PageSize::new(12));

        assert_eq!(page.items_on_page, &items[..]);
        assert_eq!(page.last_page, 1);
        assert_eq!(page.pages_in_block, vec![1]);
    }

    #[test]
    fn test_page_size_parsing() {
        assert_eq!(PageSize::parse("12").get(), 12);
        assert_eq!(PageSize::parse(" 24 ").get(), 24);
        assert_eq!(PageSize::parse("abc").get(), 1);
        assert_eq!(PageSize::parse("").get(), 1);
        assert_eq!(PageSize::parse("0").get(), 1);
        assert_eq!(PageSize::parse("-4").get(), 1);
        assert_eq!(PageSize::parse("12.5").get(), 1);
    }

    #[test]
    fn test_page_size_clamping() {
        assert_eq!(PageSize::new(0).get(), 1);
        assert_eq!(PageSize::new(-10).get(), 1);
        assert_eq!(PageSize::new(8).get(), 8);
        assert_eq!(PageSize::from(0usize).get(), 1);
        assert_eq!(PageSize::default().get(), 12);
    }

    #[test]
    fn test_malformed_page_size_still_paginates() {
        let items = numbered(3);
        let page = paginate(2, &items, PageSize::parse("not a number"));

        assert_eq!(page.page_size, 1);
        assert_eq!(page.items_on_page, &[1]);
        assert_eq!(page.last_page, 3);
    }
}
