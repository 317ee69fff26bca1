use std::ops::Range;

/// Window over a list of `total` items.
///
/// Out-of-range requests are clamped rather than rejected: a page size
/// outside `1..=50` becomes 10, and a page outside the available pages
/// becomes the first page.
///
/// ```
/// use courtside::stats::Pagination;
///
/// let page = Pagination::new(95, 3, 10);
/// assert_eq!(page.window(), 20..30);
/// assert_eq!(page.next_page(), Some(4));
/// assert_eq!(page.previous_page(), Some(2));
///
/// let clamped = Pagination::new(95, 42, 500);
/// assert_eq!((clamped.page(), clamped.per_page()), (1, 10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    per_page: usize,
    total: usize,
}

impl Pagination {
    pub const DEFAULT_PER_PAGE: usize = 10;
    pub const MAX_PER_PAGE: usize = 50;

    pub fn new(total: usize, page: i64, per_page: i64) -> Self {
        let per_page = usize::try_from(per_page)
            .ok()
            .filter(|n| (1..=Self::MAX_PER_PAGE).contains(n))
            .unwrap_or(Self::DEFAULT_PER_PAGE);
        let total_pages = total.div_ceil(per_page);
        let page = usize::try_from(page)
            .ok()
            .filter(|p| (1..=total_pages).contains(p))
            .unwrap_or(1);
        Self {
            page,
            per_page,
            total,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    /// Index range of this page's items.
    pub fn window(&self) -> Range<usize> {
        let start = ((self.page - 1) * self.per_page).min(self.total);
        start..(start + self.per_page).min(self.total)
    }

    /// An empty listing is a single, last, empty page.
    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }

    pub fn next_page(&self) -> Option<usize> {
        (!self.is_last_page()).then_some(self.page + 1)
    }

    pub fn previous_page(&self) -> Option<usize> {
        (self.page > 1).then(|| self.page - 1)
    }
}
