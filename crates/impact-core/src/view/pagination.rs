// ── Pagination state ──

use crate::config::DEFAULT_PER_PAGE;
use crate::model::Pagination;

/// Current page cursor for a ranking view. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u32,
    per_page: u32,
    total_pages: u32,
    total_items: u64,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Pager {
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
            total_pages: 1,
            total_items: 0,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// "Previous" is disabled on the first page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// "Next" is disabled on the last page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page + 1)
    }

    pub fn previous_page(&self) -> Option<u32> {
        self.has_previous().then(|| self.page - 1)
    }

    /// Clamp an arbitrary page number into `1..=total_pages`.
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.total_pages)
    }

    /// Move the cursor ahead of a fetch. The total is kept until the
    /// response arrives.
    pub fn go_to(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Adopt server pagination metadata.
    pub fn update(&mut self, pagination: &Pagination) {
        self.page = pagination.page.max(1);
        self.per_page = pagination.per_page.max(1);
        self.total_pages = pagination.total_pages.max(1);
        self.total_items = pagination.total_items;
    }

    /// Overall rank of the first row on the current page.
    pub fn first_rank(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page) + 1
    }
}
