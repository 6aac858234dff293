//! Page window math for the fixed-size catalog listing

/// Fixed listing page size.
pub const PAGE_SIZE: u32 = 40;

/// Total pages for an item count, never less than one.
pub fn total_pages(total_items: u64) -> u32 {
    (total_items.div_ceil(PAGE_SIZE as u64) as u32).max(1)
}

/// Clamp a requested page into `[1, total_pages]`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

/// Client-side pagination state for the current listing.
///
/// Out-of-range requests clamp and never fail; whoever navigates pages is
/// responsible for clearing any active inline edit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: u32,
    total_items: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page: 1,
            total_items: 0,
        }
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_items)
    }

    /// Navigate to a page, clamping to the valid range. Returns the
    /// effective page.
    pub fn go_to(&mut self, page: u32) -> u32 {
        self.page = clamp_page(page, self.total_pages());
        self.page
    }

    /// Record a fresh total, re-clamping the current page (the last page can
    /// disappear when items are deleted).
    pub fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        self.page = clamp_page(self.page, self.total_pages());
    }

    /// Back to page one; any filter change goes through here.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// 1-based inclusive "showing X to Y of Z" bounds:
    /// `start = (page-1)*40 + 1`, `end = min(page*40, total)`.
    pub fn display_range(&self) -> (u64, u64) {
        let start = (self.page as u64 - 1) * PAGE_SIZE as u64 + 1;
        let end = (self.page as u64 * PAGE_SIZE as u64).min(self.total_items);
        (start, end)
    }
}
