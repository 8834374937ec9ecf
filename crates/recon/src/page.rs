//! Fixed-size pagination over the result tables.
//!
//! Page numbers are 1-based and always clamped into range, so a caller can
//! hold any page number as view state without validating it first.

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// At least one page, even for an empty table.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn clamp(&self, number: usize, len: usize) -> usize {
        number.clamp(1, self.total_pages(len))
    }

    pub fn page<'a, T>(&self, items: &'a [T], number: usize) -> Page<'a, T> {
        let total_pages = self.total_pages(items.len());
        let number = number.clamp(1, total_pages);
        let start = ((number - 1) * self.page_size).min(items.len());
        let end = (start + self.page_size).min(items.len());
        Page {
            number,
            total_pages,
            first_index: start,
            items: &items[start..end],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub total_pages: usize,
    /// Index of `items[0]` within the full table.
    pub first_index: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn prev_number(&self) -> usize {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_number(&self) -> usize {
        (self.number + 1).min(self.total_pages)
    }

    /// Pager controls are only worth showing past a single page.
    pub fn needs_controls(&self) -> bool {
        self.total_pages > 1
    }
}
