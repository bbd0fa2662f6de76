//! Derived views over the campaign table.
//!
//! This crate turns a snapshot's campaign rows plus the user's
//! [`query::QueryState`] into what the table shows:
//!
//! 1. filter by search term, type set and status set
//! 2. stable sort on the chosen column
//! 3. slice out one page of [`query::PAGE_SIZE`] rows
//!
//! [`query::view`] is a pure function of its inputs and [`cache::ViewCache`]
//! memoizes it. Exports in [`export`] always cover every filtered and sorted
//! row, never just the visible page.

pub mod cache;
pub mod export;
pub mod query;

/// Page arithmetic shared by the table view and its pager buttons.
pub mod pagination {
    /// Number of page buttons the pager shows at once.
    pub const WINDOW: usize = 5;

    /// `ceil(total_rows / page_size)`
    pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
        total_rows.div_ceil(page_size)
    }

    /// Clamp a 1-based page into `[1, total_pages]`. With no pages at all the
    /// effective page is 1.
    pub fn clamp_page(page: usize, total_pages: usize) -> usize {
        page.clamp(1, total_pages.max(1))
    }

    /// Page numbers for the pager buttons.
    ///
    /// The first three pages show `1..=5`, the last three show the final
    /// five pages, and anything in between is centered on `current`.
    pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
        let count = total_pages.min(WINDOW);
        (0..count)
            .map(|i| {
                if total_pages <= WINDOW || current <= 3 {
                    i + 1
                } else if current + 2 >= total_pages {
                    total_pages - (WINDOW - 1) + i
                } else {
                    current - 2 + i
                }
            })
            .collect()
    }

    /// 1-based inclusive bounds of the rows on `page` ("Showing 6 to 8 of 8").
    /// `(0, 0)` when nothing matched.
    pub fn showing_range(page: usize, page_size: usize, total_rows: usize) -> (usize, usize) {
        if total_rows == 0 {
            return (0, 0);
        }
        let page = clamp_page(page, total_pages(total_rows, page_size));
        let first = (page - 1) * page_size + 1;
        let last = (page * page_size).min(total_rows);
        (first, last)
    }

}
