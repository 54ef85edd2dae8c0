//! Pagination: the visible window, page count, page-link window and the
//! "from - to / total" summary.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Maximum number of numbered page links shown at once
pub const MAX_PAGE_LINKS: usize = 5;
const HALF_PAGE_LINKS: usize = MAX_PAGE_LINKS / 2;

/// Pagination settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationOptions {
    /// Caller-controlled page; adopted whenever it differs from the current page
    pub page: Option<usize>,
    /// Rows per page; 0 renders everything
    pub size_per_page: usize,
    /// Total row count on the server side, for remote tables
    pub total_size: Option<usize>,
    pub show_total: bool,
    pub hide_page_list_only_one_page: bool,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        PaginationOptions {
            page: None,
            size_per_page: 10,
            total_size: None,
            show_total: false,
            hide_page_list_only_one_page: true,
        }
    }
}

impl PaginationOptions {
    pub fn with_size(size_per_page: usize) -> Self {
        PaginationOptions {
            size_per_page,
            ..Default::default()
        }
    }
}

/// Result of slicing a view into a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSlice {
    /// Positions within the view that are visible on this page
    pub range: Range<usize>,
    pub page_count: usize,
}

impl PageSlice {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// View position of the first row on the page
    pub fn start(&self) -> usize {
        self.range.start
    }
}

/// Number of pages for `total` rows, never less than 1.
pub fn page_count(total: usize, size_per_page: usize) -> usize {
    if size_per_page == 0 {
        return 1;
    }
    total.div_ceil(size_per_page).max(1)
}

/// Compute the visible window of a view holding `len` rows.
///
/// Remote views already hold exactly one page and pass through whole. Pages
/// past the end yield an empty window; the page is never clamped here.
pub fn paginate(
    len: usize,
    page: usize,
    size_per_page: usize,
    total_size: Option<usize>,
    remote: bool,
) -> PageSlice {
    if size_per_page == 0 {
        return PageSlice {
            range: 0..len,
            page_count: 1,
        };
    }

    let page_count = page_count(total_size.unwrap_or(len), size_per_page);
    if remote {
        return PageSlice {
            range: 0..len,
            page_count,
        };
    }

    let start = page.saturating_sub(1).saturating_mul(size_per_page).min(len);
    let end = start.saturating_add(size_per_page).min(len);
    PageSlice {
        range: start..end,
        page_count,
    }
}

/// Offset of `page` for a remote fetch
pub fn skip_for(page: usize, size_per_page: usize) -> usize {
    page.saturating_sub(1).saturating_mul(size_per_page)
}

/// The numbered page links to show, plus which navigation buttons apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    pub start: usize,
    pub end: usize,
    pub current: usize,
    pub show_first: bool,
    pub show_prev: bool,
    pub show_next: bool,
    pub show_last: bool,
}

impl PageLinks {
    /// Up to [`MAX_PAGE_LINKS`] links centred on `page`, clamped to
    /// `1..=page_count`.
    pub fn compute(page: usize, page_count: usize) -> Self {
        let page_count = page_count.max(1);
        let mut start = page as i64 - HALF_PAGE_LINKS as i64;
        let mut end = page as i64 + HALF_PAGE_LINKS as i64;

        if end > page_count as i64 {
            end = page_count as i64;
            start = page_count as i64 - MAX_PAGE_LINKS as i64 + 1;
        }
        if start < 1 {
            start = 1;
            end = (MAX_PAGE_LINKS as i64).min(page_count as i64);
        }

        let (start, end) = (start as usize, end as usize);
        PageLinks {
            start,
            end,
            current: page,
            show_first: start != 1,
            show_prev: page != 1,
            show_next: page < page_count,
            show_last: end != page_count,
        }
    }

    pub fn pages(&self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

/// "from - to / total" line shown under a paginated table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub from: usize,
    pub to: usize,
    pub total: usize,
}

impl PageSummary {
    /// Summary for a page showing `page_len` rows out of `total`.
    pub fn compute(page: usize, page_len: usize, size_per_page: usize, total: usize) -> Self {
        if page_len == 0 {
            return PageSummary { from: 0, to: 0, total };
        }
        let offset = skip_for(page, size_per_page);
        PageSummary {
            from: offset + 1,
            to: offset + page_len,
            total,
        }
    }
}
