//! Filtering and range pagination for job listings.

use serde::{Deserialize, Serialize};

/// Page size used by the job listing when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 6;
/// Pagination limits.
pub const MIN_PAGE_SIZE: u32 = 1;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Filters applied to the job listing query. Empty fields are not applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFilter {
    /// Case-insensitive substring match on the job title
    pub search_query: Option<String>,
    /// Equality match on location
    pub location: Option<String>,
    /// Equality match on the owning company
    pub company_id: Option<i64>,
}

impl JobFilter {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.search_query.is_none() && self.location.is_none() && self.company_id.is_none()
    }
}

/// A one-based page request, normalized to valid bounds on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Create a page request, clamping page to >= 1 and page_size to the
    /// supported range.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based inclusive row window for this page:
    /// `[(page-1)*size, (page-1)*size + size - 1]`.
    pub fn row_window(&self) -> (u64, u64) {
        let from = u64::from(self.page - 1) * u64::from(self.page_size);
        let to = from + u64::from(self.page_size) - 1;
        (from, to)
    }
}

/// A page of rows plus the exact total count reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Total number of pages for the given page size (ceiling division).
    pub fn total_pages(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(page_size)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_window_math() {
        assert_eq!(PageRequest::new(1, 6).row_window(), (0, 5));
        assert_eq!(PageRequest::new(2, 6).row_window(), (6, 11));
        assert_eq!(PageRequest::new(3, 10).row_window(), (20, 29));
    }

    #[test]
    fn test_page_request_clamps_inputs() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, MIN_PAGE_SIZE);

        let req = PageRequest::new(5, 10_000);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_total_pages_ceiling() {
        let page: Page<u8> = Page {
            rows: vec![],
            total_count: 13,
        };
        assert_eq!(page.total_pages(6), 3);

        let page: Page<u8> = Page {
            rows: vec![],
            total_count: 12,
        };
        assert_eq!(page.total_pages(6), 2);

        let page: Page<u8> = Page {
            rows: vec![],
            total_count: 0,
        };
        assert_eq!(page.total_pages(6), 0);
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(JobFilter::default().is_empty());
        let filter = JobFilter {
            location: Some("Delhi".to_string()),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
