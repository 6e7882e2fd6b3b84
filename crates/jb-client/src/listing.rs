//! Job-listing pagination and filter state.
//!
//! `JobListing` owns the filter set and the current page of the board
//! view. Changing any filter snaps back to page 1 so the window always
//! starts at the top of the new result set; page moves are clamped to the
//! range reported by the last loaded page.

use jb_models::{JobFilter, PageRequest, DEFAULT_PAGE_SIZE};

/// Filter and pagination state for the job board.
#[derive(Debug, Clone)]
pub struct JobListing {
    filter: JobFilter,
    page: u32,
    page_size: u32,
    total_count: u64,
}

impl Default for JobListing {
    fn default() -> Self {
        Self::new()
    }
}

impl JobListing {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: u32) -> Self {
        let page_size = PageRequest::new(1, page_size).page_size;
        Self {
            filter: JobFilter::default(),
            page: 1,
            page_size,
            total_count: 0,
        }
    }

    pub fn filter(&self) -> &JobFilter {
        &self.filter
    }

    pub fn current_page(&self) -> u32 {
        self.page
    }

    /// The request for the currently selected page.
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }

    /// Set the title search. Empty strings clear it. Resets to page 1.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.filter.search_query = Self::normalize(query.into());
        self.page = 1;
    }

    /// Set the location filter. Empty strings clear it. Resets to page 1.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.filter.location = Self::normalize(location.into());
        self.page = 1;
    }

    /// Set the company filter. Resets to page 1.
    pub fn set_company(&mut self, company_id: Option<i64>) {
        self.filter.company_id = company_id;
        self.page = 1;
    }

    /// Drop every filter and return to page 1.
    pub fn clear_filters(&mut self) {
        self.filter = JobFilter::default();
        self.page = 1;
    }

    /// Record the exact total from the last loaded page, so page moves
    /// can be clamped.
    pub fn record_total(&mut self, total_count: u64) {
        self.total_count = total_count;
    }

    /// Number of pages in the current result set (ceiling division).
    pub fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(u64::from(self.page_size)) as u32
    }

    /// Advance one page. No-op on the last page. Returns true if moved.
    pub fn next_page(&mut self) -> bool {
        if self.page < self.total_pages() {
            self.page += 1;
            return true;
        }
        false
    }

    /// Go back one page. No-op on the first page. Returns true if moved.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            return true;
        }
        false
    }

    fn normalize(value: String) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirteen_rows_make_three_pages_of_six() {
        let mut listing = JobListing::new();
        listing.record_total(13);
        assert_eq!(listing.total_pages(), 3);
    }

    #[test]
    fn test_filter_changes_reset_to_first_page() {
        let mut listing = JobListing::new();
        listing.record_total(30);
        assert!(listing.next_page());
        assert!(listing.next_page());
        assert_eq!(listing.current_page(), 3);

        listing.set_search("rust");
        assert_eq!(listing.current_page(), 1);

        listing.next_page();
        listing.set_location("Delhi");
        assert_eq!(listing.current_page(), 1);

        listing.next_page();
        listing.set_company(Some(4));
        assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn test_page_moves_are_clamped() {
        let mut listing = JobListing::new();
        listing.record_total(13);

        assert!(!listing.prev_page());
        assert_eq!(listing.current_page(), 1);

        assert!(listing.next_page());
        assert!(listing.next_page());
        assert!(!listing.next_page());
        assert_eq!(listing.current_page(), 3);
    }

    #[test]
    fn test_empty_result_set_pins_page_one() {
        let mut listing = JobListing::new();
        listing.record_total(0);
        assert_eq!(listing.total_pages(), 0);
        assert!(!listing.next_page());
        assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn test_blank_filter_values_are_cleared() {
        let mut listing = JobListing::new();
        listing.set_search("  ");
        listing.set_location("");
        assert!(listing.filter().is_empty());

        listing.set_search(" rust ");
        assert_eq!(listing.filter().search_query.as_deref(), Some("rust"));
    }

    #[test]
    fn test_clear_filters_resets_everything() {
        let mut listing = JobListing::new();
        listing.record_total(30);
        listing.set_search("rust");
        listing.next_page();

        listing.clear_filters();
        assert!(listing.filter().is_empty());
        assert_eq!(listing.current_page(), 1);
    }

    #[test]
    fn test_page_request_reflects_current_page() {
        let mut listing = JobListing::new();
        listing.record_total(30);
        listing.next_page();

        let request = listing.page_request();
        assert_eq!(request.page, 2);
        assert_eq!(request.row_window(), (6, 11));
    }
}
