//! PostgREST query builder.
//!
//! Builds the query string and request headers for table reads and writes:
//! embedded-resource selects, equality and case-insensitive substring
//! filters, and range pagination with an exact count.

/// A single column filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `col=eq.value`
    Eq(String),
    /// `col=ilike.*value*` — case-insensitive substring match
    IlikeContains(String),
}

impl Filter {
    /// Render the operator expression (the part after `col=`).
    fn render(&self) -> String {
        match self {
            Filter::Eq(value) => format!("eq.{}", value),
            Filter::IlikeContains(value) => format!("ilike.*{}*", value),
        }
    }
}

/// Query description for a single table request.
#[derive(Debug, Clone, Default)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, Filter)>,
    range: Option<(u64, u64)>,
    count_exact: bool,
    limit: Option<u32>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the select clause, including any embedded resources.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Equality filter on a column.
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters
            .push((column.into(), Filter::Eq(value.to_string())));
        self
    }

    /// Case-insensitive substring filter on a column.
    pub fn ilike_contains(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters
            .push((column.into(), Filter::IlikeContains(value.to_string())));
        self
    }

    /// Zero-based inclusive row window, sent as a `Range` header.
    pub fn range(mut self, window: (u64, u64)) -> Self {
        self.range = Some(window);
        self
    }

    /// Request an exact total count alongside the rows.
    pub fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Cap the number of returned rows.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the query-string pairs for this query.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(select) = &self.select {
            pairs.push(("select".to_string(), select.clone()));
        }
        for (column, filter) in &self.filters {
            pairs.push((column.clone(), filter.render()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    /// The `Range` header value, if a row window was set.
    pub fn range_header(&self) -> Option<String> {
        self.range.map(|(from, to)| format!("{}-{}", from, to))
    }

    /// The `Prefer` header value for reads (`count=exact`), if requested.
    pub fn prefer_header(&self) -> Option<&'static str> {
        self.count_exact.then_some("count=exact")
    }
}

/// Parse the total row count out of a `Content-Range` header
/// (`0-5/13`, or `*/0` for an empty result set).
pub fn parse_content_range_total(value: &str) -> Option<u64> {
    let (_, total) = value.split_once('/')?;
    if total == "*" {
        return None;
    }
    total.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_rendering() {
        assert_eq!(Filter::Eq("Bangalore".into()).render(), "eq.Bangalore");
        assert_eq!(
            Filter::IlikeContains("engineer".into()).render(),
            "ilike.*engineer*"
        );
    }

    #[test]
    fn test_query_pairs_order_and_shape() {
        let query = Query::new()
            .select("*,company:companies(name,logo_url),saved:saved_jobs(id)")
            .eq("location", "Delhi")
            .eq("company_id", 4)
            .ilike_contains("title", "rust");

        let pairs = query.query_pairs();
        assert_eq!(
            pairs[0],
            (
                "select".to_string(),
                "*,company:companies(name,logo_url),saved:saved_jobs(id)".to_string()
            )
        );
        assert!(pairs.contains(&("location".to_string(), "eq.Delhi".to_string())));
        assert!(pairs.contains(&("company_id".to_string(), "eq.4".to_string())));
        assert!(pairs.contains(&("title".to_string(), "ilike.*rust*".to_string())));
    }

    #[test]
    fn test_range_and_prefer_headers() {
        let query = Query::new().range((6, 11)).count_exact();
        assert_eq!(query.range_header().as_deref(), Some("6-11"));
        assert_eq!(query.prefer_header(), Some("count=exact"));

        let plain = Query::new();
        assert!(plain.range_header().is_none());
        assert!(plain.prefer_header().is_none());
    }

    #[test]
    fn test_content_range_parsing() {
        assert_eq!(parse_content_range_total("0-5/13"), Some(13));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
