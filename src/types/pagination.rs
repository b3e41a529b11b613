//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, MAX_PAGE_NUMBER, MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use crate::errors::{AppError, AppResult};

/// Normalized pagination window with an optional search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub search: Option<String>,
}

impl Pagination {
    /// Build a window, clamping out-of-range values instead of failing.
    ///
    /// Page below 1 becomes 1 and page is capped at `MAX_PAGE_NUMBER`;
    /// limit below 10 becomes 10 and above 100 becomes 100.
    pub fn new(page: i64, limit: i64, search: Option<String>) -> Self {
        let page = (page.max(DEFAULT_PAGE_NUMBER as i64) as u64).min(MAX_PAGE_NUMBER);
        let limit = (limit.max(0) as u64).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            page,
            limit,
            search,
        }
    }

    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Raw pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl PaginationQuery {
    /// `None` when no pagination parameter was supplied at all.
    pub fn into_pagination(self) -> AppResult<Option<Pagination>> {
        let supplied = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        if !supplied(&self.page) && !supplied(&self.limit) && !supplied(&self.search) {
            return Ok(None);
        }

        let page = parse_number(self.page.as_deref(), "Page number must be greater than 0")?;
        let limit = parse_number(self.limit.as_deref(), "Limit must be between 10 and 100")?;

        Ok(Some(Pagination::new(page, limit, self.search)))
    }
}

fn parse_number(raw: Option<&str>, message: &str) -> AppResult<i64> {
    match raw.filter(|s| !s.is_empty()) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| AppError::validation(message)),
        None => Ok(0),
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

impl PaginationInfo {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit > 0 { total.div_ceil(limit) } else { 0 };
        let has_previous = page > 1;
        let has_next = page < total_pages;

        Self {
            page,
            limit,
            total,
            total_pages,
            has_previous,
            has_next,
            previous_page: has_previous.then(|| page - 1),
            next_page: has_next.then(|| page + 1),
        }
    }
}

impl<T> Paginated<T> {
    /// Wrap one page of results
    pub fn new(data: Vec<T>, page: u64, limit: u64, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationInfo::new(page, limit, total),
        }
    }

    /// Wrap an unpaginated listing as a single page holding every row
    pub fn full(data: Vec<T>, total: u64) -> Self {
        Self::new(data, DEFAULT_PAGE_NUMBER, total, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let p = Pagination::new(0, 0, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_limit_clamped() {
        assert_eq!(Pagination::new(1, 5, None).limit, 10);
        assert_eq!(Pagination::new(1, 250, None).limit, 100);
        assert_eq!(Pagination::new(1, 42, None).limit, 42);
        assert_eq!(Pagination::new(-3, -1, None).page, 1);
    }

    #[test]
    fn test_offset() {
        assert_eq!(Pagination::new(2, 10, None).offset(), 10);
        assert_eq!(Pagination::new(4, 25, None).offset(), 75);
    }

    #[test]
    fn test_huge_page_capped() {
        let query = PaginationQuery {
            page: Some(i64::MAX.to_string()),
            limit: Some("100".into()),
            search: None,
        };
        let p = query.into_pagination().unwrap().unwrap();

        assert_eq!(p.page, MAX_PAGE_NUMBER);
        assert!(p.offset() <= i64::MAX as u64);
    }

    #[test]
    fn test_blank_search_dropped() {
        assert_eq!(Pagination::new(1, 10, Some("  ".into())).search, None);
        assert_eq!(
            Pagination::new(1, 10, Some(" ana ".into())).search.as_deref(),
            Some("ana")
        );
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let info = PaginationInfo::new(2, 10, 25);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_previous);
        assert!(info.has_next);
        assert_eq!(info.previous_page, Some(1));
        assert_eq!(info.next_page, Some(3));
    }

    #[test]
    fn test_last_page() {
        let info = PaginationInfo::new(3, 10, 25);
        assert!(!info.has_next);
        assert_eq!(info.next_page, None);
    }

    #[test]
    fn test_full_listing() {
        let page = Paginated::full(vec![1, 2, 3], 3);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 3);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next);

        let empty: Paginated<u8> = Paginated::full(vec![], 0);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn test_query_without_parameters() {
        assert_eq!(PaginationQuery::default().into_pagination().unwrap(), None);
    }

    #[test]
    fn test_query_parsing() {
        let query = PaginationQuery {
            page: Some("2".into()),
            limit: None,
            search: Some("doe".into()),
        };
        let p = query.into_pagination().unwrap().unwrap();
        assert_eq!((p.page, p.limit), (2, 10));
        assert_eq!(p.search.as_deref(), Some("doe"));

        let query = PaginationQuery {
            page: Some("two".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_pagination(),
            Err(AppError::Validation(_))
        ));
    }
}
