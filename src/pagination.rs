use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Resolved page window and sort column for a list query. Query parameters
/// arrive as strings; anything non-numeric or out of range falls back to the
/// defaults rather than erroring.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
    /// Always one of the caller's allowlisted columns; ordering is
    /// descending on every list endpoint.
    pub sort: &'static str,
}

impl PageRequest {
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
        sortable: &'static [&'static str],
    ) -> Self {
        let page = page
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| l.parse::<i64>().ok())
            .filter(|l| *l >= 1)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);
        let sort = sort
            .and_then(|s| sortable.iter().find(|col| **col == s))
            .copied()
            .unwrap_or("created_at");

        Self { page, limit, sort }
    }

    pub fn offset(&self) -> i64 {
        // page and limit are client-controlled; the product must not overflow
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Uniform list envelope: `{items, total, page, limit, pages}` with
/// `pages = ceil(total / limit)`.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: &PageRequest) -> Self {
        let pages = if total == 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SORTABLE: &[&str] = &["created_at", "name", "year"];

    #[test]
    fn defaults_apply_when_params_missing() {
        let req = PageRequest::from_raw(None, None, None, SORTABLE);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 20);
        assert_eq!(req.sort, "created_at");
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn non_numeric_params_fall_back() {
        let req = PageRequest::from_raw(Some("abc"), Some(""), None, SORTABLE);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 20);
    }

    #[test]
    fn zero_and_negative_fall_back() {
        let req = PageRequest::from_raw(Some("0"), Some("-5"), None, SORTABLE);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 20);
    }

    #[test]
    fn limit_is_capped() {
        let req = PageRequest::from_raw(None, Some("5000"), None, SORTABLE);
        assert_eq!(req.limit, MAX_LIMIT);
    }

    #[test]
    fn window_math() {
        let req = PageRequest::from_raw(Some("3"), Some("10"), None, SORTABLE);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let req = PageRequest::from_raw(Some("9223372036854775807"), Some("100"), None, SORTABLE);
        assert_eq!(req.page, i64::MAX);
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn unknown_sort_falls_back_to_created_at() {
        let req = PageRequest::from_raw(None, None, Some("password_hash"), SORTABLE);
        assert_eq!(req.sort, "created_at");
        let req = PageRequest::from_raw(None, None, Some("year"), SORTABLE);
        assert_eq!(req.sort, "year");
    }

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        let req = PageRequest::from_raw(Some("1"), Some("10"), None, SORTABLE);
        assert_eq!(Page::<()>::new(vec![], 0, &req).pages, 0);
        assert_eq!(Page::<()>::new(vec![], 1, &req).pages, 1);
        assert_eq!(Page::<()>::new(vec![], 10, &req).pages, 1);
        assert_eq!(Page::<()>::new(vec![], 11, &req).pages, 2);
    }

    #[test]
    fn envelope_echoes_window() {
        let req = PageRequest::from_raw(Some("2"), Some("5"), None, SORTABLE);
        let page = Page::new(vec![1, 2, 3], 13, &req);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 5);
        assert_eq!(page.total, 13);
        assert_eq!(page.pages, 3);
    }
}
