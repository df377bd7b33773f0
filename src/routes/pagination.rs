//! Pagination query parameters and response envelope for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints.
pub const DEFAULT_PER_PAGE: usize = 20;

/// Upper bound on the page size a client may request.
pub const MAX_PER_PAGE: usize = 100;

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number (default 1).
    #[serde(default)]
    pub page: Option<usize>,
    /// Items per page (default 20, capped at 100).
    #[serde(default)]
    pub per_page: Option<usize>,
}

impl PageQuery {
    /// Resolve the effective (page, per_page) pair.
    pub fn resolve(&self) -> (usize, usize) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

/// One page of results plus the total count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    /// Slice `items` down to the requested page.
    pub fn paginate(items: Vec<T>, query: &PageQuery) -> Self {
        let (page, per_page) = query.resolve();
        let total = items.len();
        let start = (page - 1).saturating_mul(per_page);
        let items: Vec<T> = items
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();
        Self {
            items,
            total,
            page,
            per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PageQuery::default();
        assert_eq!(q.resolve(), (1, DEFAULT_PER_PAGE));
    }

    #[test]
    fn test_per_page_is_capped() {
        let q = PageQuery {
            page: Some(2),
            per_page: Some(1000),
        };
        assert_eq!(q.resolve(), (2, MAX_PER_PAGE));
    }

    #[test]
    fn test_paginate_slices() {
        let q = PageQuery {
            page: Some(2),
            per_page: Some(3),
        };
        let page = Page::paginate((1..=8).collect::<Vec<i32>>(), &q);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 8);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_paginate_past_end() {
        let q = PageQuery {
            page: Some(5),
            per_page: Some(10),
        };
        let page = Page::paginate(vec![1, 2, 3], &q);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
