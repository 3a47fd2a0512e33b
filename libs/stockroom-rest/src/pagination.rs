//! Page-number pagination shared by all list endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Upper bound a client may request per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&page_size=` query parameters
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    pub page: u64,

    /// Items per page, clamped to [`MAX_PAGE_SIZE`]
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageQuery {
    /// Page number normalized to be 1-based
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// Page size normalized into `1..=MAX_PAGE_SIZE`
    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total number of matching records
    pub total: u64,

    /// 1-based page number that was served
    pub page: u64,

    /// Page size that was served
    pub page_size: u64,
}

impl<T> Page<T> {
    /// Assemble a page from repository output and the normalized query
    pub fn new(items: Vec<T>, total: u64, query: &PageQuery) -> Self {
        Self {
            items,
            total,
            page: query.page(),
            page_size: query.page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let query: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn zero_page_is_clamped_to_first() {
        let query = PageQuery {
            page: 0,
            page_size: 0,
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 1);
    }

    #[test]
    fn oversized_page_size_is_capped() {
        let query = PageQuery {
            page: 3,
            page_size: 5000,
        };
        assert_eq!(query.page_size(), MAX_PAGE_SIZE);
    }
}
