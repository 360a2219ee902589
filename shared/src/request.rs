//! List query types
//!
//! Every list endpoint takes `page`, `pageSize`, an optional `search` and a
//! resource-specific filter flattened into the same query string.

use serde::{Deserialize, Serialize};

/// Page size a fresh store starts with
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Entities and update payloads that carry a backend-assigned id
pub trait Identified {
    fn id(&self) -> &str;
}

/// Paged list query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F = NoFilter> {
    /// Page number (1-based)
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Free-text search, omitted when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search: String,
    /// Resource-specific filter
    #[serde(flatten)]
    pub filter: F,
}

impl<F: Default> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            filter: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    /// Returns true when page and page size are both at least 1
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && self.page_size >= 1
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.page_size as usize
    }
}

/// Filter for resources without extra list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoFilter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let query: ListQuery = ListQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert!(query.search.is_empty());
        assert!(query.is_valid());
    }

    #[test]
    fn test_query_serializes_camel_case_and_skips_empty_search() {
        let query: ListQuery = ListQuery {
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"page": 2, "pageSize": 10}));
    }

    #[test]
    fn test_offset() {
        let query: ListQuery = ListQuery {
            page: 3,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 20);
        let invalid: ListQuery = ListQuery {
            page: 0,
            ..Default::default()
        };
        assert!(!invalid.is_valid());
        assert_eq!(invalid.offset(), 0);
    }
}
