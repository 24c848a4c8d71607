//! Common types shared across provider API models.
//!
//! This module contains the paginated search envelope, search parameters and
//! the provider's error body. It does NOT contain resource-specific models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction forwarded to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Parameters of one paginated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text filter; empty means no filter.
    pub term: String,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
    /// Provider-side sort field, e.g. `display_name` or `registered`.
    pub order_by: Option<String>,
    pub order: Option<SortOrder>,
    /// Restrict the page to these ids (`include=1,2,3`); empty means no restriction.
    pub include: Vec<u64>,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, page: u32, per_page: u32) -> Self {
        Self {
            term: term.into(),
            page,
            per_page,
            order_by: None,
            order: None,
            include: Vec::new(),
        }
    }

    /// Query-string pairs; an empty term is omitted entirely.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if !self.term.is_empty() {
            params.push(("search", self.term.clone()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("per_page", self.per_page.to_string()));
        if let Some(order_by) = &self.order_by {
            params.push(("orderby", order_by.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order", order.to_string()));
        }
        if !self.include.is_empty() {
            let ids: Vec<String> = self.include.iter().map(u64::to_string).collect();
            params.push(("include", ids.join(",")));
        }
        params
    }
}

/// One page of search results.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    /// The provider's next-page signal.
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub has_more: bool,
    #[serde(deserialize_with = "crate::serde_helpers::u64_from_string_or_number")]
    pub total_filtered: u64,
    #[serde(deserialize_with = "crate::serde_helpers::u64_from_string_or_number")]
    pub total_global: u64,
}

/// Generic `{success}` acknowledgement.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct OperationResponse {
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_any")]
    pub success: bool,
}

/// Error body returned by the provider on non-2xx responses.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProviderErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub data: Option<ProviderErrorData>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProviderErrorData {
    pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_skip_empty_term() {
        let query = SearchQuery::new("", 1, 20);
        let params = query.to_query_params();
        assert_eq!(
            params,
            vec![("page", "1".to_string()), ("per_page", "20".to_string())]
        );
    }

    #[test]
    fn test_query_params_with_sort() {
        let mut query = SearchQuery::new("ana", 3, 10);
        query.order_by = Some("display_name".to_string());
        query.order = Some(SortOrder::Desc);
        let params = query.to_query_params();
        assert_eq!(params[0], ("search", "ana".to_string()));
        assert!(params.contains(&("orderby", "display_name".to_string())));
        assert!(params.contains(&("order", "desc".to_string())));
    }

    #[test]
    fn test_query_params_with_include() {
        let mut query = SearchQuery::new("", 1, 3);
        query.include = vec![4, 9, 12];
        let params = query.to_query_params();
        assert_eq!(params.last(), Some(&("include", "4,9,12".to_string())));
    }

    #[test]
    fn test_deserialize_page_with_string_totals() {
        let json = r#"{"items": [1, 2], "has_more": "1", "total_filtered": "2", "total_global": 9}"#;
        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_more);
        assert_eq!(page.total_filtered, 2);
        assert_eq!(page.total_global, 9);
    }

    #[test]
    fn test_deserialize_error_body() {
        let json = r#"{"code": "rest_user_invalid_id", "message": "Invalid user ID.", "data": {"status": 404}}"#;
        let body: ProviderErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.code.as_deref(), Some("rest_user_invalid_id"));
        assert_eq!(body.data.and_then(|d| d.status), Some(404));
    }
}
