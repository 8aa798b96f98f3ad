//! Page-based pagination for list endpoints.
//!
//! Query parameters use the web client's camelCase names:
//!
//! - `page`: page number (1-indexed, default: 1)
//! - `pageSize`: items per page (1-200, default: 20)
//!
//! # Example
//!
//! ```ignore
//! use examguard_core::pagination::{PageParams, Paginated};
//!
//! async fn list(Query(params): Query<PageParams>) -> Result<Json<Paginated<Row>>, AppError> {
//!     let rows = fetch(params.page_size(), params.offset()).await?;
//!     let total = count().await?;
//!     Ok(Json(Paginated::new(rows, total, &params)))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 200;

/// Deserializes an optional string into an optional i64.
///
/// Query parameters may arrive as empty strings, which are treated as `None`.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-200, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl PageParams {
    /// Returns the page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the page size, clamped to [1, 200].
    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip; saturates instead of overflowing on absurd pages.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

/// A page of rows plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub ok: bool,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub rows: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(rows: Vec<T>, total: i64, params: &PageParams) -> Self {
        Self {
            ok: true,
            total,
            page: params.page(),
            page_size: params.page_size(),
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_size_is_capped() {
        let params = PageParams {
            page: Some(1),
            page_size: Some(500),
        };
        assert_eq!(params.page_size(), 200);
    }

    #[test]
    fn test_non_positive_values_are_clamped() {
        let params = PageParams {
            page: Some(-3),
            page_size: Some(0),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 1);
    }

    #[test]
    fn test_offset_from_page() {
        let params = PageParams {
            page: Some(3),
            page_size: Some(25),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let params: PageParams =
            serde_json::from_str(r#"{"page":"9223372036854775807","pageSize":"200"}"#).unwrap();
        assert_eq!(params.page(), i64::MAX);
        assert_eq!(params.offset(), i64::MAX);
    }

    #[test]
    fn test_deserialize_camel_case_strings() {
        let json = r#"{"page":"2","pageSize":"50"}"#;
        let params: PageParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.page_size(), 50);
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let json = r#"{"page":"","pageSize":""}"#;
        let params: PageParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.page_size(), 20);
    }

    #[test]
    fn test_paginated_serializes_camel_case() {
        let params = PageParams::default();
        let page = Paginated::new(vec![1, 2, 3], 3, &params);
        let serialized = serde_json::to_string(&page).unwrap();
        assert!(serialized.contains(r#""pageSize":20"#));
        assert!(serialized.contains(r#""total":3"#));
        assert!(serialized.contains(r#""ok":true"#));
    }
}
