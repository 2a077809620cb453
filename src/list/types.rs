use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ListError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc", alias = "ASC")]
    Asc,
    #[serde(rename = "desc", alias = "DESC")]
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A single substring filter as sent by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFilter {
    pub column: String,
    pub value: String,
}

/// Raw request body for `POST /lists/:resource`. Everything is optional here
/// so missing fields surface as validation errors rather than JSON rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
    #[serde(default)]
    pub filters: Option<Vec<ListFilter>>,
}

/// Validated list request: `page` and `page_size` are positive.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub page: i64,
    pub page_size: i64,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub filters: Vec<ListFilter>,
}

impl ListRequest {
    /// Validate raw params. A page size above `max_page_size` is capped.
    pub fn from_params(params: ListParams, max_page_size: i64) -> Result<Self, ListError> {
        let page = match params.page {
            Some(p) if p > 0 => p,
            Some(p) => return Err(ListError::InvalidPage(format!("page must be a positive integer, got {}", p))),
            None => return Err(ListError::InvalidPage("page is required".to_string())),
        };

        let requested = match params.page_size {
            Some(s) if s > 0 => s,
            Some(s) => {
                return Err(ListError::InvalidPageSize(format!(
                    "pageSize must be a positive integer, got {}",
                    s
                )))
            }
            None => return Err(ListError::InvalidPageSize("pageSize is required".to_string())),
        };

        let page_size = if max_page_size > 0 && requested > max_page_size {
            tracing::warn!("pageSize {} exceeds max {}, capping to max", requested, max_page_size);
            max_page_size
        } else {
            requested
        };

        // Offsets beyond i64 are not representable in LIMIT/OFFSET.
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(ListError::InvalidPage(format!("page {} is out of range", page)));
        }

        Ok(Self {
            page,
            page_size,
            sort_by: params.sort_by.filter(|s| !s.trim().is_empty()),
            sort_direction: params.sort_direction.unwrap_or_default(),
            filters: params.filters.unwrap_or_default(),
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Uniform list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub data: Vec<Value>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
