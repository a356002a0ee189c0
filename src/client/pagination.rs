//! Limit/offset pagination for directory listings

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Page size used by the directory grid
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Limit/offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: usize,
    pub offset: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl PageParams {
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// The window right after this one
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ]
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub results: Vec<T>,

    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

impl<T: for<'de> Deserialize<'de>> Page<T> {
    /// Decode a listing body.
    ///
    /// Paginated endpoints answer `{results, next}`; older deployments answer
    /// the whole collection as a bare array, which is sliced to the window here.
    pub fn from_body(body: Value, params: PageParams, request_url: &str) -> Result<Self, ApiError> {
        match body {
            Value::Array(items) => {
                let total = items.len();
                let results = items
                    .into_iter()
                    .skip(params.offset)
                    .take(params.limit)
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<T>, _>>()
                    .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
                let next = (total > params.offset.saturating_add(params.limit))
                    .then(|| request_url.to_string());
                Ok(Self { results, next })
            }
            Value::Object(_) => {
                serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
            }
            other => Err(ApiError::InvalidResponse(format!(
                "Expected a list, got {}",
                other
            ))),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}
