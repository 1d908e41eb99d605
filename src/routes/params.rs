use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

pub const MAX_PAGE_SIZE: i64 = 100;

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub size: u64,
}

impl PageWindow {
    pub fn new(page: Option<i64>, size: Option<i64>, default_size: i64) -> AppResult<Self> {
        let page = page.unwrap_or(0);
        let size = size.unwrap_or(default_size);
        if page < 0 {
            return Err(AppError::bad_request("page must not be negative"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&size) {
            return Err(AppError::bad_request(format!(
                "size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self {
            page: page as u64,
            size: size as u64,
        })
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// Read an optional integer out of a raw query map.
pub fn int_param(raw: Option<&String>, name: &str) -> AppResult<Option<i64>> {
    raw.map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| AppError::bad_request(format!("{name} must be an integer")))
        })
        .transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FavoriteQuery {
    /// `stores`, `products` or `offers`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Zero-based page index, default 0
    pub page: Option<i64>,
    /// Page size, default 10
    pub size: Option<i64>,
    pub sort: Option<String>,
}
