use std::cmp::Ordering;

use thiserror::Error;

use crate::{error::AppError, models::Campaign, routes::params::SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignSortField {
    Name,
    StartDate,
    EndDate,
    CreatedDate,
}

impl CampaignSortField {
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "name" => Some(CampaignSortField::Name),
            "start_date" => Some(CampaignSortField::StartDate),
            "end_date" => Some(CampaignSortField::EndDate),
            "created_date" => Some(CampaignSortField::CreatedDate),
            _ => None,
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            CampaignSortField::Name => "name",
            CampaignSortField::StartDate => "start_date",
            CampaignSortField::EndDate => "end_date",
            CampaignSortField::CreatedDate => "created_date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignSort {
    pub field: CampaignSortField,
    pub order: SortOrder,
}

impl CampaignSort {
    pub fn new(field: CampaignSortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    pub fn compare(&self, a: &Campaign, b: &Campaign) -> Ordering {
        let ordering = match self.field {
            CampaignSortField::Name => a.name.cmp(&b.name),
            CampaignSortField::StartDate => a.start_date.cmp(&b.start_date),
            CampaignSortField::EndDate => a.end_date.cmp(&b.end_date),
            CampaignSortField::CreatedDate => a.created_at.cmp(&b.created_at),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSort {
    #[error("sort contains an empty field")]
    EmptyToken,
    #[error("unknown sort field '{0}'")]
    UnknownField(String),
}

impl From<InvalidSort> for AppError {
    fn from(err: InvalidSort) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

pub fn default_sort() -> Vec<CampaignSort> {
    vec![CampaignSort::new(
        CampaignSortField::CreatedDate,
        SortOrder::Desc,
    )]
}

/// Parse `"-start_date,name"` style sort strings. A leading `-` means
/// descending. Blank input falls back to newest first.
pub fn parse_sort(raw: Option<&str>) -> Result<Vec<CampaignSort>, InvalidSort> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(default_sort()),
    };

    raw.split(',')
        .map(|token| {
            let token = token.trim();
            let (alias, order) = match token.strip_prefix('-') {
                Some(rest) => (rest, SortOrder::Desc),
                None => (token, SortOrder::Asc),
            };
            if alias.is_empty() {
                return Err(InvalidSort::EmptyToken);
            }
            CampaignSortField::from_alias(alias)
                .map(|field| CampaignSort::new(field, order))
                .ok_or_else(|| InvalidSort::UnknownField(alias.to_string()))
        })
        .collect()
}
