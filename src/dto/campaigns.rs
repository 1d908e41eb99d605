use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::Campaign;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCampaignRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category_id: Uuid,
    pub business_id: Uuid,
    pub active: Option<bool>,
}

/// Partial update. Absent fields are left alone.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub active: Option<bool>,
    /// The `last_update` the client last saw. A stale value is rejected.
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CampaignList {
    #[schema(value_type = Vec<Campaign>)]
    pub items: Vec<Campaign>,
}

/// Documented shape of the campaign list query. The handler reads the raw
/// map so legacy keys keep working.
#[allow(dead_code)]
#[derive(Debug, Deserialize, IntoParams)]
pub struct CampaignListQuery {
    /// Case-insensitive substring; legacy key `q`
    pub name: Option<String>,
    /// Legacy key `category_id`
    pub category_fk: Option<Uuid>,
    /// Legacy key `business_id`
    pub business_fk: Option<Uuid>,
    /// Legacy key `is_active`
    pub active: Option<bool>,
    /// Legacy key `start_date_from`
    pub start_from: Option<String>,
    /// Legacy key `start_date_to`
    pub start_to: Option<String>,
    /// Legacy key `end_date_from`
    pub end_from: Option<String>,
    /// Legacy key `end_date_to`
    pub end_to: Option<String>,
    /// Comma-separated fields, `-` prefix for descending
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}
