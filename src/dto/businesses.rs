use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Business;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub timezone_id: Option<Uuid>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct BusinessList {
    #[schema(value_type = Vec<Business>)]
    pub items: Vec<Business>,
}
