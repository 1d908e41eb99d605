use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    pub business_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    /// Minor currency units
    pub price: i64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LinkProductRequest {
    pub product_id: Uuid,
    pub campaign_id: Uuid,
}
