use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::DigitalContact;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateDigitalContactRequest {
    pub business_id: Uuid,
    /// website, email, phone, whatsapp, facebook, instagram, x, tiktok,
    /// linkedin or youtube
    pub contact_type: String,
    pub value: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DigitalContactList {
    #[schema(value_type = Vec<DigitalContact>)]
    pub items: Vec<DigitalContact>,
}
