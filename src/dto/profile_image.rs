use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Multipart form with a single `file` part.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ProfileImageUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ProfileImageResponse {
    pub url: String,
}
