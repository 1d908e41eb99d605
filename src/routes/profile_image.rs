use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    routing::post,
};

use crate::{
    dto::profile_image::{ProfileImageResponse, ProfileImageUpload},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::profile_image_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload_profile_image))
}

#[utoipa::path(
    post,
    path = "/api/v1/profile-image",
    request_body(content = ProfileImageUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image URL", body = ApiResponse<ProfileImageResponse>),
        (status = 400, description = "Missing, empty, oversized or unsupported image"),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(("session_token" = [])),
    tag = "Users"
)]
pub async fn upload_profile_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<ApiResponse<ProfileImageResponse>>> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let image = profile_image_service::read_profile_image(multipart).await?;
    let resp = profile_image_service::upload_profile_image(&state, &user, image).await?;
    Ok(Json(resp))
}
