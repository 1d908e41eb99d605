use axum::extract::Multipart;

use crate::{
    audit::log_audit,
    clients::ProfileImage,
    dto::profile_image::ProfileImageResponse,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const FILE_FIELD: &str = "file";
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Pulls the `file` part out of the form. Other parts are ignored.
pub async fn read_profile_image(mut multipart: Multipart) -> AppResult<ProfileImage> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "profile-image".to_string());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let bytes = field.bytes().await?.to_vec();
        return Ok(ProfileImage {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::bad_request(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}

pub fn validate_profile_image(image: &ProfileImage, max_bytes: usize) -> AppResult<()> {
    if !ALLOWED_CONTENT_TYPES.contains(&image.content_type.as_str()) {
        return Err(AppError::bad_request(format!(
            "unsupported image type '{}', expected png, jpeg or webp",
            image.content_type
        )));
    }
    if image.bytes.is_empty() {
        return Err(AppError::bad_request("image is empty"));
    }
    if image.bytes.len() > max_bytes {
        return Err(AppError::bad_request(format!(
            "image exceeds {max_bytes} bytes"
        )));
    }
    Ok(())
}

pub async fn upload_profile_image(
    state: &AppState,
    user: &AuthUser,
    image: ProfileImage,
) -> AppResult<ApiResponse<ProfileImageResponse>> {
    validate_profile_image(&image, state.config.profile_image_max_bytes)?;

    let size = image.bytes.len();
    let url = state
        .identity
        .upload_profile_image(user.user_id, image)
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "profile_image_upload",
        Some("users"),
        Some(serde_json::json!({ "bytes": size })),
    )
    .await;

    Ok(ApiResponse::success(
        "Profile image uploaded",
        ProfileImageResponse { url },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(content_type: &str, len: usize) -> ProfileImage {
        ProfileImage {
            file_name: "me.png".into(),
            content_type: content_type.into(),
            bytes: vec![7; len],
        }
    }

    #[test]
    fn accepts_supported_images_within_limit() {
        assert!(validate_profile_image(&image("image/png", 10), 10).is_ok());
        assert!(validate_profile_image(&image("image/webp", 1), 10).is_ok());
    }

    #[test]
    fn rejects_wrong_type_empty_and_oversized() {
        assert!(validate_profile_image(&image("image/gif", 10), 100).is_err());
        assert!(validate_profile_image(&image("image/png", 0), 100).is_err());
        assert!(validate_profile_image(&image("image/jpeg", 101), 100).is_err());
    }
}
