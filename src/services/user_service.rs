use uuid::Uuid;

use crate::{
    audit::log_audit,
    clients::{EmailMessage, NewIdentityUser},
    dto::users::RegisterUserRequest,
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
    validation::{is_valid_email, is_valid_phone, validate_name},
};

pub const PASSWORD_MIN_LEN: usize = 8;

pub async fn register_user(
    state: &AppState,
    payload: RegisterUserRequest,
) -> AppResult<ApiResponse<User>> {
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::bad_request("email is not valid"));
    }
    let first_name = validate_name("first_name", &payload.first_name)?;
    let last_name = validate_name("last_name", &payload.last_name)?;
    if payload.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::bad_request(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    let phone = payload
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    if phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
        return Err(AppError::bad_request("phone is not valid"));
    }

    let user = state
        .identity
        .create_user(NewIdentityUser {
            email,
            password: payload.password,
            first_name,
            last_name,
            phone,
            application_id: state.config.application_id.clone(),
            role_id: state.config.initial_role_id.clone(),
        })
        .await?;

    let welcome = EmailMessage {
        to: user.email.clone(),
        subject: "Welcome".to_string(),
        template: "welcome".to_string(),
        variables: serde_json::json!({ "first_name": user.first_name }),
    };
    if let Err(err) = state.mailer.dispatch(welcome).await {
        tracing::warn!(error = %err, user_id = %user.id, "welcome email dispatch failed");
    }

    log_audit(
        state,
        Some(user.id),
        "user_register",
        Some("users"),
        None,
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        user,
        Some(Meta::empty()),
    ))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let user = state.identity.get_user(id).await?;
    Ok(ApiResponse::success("User", user, None))
}
