use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::digital_contacts::{CreateDigitalContactRequest, DigitalContactList},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::DigitalContact,
    response::{ApiResponse, Meta},
    services::now,
    state::AppState,
    validation::{is_valid_email, is_valid_phone, is_valid_url},
};

pub const CONTACT_TYPES: [&str; 10] = [
    "website",
    "email",
    "phone",
    "whatsapp",
    "facebook",
    "instagram",
    "x",
    "tiktok",
    "linkedin",
    "youtube",
];

/// Normalizes the type and checks the value against the pattern for it.
pub fn validate_contact(contact_type: &str, value: &str) -> AppResult<(String, String)> {
    let contact_type = contact_type.trim().to_ascii_lowercase();
    if !CONTACT_TYPES.contains(&contact_type.as_str()) {
        return Err(AppError::bad_request(format!(
            "unknown contact type '{contact_type}'"
        )));
    }

    let value = value.trim();
    let valid = match contact_type.as_str() {
        "email" => is_valid_email(value),
        "phone" => is_valid_phone(value),
        _ => is_valid_url(value),
    };
    if !valid {
        return Err(AppError::bad_request(format!(
            "invalid value for contact type '{contact_type}'"
        )));
    }
    Ok((contact_type, value.to_string()))
}

pub async fn list_digital_contacts(state: &AppState) -> AppResult<ApiResponse<DigitalContactList>> {
    let items = state.store.digital_contacts.list_digital_contacts().await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Digital contacts",
        DigitalContactList { items },
        Some(Meta::total(total)),
    ))
}

pub async fn get_digital_contact(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<DigitalContact>> {
    let contact = state
        .store
        .digital_contacts
        .find_digital_contact(id)
        .await?
        .ok_or_else(|| AppError::not_found("Digital contact"))?;
    Ok(ApiResponse::success("Digital contact", contact, None))
}

pub async fn list_business_contacts(
    state: &AppState,
    business_id: Uuid,
) -> AppResult<ApiResponse<DigitalContactList>> {
    let items = state
        .store
        .digital_contacts
        .find_digital_contacts_by_business(business_id)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Digital contacts",
        DigitalContactList { items },
        Some(Meta::total(total)),
    ))
}

pub async fn create_digital_contact(
    state: &AppState,
    user: &AuthUser,
    payload: CreateDigitalContactRequest,
) -> AppResult<ApiResponse<DigitalContact>> {
    let (contact_type, value) = validate_contact(&payload.contact_type, &payload.value)?;

    let business = state
        .store
        .businesses
        .find_business(payload.business_id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))?;
    ensure_owner(user, business.owner_id)?;

    if state
        .store
        .digital_contacts
        .find_digital_contact_by_type(business.id, &contact_type)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "business already has a '{contact_type}' contact"
        )));
    }

    let timestamp = now();
    let contact = state
        .store
        .digital_contacts
        .insert_digital_contact(DigitalContact {
            id: Uuid::new_v4(),
            business_id: business.id,
            contact_type,
            value,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "digital_contact_create",
        Some("digital_contacts"),
        Some(serde_json::json!({ "contact_id": contact.id, "business_id": business.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Digital contact created",
        contact,
        Some(Meta::empty()),
    ))
}
