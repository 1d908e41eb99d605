use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::digital_contacts::{CreateDigitalContactRequest, DigitalContactList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::DigitalContact,
    response::ApiResponse,
    services::digital_contact_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_digital_contacts).post(create_digital_contact))
        .route("/{id}", get(get_digital_contact))
        .route("/business/{business_id}", get(list_business_contacts))
}

#[utoipa::path(
    get,
    path = "/api/v1/digital-contact",
    responses(
        (status = 200, description = "All digital contacts", body = ApiResponse<DigitalContactList>)
    ),
    tag = "Digital contacts"
)]
pub async fn list_digital_contacts(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DigitalContactList>>> {
    let resp = digital_contact_service::list_digital_contacts(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/digital-contact/{id}",
    params(
        ("id" = Uuid, Path, description = "Digital contact ID")
    ),
    responses(
        (status = 200, description = "Digital contact", body = ApiResponse<DigitalContact>),
        (status = 404, description = "Digital contact not found")
    ),
    tag = "Digital contacts"
)]
pub async fn get_digital_contact(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<DigitalContact>>> {
    let Path(id) = id?;
    let resp = digital_contact_service::get_digital_contact(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/digital-contact/business/{business_id}",
    params(
        ("business_id" = Uuid, Path, description = "Business ID")
    ),
    responses(
        (status = 200, description = "Contacts of a business", body = ApiResponse<DigitalContactList>)
    ),
    tag = "Digital contacts"
)]
pub async fn list_business_contacts(
    State(state): State<AppState>,
    business_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<DigitalContactList>>> {
    let Path(business_id) = business_id?;
    let resp = digital_contact_service::list_business_contacts(&state, business_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/digital-contact",
    request_body = CreateDigitalContactRequest,
    responses(
        (status = 201, description = "Digital contact created", body = ApiResponse<DigitalContact>),
        (status = 400, description = "Unknown type or invalid value"),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Business not found"),
        (status = 409, description = "Business already has a contact of this type")
    ),
    security(("session_token" = [])),
    tag = "Digital contacts"
)]
pub async fn create_digital_contact(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateDigitalContactRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<DigitalContact>>)> {
    let Json(payload) = payload?;
    let resp = digital_contact_service::create_digital_contact(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
