use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::businesses::{BusinessList, CreateBusinessRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Business,
    response::ApiResponse,
    services::business_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_business))
        .route("/{id}", get(get_business).delete(delete_business))
        .route("/user/{user_id}", get(list_user_businesses))
}

#[utoipa::path(
    post,
    path = "/api/v1/businesses",
    request_body = CreateBusinessRequest,
    responses(
        (status = 201, description = "Business created", body = ApiResponse<Business>),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Category or timezone not found"),
        (status = 409, description = "Name or alias already taken")
    ),
    security(("session_token" = [])),
    tag = "Businesses"
)]
pub async fn create_business(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateBusinessRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Business>>)> {
    let Json(payload) = payload?;
    let resp = business_service::create_business(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/v1/businesses/{id}",
    params(
        ("id" = Uuid, Path, description = "Business ID")
    ),
    responses(
        (status = 200, description = "Business", body = ApiResponse<Business>),
        (status = 404, description = "Business not found")
    ),
    tag = "Businesses"
)]
pub async fn get_business(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<Business>>> {
    let Path(id) = id?;
    let resp = business_service::get_business(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/businesses/user/{user_id}",
    params(
        ("user_id" = Uuid, Path, description = "Owner user ID")
    ),
    responses(
        (status = 200, description = "Businesses owned by the user", body = ApiResponse<BusinessList>)
    ),
    tag = "Businesses"
)]
pub async fn list_user_businesses(
    State(state): State<AppState>,
    user_id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<BusinessList>>> {
    let Path(user_id) = user_id?;
    let resp = business_service::list_user_businesses(&state, user_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/v1/businesses/{id}",
    params(
        ("id" = Uuid, Path, description = "Business ID")
    ),
    responses(
        (status = 200, description = "Business deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Business not found")
    ),
    security(("session_token" = [])),
    tag = "Businesses"
)]
pub async fn delete_business(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = business_service::delete_business(&state, &user, id).await?;
    Ok(Json(resp))
}
