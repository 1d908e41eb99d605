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
    dto::products::{CreateProductRequest, LinkProductRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CampaignProduct, Product},
    response::ApiResponse,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_product))
        .route("/link", post(link_product))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let Path(id) = id?;
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Business or category not found")
    ),
    security(("session_token" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let Json(payload) = payload?;
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/link",
    request_body = LinkProductRequest,
    responses(
        (status = 201, description = "Product linked to campaign", body = ApiResponse<CampaignProduct>),
        (status = 400, description = "Product and campaign belong to different businesses"),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Product or campaign not found"),
        (status = 409, description = "Already linked")
    ),
    security(("session_token" = [])),
    tag = "Products"
)]
pub async fn link_product(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<LinkProductRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<CampaignProduct>>)> {
    let Json(payload) = payload?;
    let resp = product_service::link_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
