use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod businesses;
pub mod campaigns;
pub mod categories;
pub mod digital_contacts;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;
pub mod products;
pub mod profile_image;
pub mod timezones;
pub mod users;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/businesses", businesses::router())
        .nest("/campaigns", campaigns::router())
        .nest("/categories", categories::router())
        .nest("/digital-contact", digital_contacts::router())
        .nest("/favorites", favorites::router())
        .nest("/products", products::router())
        .nest("/profile-image", profile_image::router())
        .nest("/timezones", timezones::router())
        .nest("/users", users::router())
}

/// The whole application without the outer tower layers.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
