use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult, models::Timezone, response::ApiResponse, services::timezone_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active_timezones))
        .route("/all", get(list_all_timezones))
}

#[utoipa::path(
    get,
    path = "/api/v1/timezones",
    responses(
        (status = 200, description = "Active timezones", body = ApiResponse<Vec<Timezone>>)
    ),
    tag = "Timezones"
)]
pub async fn list_active_timezones(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Timezone>>>> {
    Ok(Json(timezone_service::list_timezones(&state, true).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/timezones/all",
    responses(
        (status = 200, description = "Every timezone", body = ApiResponse<Vec<Timezone>>)
    ),
    tag = "Timezones"
)]
pub async fn list_all_timezones(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<Timezone>>>> {
    Ok(Json(timezone_service::list_timezones(&state, false).await?))
}
