use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::favorites::{CreateFavoriteRequest, FavoriteResponse, FavoritesPage},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::FavoriteQuery,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/{id}", delete(remove_favorite))
}

#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    params(FavoriteQuery),
    responses(
        (status = 200, description = "Favorites grouped by kind", body = ApiResponse<FavoritesPage>),
        (status = 400, description = "Unknown type or bad paging"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 501, description = "Sorting is not supported")
    ),
    security(("session_token" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<FavoriteQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<FavoritesPage>>> {
    let Query(query) = query?;
    let resp = favorite_service::list_favorites(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/favorites",
    request_body = CreateFavoriteRequest,
    responses(
        (status = 201, description = "Added to favorites", body = ApiResponse<FavoriteResponse>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Already a favorite")
    ),
    security(("session_token" = [])),
    tag = "Favorites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateFavoriteRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<FavoriteResponse>>)> {
    let Json(payload) = payload?;
    let resp = favorite_service::add_favorite(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/favorites/{id}",
    params(
        ("id" = Uuid, Path, description = "Favorite ID")
    ),
    responses(
        (status = 200, description = "Removed from favorites", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Favorite belongs to another user"),
        (status = 404, description = "Favorite not found")
    ),
    security(("session_token" = [])),
    tag = "Favorites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let Path(id) = id?;
    let resp = favorite_service::remove_favorite(&state, &user, id).await?;
    Ok(Json(resp))
}
