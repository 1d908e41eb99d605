use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::campaigns::{CampaignList, CampaignListQuery, CreateCampaignRequest, UpdateCampaignRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Campaign,
    response::ApiResponse,
    services::{campaign_filter::QueryMap, campaign_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_campaigns).post(create_campaign))
        .route("/{id}", get(get_campaign).patch(update_campaign))
}

#[utoipa::path(
    get,
    path = "/api/v1/campaigns",
    params(CampaignListQuery),
    responses(
        (status = 200, description = "Filtered, sorted page of campaigns", body = ApiResponse<CampaignList>),
        (status = 400, description = "Invalid filter, sort or paging")
    ),
    tag = "Campaigns"
)]
pub async fn list_campaigns(
    State(state): State<AppState>,
    params: Result<Query<QueryMap>, QueryRejection>,
) -> AppResult<Json<ApiResponse<CampaignList>>> {
    let Query(params) = params?;
    let resp = campaign_service::list_campaigns(&state, &params).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/v1/campaigns/{id}",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    responses(
        (status = 200, description = "Campaign", body = ApiResponse<Campaign>),
        (status = 404, description = "Campaign not found")
    ),
    tag = "Campaigns"
)]
pub async fn get_campaign(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<ApiResponse<Campaign>>> {
    let Path(id) = id?;
    let resp = campaign_service::get_campaign(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/v1/campaigns",
    request_body = CreateCampaignRequest,
    responses(
        (status = 201, description = "Campaign created", body = ApiResponse<Campaign>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Business or category not found")
    ),
    security(("session_token" = [])),
    tag = "Campaigns"
)]
pub async fn create_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateCampaignRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Campaign>>)> {
    let Json(payload) = payload?;
    let resp = campaign_service::create_campaign(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/campaigns/{id}",
    params(
        ("id" = Uuid, Path, description = "Campaign ID")
    ),
    request_body = UpdateCampaignRequest,
    responses(
        (status = 200, description = "Campaign updated", body = ApiResponse<Campaign>),
        (status = 400, description = "Bad Request"),
        (status = 403, description = "Caller does not own the business"),
        (status = 404, description = "Campaign, business or category not found"),
        (status = 409, description = "Stale last_update")
    ),
    security(("session_token" = [])),
    tag = "Campaigns"
)]
pub async fn update_campaign(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateCampaignRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Campaign>>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let resp = campaign_service::update_campaign(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
