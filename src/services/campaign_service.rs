use chrono::Duration;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::campaigns::{CampaignList, CreateCampaignRequest, UpdateCampaignRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{Business, Campaign},
    repository::CampaignQuery,
    response::{ApiResponse, Meta},
    routes::params::{PageWindow, int_param},
    services::{
        campaign_filter::{CampaignFilter, QueryMap},
        campaign_sort::parse_sort,
        now,
    },
    state::AppState,
    validation::validate_name,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

async fn require_business(state: &AppState, id: Uuid) -> AppResult<Business> {
    state
        .store
        .businesses
        .find_business(id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))
}

async fn require_category(state: &AppState, id: Uuid) -> AppResult<()> {
    state
        .store
        .categories
        .find_category(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::not_found("Category"))
}

fn ensure_dates(campaign: &Campaign) -> AppResult<()> {
    if campaign.start_date > campaign.end_date {
        return Err(AppError::bad_request(
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

pub async fn create_campaign(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCampaignRequest,
) -> AppResult<ApiResponse<Campaign>> {
    let name = validate_name("name", &payload.name)?;
    if payload.start_date > payload.end_date {
        return Err(AppError::bad_request(
            "start_date must not be after end_date",
        ));
    }

    require_category(state, payload.category_id).await?;
    let business = require_business(state, payload.business_id).await?;
    ensure_owner(user, business.owner_id)?;

    let timestamp = now();
    let campaign = state
        .store
        .campaigns
        .insert_campaign(Campaign {
            id: Uuid::new_v4(),
            name,
            description: payload.description,
            start_date: payload.start_date,
            end_date: payload.end_date,
            category_id: payload.category_id,
            business_id: payload.business_id,
            active: payload.active.unwrap_or(true),
            created_at: timestamp,
            last_update: timestamp,
        })
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "campaign_create",
        Some("campaigns"),
        Some(serde_json::json!({ "campaign_id": campaign.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Campaign created",
        campaign,
        Some(Meta::empty()),
    ))
}

pub async fn get_campaign(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Campaign>> {
    let campaign = state
        .store
        .campaigns
        .find_campaign(id)
        .await?
        .ok_or_else(|| AppError::not_found("Campaign"))?;
    Ok(ApiResponse::success("Campaign", campaign, None))
}

pub async fn list_campaigns(
    state: &AppState,
    params: &QueryMap,
) -> AppResult<ApiResponse<CampaignList>> {
    let filter = CampaignFilter::from_params(params)?;
    let sort = parse_sort(params.get("sort").map(String::as_str))?;
    let window = PageWindow::new(
        int_param(params.get("page"), "page")?,
        int_param(params.get("size"), "size")?,
        DEFAULT_PAGE_SIZE,
    )?;

    let query = CampaignQuery {
        filter,
        sort,
        page: window.page,
        size: window.size,
    };
    let (items, total) = state.store.campaigns.list_campaigns(&query).await?;

    let meta = Meta::new(window.page as i64, window.size as i64, total as i64);
    Ok(ApiResponse::success(
        "Campaigns",
        CampaignList { items },
        Some(meta),
    ))
}

/// Partial update guarded by the `last_update` token.
pub async fn update_campaign(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCampaignRequest,
) -> AppResult<ApiResponse<Campaign>> {
    let stored = state
        .store
        .campaigns
        .find_campaign(id)
        .await?
        .ok_or_else(|| AppError::not_found("Campaign"))?;

    let owner = require_business(state, stored.business_id).await?;
    ensure_owner(user, owner.owner_id)?;

    if let Some(seen) = payload.last_update {
        if seen != stored.last_update {
            return Err(AppError::Conflict(
                "campaign was modified by someone else, reload and retry".into(),
            ));
        }
    }

    if let Some(category_id) = payload.category_id {
        require_category(state, category_id).await?;
    }
    if let Some(business_id) = payload.business_id {
        if business_id != stored.business_id {
            let target = require_business(state, business_id).await?;
            ensure_owner(user, target.owner_id)?;
        }
    }

    let mut updated = stored.clone();
    if let Some(name) = payload.name.as_deref() {
        updated.name = validate_name("name", name)?;
    }
    if let Some(description) = payload.description {
        updated.description = Some(description);
    }
    if let Some(start_date) = payload.start_date {
        updated.start_date = start_date;
    }
    if let Some(end_date) = payload.end_date {
        updated.end_date = end_date;
    }
    if let Some(category_id) = payload.category_id {
        updated.category_id = category_id;
    }
    if let Some(business_id) = payload.business_id {
        updated.business_id = business_id;
    }
    if let Some(active) = payload.active {
        updated.active = active;
    }
    ensure_dates(&updated)?;

    if updated == stored {
        return Ok(ApiResponse::success(
            "Campaign unchanged",
            stored,
            Some(Meta::empty()),
        ));
    }

    // the token must move even when the clock has not
    updated.last_update = now().max(stored.last_update + Duration::microseconds(1));
    let campaign = state.store.campaigns.update_campaign(updated).await?;

    log_audit(
        state,
        Some(user.user_id),
        "campaign_update",
        Some("campaigns"),
        Some(serde_json::json!({ "campaign_id": campaign.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Campaign updated",
        campaign,
        Some(Meta::empty()),
    ))
}
