use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, LinkProductRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::{CampaignProduct, Product},
    response::{ApiResponse, Meta},
    services::now,
    state::AppState,
    validation::validate_name,
};

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let name = validate_name("name", &payload.name)?;
    if payload.price < 0 {
        return Err(AppError::bad_request("price must not be negative"));
    }

    let business = state
        .store
        .businesses
        .find_business(payload.business_id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))?;
    ensure_owner(user, business.owner_id)?;

    if let Some(category_id) = payload.category_id {
        if state.store.categories.find_category(category_id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }
    }

    let timestamp = now();
    let product = state
        .store
        .products
        .insert_product(Product {
            id: Uuid::new_v4(),
            business_id: business.id,
            category_id: payload.category_id,
            name,
            description: payload.description,
            price: payload.price,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id, "business_id": business.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .products
        .find_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(ApiResponse::success("Product", product, None))
}

/// Attach a product to a campaign of the same business.
pub async fn link_product(
    state: &AppState,
    user: &AuthUser,
    payload: LinkProductRequest,
) -> AppResult<ApiResponse<CampaignProduct>> {
    let product = state
        .store
        .products
        .find_product(payload.product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    let campaign = state
        .store
        .campaigns
        .find_campaign(payload.campaign_id)
        .await?
        .ok_or_else(|| AppError::not_found("Campaign"))?;

    if product.business_id != campaign.business_id {
        return Err(AppError::bad_request(
            "product and campaign belong to different businesses",
        ));
    }

    let business = state
        .store
        .businesses
        .find_business(campaign.business_id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))?;
    ensure_owner(user, business.owner_id)?;

    if state
        .store
        .campaigns
        .find_campaign_product(campaign.id, product.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "product is already linked to this campaign".into(),
        ));
    }

    let link = state
        .store
        .campaigns
        .insert_campaign_product(CampaignProduct {
            id: Uuid::new_v4(),
            campaign_id: campaign.id,
            product_id: product.id,
            created_at: now(),
        })
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "product_link",
        Some("campaign_products"),
        Some(serde_json::json!({ "campaign_id": campaign.id, "product_id": product.id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Product linked",
        link,
        Some(Meta::empty()),
    ))
}
