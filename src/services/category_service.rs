use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<Vec<Category>>> {
    let items = state.store.categories.list_active_categories().await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        items,
        Some(Meta::total(total)),
    ))
}

pub async fn get_category(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Category>> {
    let category = state
        .store
        .categories
        .find_category(id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn list_subcategories(
    state: &AppState,
    parent_id: Uuid,
) -> AppResult<ApiResponse<Vec<Category>>> {
    let items = state
        .store
        .categories
        .find_categories_by_parent(parent_id)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Categories",
        items,
        Some(Meta::total(total)),
    ))
}
