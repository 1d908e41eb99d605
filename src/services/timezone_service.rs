use crate::{
    error::AppResult,
    models::Timezone,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Active timezones when `active_only`, otherwise every row.
pub async fn list_timezones(
    state: &AppState,
    active_only: bool,
) -> AppResult<ApiResponse<Vec<Timezone>>> {
    let items = state.store.timezones.list_timezones(active_only).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Timezones",
        items,
        Some(Meta::total(total)),
    ))
}
