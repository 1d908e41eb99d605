use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::businesses::{BusinessList, CreateBusinessRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::Business,
    response::{ApiResponse, Meta},
    services::now,
    state::AppState,
    validation::validate_name,
};

/// Lowercase URL slug of a business name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "business".to_string()
    } else {
        slug.to_string()
    }
}

fn alias_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{base}-{}", &suffix[..6])
}

/// Inserts the business under the first free alias. An alias taken between
/// the lookup and the insert moves on to the next candidate. Any other
/// conflict is returned as is.
async fn insert_with_alias(state: &AppState, mut business: Business) -> AppResult<Business> {
    let base = slugify(&business.name);
    let attempts = state.config.alias_max_attempts.max(1);

    for attempt in 0..attempts {
        let alias = alias_candidate(&base, attempt);
        if state.store.businesses.business_alias_exists(&alias).await? {
            tracing::debug!(alias = %alias, attempt, "alias taken");
            continue;
        }
        business.alias = alias;
        match state.store.businesses.insert_business(business.clone()).await? {
            Some(created) => return Ok(created),
            None => tracing::debug!(alias = %business.alias, attempt, "alias insert conflict"),
        }
    }

    Err(AppError::Conflict(format!(
        "could not allocate an alias for '{}'",
        business.name
    )))
}

pub async fn create_business(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBusinessRequest,
) -> AppResult<ApiResponse<Business>> {
    let name = validate_name("name", &payload.name)?;

    if state.store.businesses.business_name_exists(&name).await? {
        return Err(AppError::Conflict(format!(
            "a business named '{name}' already exists"
        )));
    }
    if let Some(category_id) = payload.category_id {
        if state.store.categories.find_category(category_id).await?.is_none() {
            return Err(AppError::not_found("Category"));
        }
    }
    if let Some(timezone_id) = payload.timezone_id {
        if state.store.timezones.find_timezone(timezone_id).await?.is_none() {
            return Err(AppError::not_found("Timezone"));
        }
    }

    let timestamp = now();
    let business = insert_with_alias(
        state,
        Business {
            id: Uuid::new_v4(),
            owner_id: user.user_id,
            name,
            alias: String::new(),
            description: payload.description,
            category_id: payload.category_id,
            timezone_id: payload.timezone_id,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        },
    )
    .await?;

    if let Err(err) = state
        .identity
        .assign_role(user.user_id, &state.config.business_role_id)
        .await
    {
        tracing::warn!(
            error = %err,
            user_id = %user.user_id,
            business_id = %business.id,
            "business owner role assignment failed"
        );
    }

    log_audit(
        state,
        Some(user.user_id),
        "business_create",
        Some("businesses"),
        Some(serde_json::json!({ "business_id": business.id, "alias": business.alias })),
    )
    .await;

    Ok(ApiResponse::success(
        "Business created",
        business,
        Some(Meta::empty()),
    ))
}

pub async fn get_business(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Business>> {
    let business = state
        .store
        .businesses
        .find_business(id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))?;
    Ok(ApiResponse::success("Business", business, None))
}

pub async fn list_user_businesses(
    state: &AppState,
    owner_id: Uuid,
) -> AppResult<ApiResponse<BusinessList>> {
    let items = state
        .store
        .businesses
        .find_businesses_by_owner(owner_id)
        .await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Businesses",
        BusinessList { items },
        Some(Meta::total(total)),
    ))
}

pub async fn delete_business(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let business = state
        .store
        .businesses
        .find_business(id)
        .await?
        .ok_or_else(|| AppError::not_found("Business"))?;
    ensure_owner(user, business.owner_id)?;

    if !state.store.businesses.delete_business(id).await? {
        return Err(AppError::not_found("Business"));
    }

    log_audit(
        state,
        Some(user.user_id),
        "business_delete",
        Some("businesses"),
        Some(serde_json::json!({ "business_id": id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Business deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert_eq!(slugify("Joe's Coffee & Tea"), "joe-s-coffee-tea");
        assert_eq!(slugify("  Bakery  "), "bakery");
        assert_eq!(slugify("Café Niño"), "caf-ni-o");
        assert_eq!(slugify("***"), "business");
    }

    #[test]
    fn later_alias_attempts_get_a_suffix() {
        assert_eq!(alias_candidate("shop", 0), "shop");
        let next = alias_candidate("shop", 1);
        assert!(next.starts_with("shop-"));
        assert_eq!(next.len(), "shop-".len() + 6);
    }
}
