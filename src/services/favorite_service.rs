use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::favorites::{
        CreateFavoriteRequest, FavoriteOffer, FavoriteProduct, FavoriteResponse, FavoriteStore,
        FavoritesPage, to_favorite_offer, to_favorite_product, to_favorite_store,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, FavoriteKind, FavoriteTarget},
    response::{ApiResponse, Meta},
    routes::params::{FavoriteQuery, PageWindow},
    services::{
        favorite_aggregation::{Grouped, paginate, parse_filter},
        now,
    },
    state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 10;

type FavoriteGroups = Grouped<FavoriteStore, FavoriteProduct, FavoriteOffer>;

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    query: FavoriteQuery,
) -> AppResult<ApiResponse<FavoritesPage>> {
    let filter = parse_filter(query.kind.as_deref())?;
    let window = PageWindow::new(query.page, query.size, DEFAULT_PAGE_SIZE)?;
    if query.sort.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        return Err(AppError::NotImplemented(
            "sorting favorites is not supported".into(),
        ));
    }

    let favorites = state
        .store
        .favorites
        .find_favorites_by_user(user.user_id)
        .await?;
    let groups = resolve_favorites(state, favorites, filter).await?;

    let total = groups.total(filter) as i64;
    let page = paginate(groups, filter, window);
    let meta = Meta::new(window.page as i64, window.size as i64, total);

    Ok(ApiResponse::success(
        "OK",
        FavoritesPage {
            stores: page.stores,
            products: page.products,
            offers: page.offers,
        },
        Some(meta),
    ))
}

/// Loads the entity behind every favorite in scope. Favorites whose target
/// is gone are skipped.
async fn resolve_favorites(
    state: &AppState,
    favorites: Vec<Favorite>,
    filter: Option<FavoriteKind>,
) -> AppResult<FavoriteGroups> {
    let mut groups = FavoriteGroups::default();

    for favorite in favorites {
        if filter.is_some_and(|kind| kind != favorite.target.kind()) {
            continue;
        }
        let resolved = match favorite.target {
            FavoriteTarget::Store(id) => state
                .store
                .businesses
                .find_business(id)
                .await?
                .map(|store| groups.stores.push(to_favorite_store(&favorite, store))),
            FavoriteTarget::Product(id) => state
                .store
                .products
                .find_product(id)
                .await?
                .map(|product| groups.products.push(to_favorite_product(&favorite, product))),
            FavoriteTarget::Offer(id) => state
                .store
                .campaigns
                .find_campaign(id)
                .await?
                .map(|offer| groups.offers.push(to_favorite_offer(&favorite, offer))),
        };
        if resolved.is_none() {
            tracing::warn!(
                favorite_id = %favorite.id,
                kind = favorite.target.kind().as_str(),
                item_id = %favorite.target.item_id(),
                "favorite points at a missing item, skipping"
            );
        }
    }

    Ok(groups)
}

async fn target_exists(state: &AppState, target: FavoriteTarget) -> AppResult<bool> {
    let exists = match target {
        FavoriteTarget::Store(id) => state.store.businesses.find_business(id).await?.is_some(),
        FavoriteTarget::Product(id) => state.store.products.find_product(id).await?.is_some(),
        FavoriteTarget::Offer(id) => state.store.campaigns.find_campaign(id).await?.is_some(),
    };
    Ok(exists)
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFavoriteRequest,
) -> AppResult<ApiResponse<FavoriteResponse>> {
    let kind = FavoriteKind::parse(&payload.kind).ok_or_else(|| {
        AppError::bad_request(format!(
            "unknown favorite type '{}', expected store, product or offer",
            payload.kind
        ))
    })?;
    let target = FavoriteTarget::new(kind, payload.item_id);

    if !target_exists(state, target).await? {
        return Err(AppError::not_found(match kind {
            FavoriteKind::Store => "Store",
            FavoriteKind::Product => "Product",
            FavoriteKind::Offer => "Offer",
        }));
    }

    if state
        .store
        .favorites
        .find_favorite_by_target(user.user_id, target)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("favorite already exists".into()));
    }

    let timestamp = now();
    let favorite = state
        .store
        .favorites
        .insert_favorite(Favorite {
            id: Uuid::new_v4(),
            user_id: user.user_id,
            target,
            active: true,
            created_at: timestamp,
            updated_at: timestamp,
        })
        .await?;

    log_audit(
        state,
        Some(user.user_id),
        "favorite_add",
        Some("favorites"),
        Some(serde_json::json!({
            "favorite_id": favorite.id,
            "type": kind.as_str(),
            "item_id": payload.item_id,
        })),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to favorites",
        FavoriteResponse::from(favorite),
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    favorite_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let favorite = state
        .store
        .favorites
        .find_favorite(favorite_id)
        .await?
        .ok_or_else(|| AppError::not_found("Favorite"))?;

    if favorite.user_id != user.user_id {
        return Err(AppError::Forbidden);
    }

    if !state.store.favorites.delete_favorite(favorite_id).await? {
        return Err(AppError::not_found("Favorite"));
    }

    log_audit(
        state,
        Some(user.user_id),
        "favorite_remove",
        Some("favorites"),
        Some(serde_json::json!({ "favorite_id": favorite_id })),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from favorites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
