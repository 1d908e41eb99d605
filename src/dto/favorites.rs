use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Business, Campaign, Favorite, FavoriteKind, Product};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateFavoriteRequest {
    /// `store`, `product` or `offer` (plural forms accepted)
    #[serde(rename = "type")]
    pub kind: String,
    pub item_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FavoriteResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: FavoriteKind,
    pub item_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Favorite> for FavoriteResponse {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            kind: favorite.target.kind(),
            item_id: favorite.target.item_id(),
            active: favorite.active,
            created_at: favorite.created_at,
            updated_at: favorite.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FavoriteStore {
    pub favorite_id: Uuid,
    pub favorited_at: DateTime<Utc>,
    pub store: Business,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FavoriteProduct {
    pub favorite_id: Uuid,
    pub favorited_at: DateTime<Utc>,
    pub product: Product,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct FavoriteOffer {
    pub favorite_id: Uuid,
    pub favorited_at: DateTime<Utc>,
    pub offer: Campaign,
}

pub fn to_favorite_store(favorite: &Favorite, store: Business) -> FavoriteStore {
    FavoriteStore {
        favorite_id: favorite.id,
        favorited_at: favorite.created_at,
        store,
    }
}

pub fn to_favorite_product(favorite: &Favorite, product: Product) -> FavoriteProduct {
    FavoriteProduct {
        favorite_id: favorite.id,
        favorited_at: favorite.created_at,
        product,
    }
}

pub fn to_favorite_offer(favorite: &Favorite, offer: Campaign) -> FavoriteOffer {
    FavoriteOffer {
        favorite_id: favorite.id,
        favorited_at: favorite.created_at,
        offer,
    }
}

/// One page of favorites, grouped by kind.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct FavoritesPage {
    pub stores: Vec<FavoriteStore>,
    pub products: Vec<FavoriteProduct>,
    pub offers: Vec<FavoriteOffer>,
}
