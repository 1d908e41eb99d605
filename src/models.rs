use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Business {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub alias: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub timezone_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub business_id: Uuid,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A marketing campaign, shown to end users as an "offer".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category_id: Uuid,
    pub business_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    /// Optimistic-lock token: clients echo it back on update.
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CampaignProduct {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DigitalContact {
    pub id: Uuid,
    pub business_id: Uuid,
    pub contact_type: String,
    pub value: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Timezone {
    pub id: Uuid,
    pub name: String,
    pub utc_offset: String,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKind {
    Store,
    Product,
    Offer,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Store => "store",
            FavoriteKind::Product => "product",
            FavoriteKind::Offer => "offer",
        }
    }

    /// Tag on favorite creation. Accepts the singular and plural forms,
    /// case-insensitively.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "store" | "stores" => Some(FavoriteKind::Store),
            "product" | "products" => Some(FavoriteKind::Product),
            "offer" | "offers" => Some(FavoriteKind::Offer),
            _ => None,
        }
    }
}

/// What a favorite points at. Exactly one target per favorite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteTarget {
    Store(Uuid),
    Product(Uuid),
    Offer(Uuid),
}

impl FavoriteTarget {
    pub fn new(kind: FavoriteKind, item_id: Uuid) -> Self {
        match kind {
            FavoriteKind::Store => FavoriteTarget::Store(item_id),
            FavoriteKind::Product => FavoriteTarget::Product(item_id),
            FavoriteKind::Offer => FavoriteTarget::Offer(item_id),
        }
    }

    pub fn kind(&self) -> FavoriteKind {
        match self {
            FavoriteTarget::Store(_) => FavoriteKind::Store,
            FavoriteTarget::Product(_) => FavoriteKind::Product,
            FavoriteTarget::Offer(_) => FavoriteKind::Offer,
        }
    }

    pub fn item_id(&self) -> Uuid {
        match self {
            FavoriteTarget::Store(id) | FavoriteTarget::Product(id) | FavoriteTarget::Offer(id) => {
                *id
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub target: FavoriteTarget,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
