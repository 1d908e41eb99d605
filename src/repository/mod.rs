//! Data-access seams.
//!
//! Services only talk to these traits. [`orm::OrmRepository`] backs them with
//! PostgreSQL through SeaORM; [`memory::MemoryRepository`] keeps everything in
//! process for tests and local experiments.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        AuditEntry, Business, Campaign, CampaignProduct, Category, DigitalContact, Favorite,
        FavoriteTarget, Product, Timezone,
    },
    services::{campaign_filter::CampaignFilter, campaign_sort::CampaignSort},
};

pub mod memory;
pub mod orm;

pub use memory::MemoryRepository;
pub use orm::OrmRepository;

/// A filtered, sorted, zero-based page of campaigns.
#[derive(Debug, Clone)]
pub struct CampaignQuery {
    pub filter: CampaignFilter,
    pub sort: Vec<CampaignSort>,
    pub page: u64,
    pub size: u64,
}

#[async_trait]
pub trait BusinessRepository: Send + Sync {
    async fn find_business(&self, id: Uuid) -> AppResult<Option<Business>>;
    async fn find_businesses_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Business>>;
    /// Case-insensitive name lookup.
    async fn business_name_exists(&self, name: &str) -> AppResult<bool>;
    async fn business_alias_exists(&self, alias: &str) -> AppResult<bool>;
    /// `None` when the alias is already taken. A name collision is a
    /// `Conflict` error.
    async fn insert_business(&self, business: Business) -> AppResult<Option<Business>>;
    /// Removes the business and everything hanging off it. Returns false when
    /// nothing was deleted.
    async fn delete_business(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>>;
    async fn insert_product(&self, product: Product) -> AppResult<Product>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_active_categories(&self) -> AppResult<Vec<Category>>;
    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>>;
    async fn find_categories_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Category>>;
    async fn insert_category(&self, category: Category) -> AppResult<Category>;
}

#[async_trait]
pub trait CampaignRepository: Send + Sync {
    async fn find_campaign(&self, id: Uuid) -> AppResult<Option<Campaign>>;
    /// Returns the requested page and the total number of matches.
    async fn list_campaigns(&self, query: &CampaignQuery) -> AppResult<(Vec<Campaign>, u64)>;
    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign>;
    async fn update_campaign(&self, campaign: Campaign) -> AppResult<Campaign>;
    async fn find_campaign_product(
        &self,
        campaign_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CampaignProduct>>;
    async fn insert_campaign_product(&self, link: CampaignProduct) -> AppResult<CampaignProduct>;
}

#[async_trait]
pub trait DigitalContactRepository: Send + Sync {
    async fn list_digital_contacts(&self) -> AppResult<Vec<DigitalContact>>;
    async fn find_digital_contact(&self, id: Uuid) -> AppResult<Option<DigitalContact>>;
    async fn find_digital_contacts_by_business(
        &self,
        business_id: Uuid,
    ) -> AppResult<Vec<DigitalContact>>;
    async fn find_digital_contact_by_type(
        &self,
        business_id: Uuid,
        contact_type: &str,
    ) -> AppResult<Option<DigitalContact>>;
    async fn insert_digital_contact(&self, contact: DigitalContact) -> AppResult<DigitalContact>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// All favorites of a user, oldest first.
    async fn find_favorites_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>>;
    async fn find_favorite(&self, id: Uuid) -> AppResult<Option<Favorite>>;
    async fn find_favorite_by_target(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> AppResult<Option<Favorite>>;
    /// Fails with a conflict when the (user, target) pair already exists.
    async fn insert_favorite(&self, favorite: Favorite) -> AppResult<Favorite>;
    async fn delete_favorite(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait TimezoneRepository: Send + Sync {
    async fn list_timezones(&self, active_only: bool) -> AppResult<Vec<Timezone>>;
    async fn find_timezone(&self, id: Uuid) -> AppResult<Option<Timezone>>;
    async fn insert_timezone(&self, timezone: Timezone) -> AppResult<Timezone>;
}

#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()>;
}

/// Every repository the services need, behind trait objects.
#[derive(Clone)]
pub struct Store {
    pub businesses: Arc<dyn BusinessRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub campaigns: Arc<dyn CampaignRepository>,
    pub digital_contacts: Arc<dyn DigitalContactRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub timezones: Arc<dyn TimezoneRepository>,
    pub audit: Arc<dyn AuditRepository>,
}

impl Store {
    /// Build a store where one value implements every repository.
    pub fn from_backend<R>(backend: Arc<R>) -> Self
    where
        R: BusinessRepository
            + ProductRepository
            + CategoryRepository
            + CampaignRepository
            + DigitalContactRepository
            + FavoriteRepository
            + TimezoneRepository
            + AuditRepository
            + 'static,
    {
        Self {
            businesses: backend.clone(),
            products: backend.clone(),
            categories: backend.clone(),
            campaigns: backend.clone(),
            digital_contacts: backend.clone(),
            favorites: backend.clone(),
            timezones: backend.clone(),
            audit: backend,
        }
    }
}
