//! In-process repository used by tests and local experiments.

use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        AuditEntry, Business, Campaign, CampaignProduct, Category, DigitalContact, Favorite,
        FavoriteTarget, Product, Timezone,
    },
    repository::{
        AuditRepository, BusinessRepository, CampaignQuery, CampaignRepository,
        CategoryRepository, DigitalContactRepository, FavoriteRepository, ProductRepository,
        TimezoneRepository,
    },
};

#[derive(Default)]
struct Tables {
    businesses: Vec<Business>,
    products: Vec<Product>,
    categories: Vec<Category>,
    campaigns: Vec<Campaign>,
    campaign_products: Vec<CampaignProduct>,
    digital_contacts: Vec<DigitalContact>,
    favorites: Vec<Favorite>,
    timezones: Vec<Timezone>,
    audit: Vec<AuditEntry>,
}

/// Rows are kept in insertion order, which stands in for query order.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| AppError::Internal(anyhow!("failed to acquire read lock: {e}")))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| AppError::Internal(anyhow!("failed to acquire write lock: {e}")))
    }

    pub fn audit_entries(&self) -> AppResult<Vec<AuditEntry>> {
        Ok(self.read()?.audit.clone())
    }

    pub fn favorite_count(&self) -> AppResult<usize> {
        Ok(self.read()?.favorites.len())
    }
}

#[async_trait]
impl BusinessRepository for MemoryRepository {
    async fn find_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(self.read()?.businesses.iter().find(|b| b.id == id).cloned())
    }

    async fn find_businesses_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Business>> {
        Ok(self
            .read()?
            .businesses
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn business_name_exists(&self, name: &str) -> AppResult<bool> {
        let name = name.to_lowercase();
        Ok(self
            .read()?
            .businesses
            .iter()
            .any(|b| b.name.to_lowercase() == name))
    }

    async fn business_alias_exists(&self, alias: &str) -> AppResult<bool> {
        Ok(self.read()?.businesses.iter().any(|b| b.alias == alias))
    }

    async fn insert_business(&self, business: Business) -> AppResult<Option<Business>> {
        let mut tables = self.write()?;
        let name = business.name.to_lowercase();
        if tables.businesses.iter().any(|b| b.name.to_lowercase() == name) {
            return Err(AppError::Conflict(format!(
                "a business named '{}' already exists",
                business.name
            )));
        }
        if tables.businesses.iter().any(|b| b.alias == business.alias) {
            return Ok(None);
        }
        tables.businesses.push(business.clone());
        Ok(Some(business))
    }

    async fn delete_business(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.write()?;
        let before = tables.businesses.len();
        tables.businesses.retain(|b| b.id != id);
        if tables.businesses.len() == before {
            return Ok(false);
        }

        let product_ids: HashSet<Uuid> = tables
            .products
            .iter()
            .filter(|p| p.business_id == id)
            .map(|p| p.id)
            .collect();
        let campaign_ids: HashSet<Uuid> = tables
            .campaigns
            .iter()
            .filter(|c| c.business_id == id)
            .map(|c| c.id)
            .collect();

        tables.products.retain(|p| p.business_id != id);
        tables.campaigns.retain(|c| c.business_id != id);
        tables.digital_contacts.retain(|c| c.business_id != id);
        tables.campaign_products.retain(|link| {
            !campaign_ids.contains(&link.campaign_id) && !product_ids.contains(&link.product_id)
        });
        tables.favorites.retain(|f| match f.target {
            FavoriteTarget::Store(store_id) => store_id != id,
            FavoriteTarget::Product(product_id) => !product_ids.contains(&product_id),
            FavoriteTarget::Offer(campaign_id) => !campaign_ids.contains(&campaign_id),
        });
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryRepository {
    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.read()?.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: Product) -> AppResult<Product> {
        self.write()?.products.push(product.clone());
        Ok(product)
    }
}

#[async_trait]
impl CategoryRepository for MemoryRepository {
    async fn list_active_categories(&self) -> AppResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .read()?
            .categories
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(self.read()?.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_categories_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .read()?
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn insert_category(&self, category: Category) -> AppResult<Category> {
        self.write()?.categories.push(category.clone());
        Ok(category)
    }
}

#[async_trait]
impl CampaignRepository for MemoryRepository {
    async fn find_campaign(&self, id: Uuid) -> AppResult<Option<Campaign>> {
        Ok(self.read()?.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn list_campaigns(&self, query: &CampaignQuery) -> AppResult<(Vec<Campaign>, u64)> {
        let mut matches: Vec<Campaign> = self
            .read()?
            .campaigns
            .iter()
            .filter(|c| query.filter.matches(c))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            query
                .sort
                .iter()
                .map(|sort| sort.compare(a, b))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.page.saturating_mul(query.size) as usize)
            .take(query.size as usize)
            .collect();
        Ok((items, total))
    }

    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign> {
        self.write()?.campaigns.push(campaign.clone());
        Ok(campaign)
    }

    async fn update_campaign(&self, campaign: Campaign) -> AppResult<Campaign> {
        let mut tables = self.write()?;
        let slot = tables
            .campaigns
            .iter_mut()
            .find(|c| c.id == campaign.id)
            .ok_or_else(|| AppError::not_found("Campaign"))?;
        *slot = campaign.clone();
        Ok(campaign)
    }

    async fn find_campaign_product(
        &self,
        campaign_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CampaignProduct>> {
        Ok(self
            .read()?
            .campaign_products
            .iter()
            .find(|link| link.campaign_id == campaign_id && link.product_id == product_id)
            .cloned())
    }

    async fn insert_campaign_product(&self, link: CampaignProduct) -> AppResult<CampaignProduct> {
        let mut tables = self.write()?;
        if tables
            .campaign_products
            .iter()
            .any(|l| l.campaign_id == link.campaign_id && l.product_id == link.product_id)
        {
            return Err(AppError::Conflict(
                "product is already linked to this campaign".into(),
            ));
        }
        tables.campaign_products.push(link.clone());
        Ok(link)
    }
}

#[async_trait]
impl DigitalContactRepository for MemoryRepository {
    async fn list_digital_contacts(&self) -> AppResult<Vec<DigitalContact>> {
        Ok(self.read()?.digital_contacts.clone())
    }

    async fn find_digital_contact(&self, id: Uuid) -> AppResult<Option<DigitalContact>> {
        Ok(self
            .read()?
            .digital_contacts
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_digital_contacts_by_business(
        &self,
        business_id: Uuid,
    ) -> AppResult<Vec<DigitalContact>> {
        Ok(self
            .read()?
            .digital_contacts
            .iter()
            .filter(|c| c.business_id == business_id)
            .cloned()
            .collect())
    }

    async fn find_digital_contact_by_type(
        &self,
        business_id: Uuid,
        contact_type: &str,
    ) -> AppResult<Option<DigitalContact>> {
        Ok(self
            .read()?
            .digital_contacts
            .iter()
            .find(|c| c.business_id == business_id && c.contact_type == contact_type)
            .cloned())
    }

    async fn insert_digital_contact(&self, contact: DigitalContact) -> AppResult<DigitalContact> {
        self.write()?.digital_contacts.push(contact.clone());
        Ok(contact)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryRepository {
    async fn find_favorites_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        Ok(self
            .read()?
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_favorite(&self, id: Uuid) -> AppResult<Option<Favorite>> {
        Ok(self.read()?.favorites.iter().find(|f| f.id == id).cloned())
    }

    async fn find_favorite_by_target(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> AppResult<Option<Favorite>> {
        Ok(self
            .read()?
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.target == target)
            .cloned())
    }

    async fn insert_favorite(&self, favorite: Favorite) -> AppResult<Favorite> {
        let mut tables = self.write()?;
        if tables
            .favorites
            .iter()
            .any(|f| f.user_id == favorite.user_id && f.target == favorite.target)
        {
            return Err(AppError::Conflict("favorite already exists".into()));
        }
        tables.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete_favorite(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.write()?;
        let before = tables.favorites.len();
        tables.favorites.retain(|f| f.id != id);
        Ok(tables.favorites.len() != before)
    }
}

#[async_trait]
impl TimezoneRepository for MemoryRepository {
    async fn list_timezones(&self, active_only: bool) -> AppResult<Vec<Timezone>> {
        let mut timezones: Vec<Timezone> = self
            .read()?
            .timezones
            .iter()
            .filter(|tz| !active_only || tz.active)
            .cloned()
            .collect();
        timezones.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(timezones)
    }

    async fn find_timezone(&self, id: Uuid) -> AppResult<Option<Timezone>> {
        Ok(self.read()?.timezones.iter().find(|tz| tz.id == id).cloned())
    }

    async fn insert_timezone(&self, timezone: Timezone) -> AppResult<Timezone> {
        self.write()?.timezones.push(timezone.clone());
        Ok(timezone)
    }
}

#[async_trait]
impl AuditRepository for MemoryRepository {
    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()> {
        self.write()?.audit.push(entry);
        Ok(())
    }
}
