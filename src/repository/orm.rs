use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use crate::{
    db::{DbPool, OrmConn},
    entity::{
        Businesses, CampaignProducts, Campaigns, Categories, DigitalContacts, Favorites, Products,
        Timezones, businesses, campaign_products, campaigns, categories, digital_contacts,
        favorites, products, timezones,
    },
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
    routes::params::SortOrder,
    services::campaign_sort::CampaignSortField,
};

/// PostgreSQL-backed repositories. SeaORM for entities, the raw sqlx pool for
/// audit inserts.
#[derive(Clone)]
pub struct OrmRepository {
    orm: OrmConn,
    pool: DbPool,
}

impl OrmRepository {
    pub fn new(orm: OrmConn, pool: DbPool) -> Self {
        Self { orm, pool }
    }
}

const BUSINESS_ALIAS_CONSTRAINT: &str = "uq_businesses_alias";

fn conflict_on_unique(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
        _ => AppError::OrmError(err),
    }
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl BusinessRepository for OrmRepository {
    async fn find_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        Ok(Businesses::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(business_from_entity))
    }

    async fn find_businesses_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Business>> {
        Ok(Businesses::find()
            .filter(businesses::Column::OwnerId.eq(owner_id))
            .order_by_asc(businesses::Column::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(business_from_entity)
            .collect())
    }

    async fn business_name_exists(&self, name: &str) -> AppResult<bool> {
        let count = Businesses::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(businesses::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .count(&self.orm)
            .await?;
        Ok(count > 0)
    }

    async fn business_alias_exists(&self, alias: &str) -> AppResult<bool> {
        let count = Businesses::find()
            .filter(businesses::Column::Alias.eq(alias))
            .count(&self.orm)
            .await?;
        Ok(count > 0)
    }

    async fn insert_business(&self, business: Business) -> AppResult<Option<Business>> {
        let active = businesses::ActiveModel {
            id: Set(business.id),
            owner_id: Set(business.owner_id),
            name: Set(business.name),
            alias: Set(business.alias),
            description: Set(business.description),
            category_id: Set(business.category_id),
            timezone_id: Set(business.timezone_id),
            active: Set(business.active),
            created_at: Set(business.created_at.into()),
            updated_at: Set(business.updated_at.into()),
        };
        match active.insert(&self.orm).await {
            Ok(model) => Ok(Some(business_from_entity(model))),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(detail))
                    if detail.contains(BUSINESS_ALIAS_CONSTRAINT) =>
                {
                    Ok(None)
                }
                _ => Err(conflict_on_unique(err, "business name already exists")),
            },
        }
    }

    async fn delete_business(&self, id: Uuid) -> AppResult<bool> {
        // dependents go through ON DELETE CASCADE
        let result = Businesses::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl ProductRepository for OrmRepository {
    async fn find_product(&self, id: Uuid) -> AppResult<Option<Product>> {
        Ok(Products::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(product_from_entity))
    }

    async fn insert_product(&self, product: Product) -> AppResult<Product> {
        let active = products::ActiveModel {
            id: Set(product.id),
            business_id: Set(product.business_id),
            category_id: Set(product.category_id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            active: Set(product.active),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
        };
        Ok(product_from_entity(active.insert(&self.orm).await?))
    }
}

#[async_trait]
impl CategoryRepository for OrmRepository {
    async fn list_active_categories(&self) -> AppResult<Vec<Category>> {
        Ok(Categories::find()
            .filter(categories::Column::Active.eq(true))
            .order_by_asc(categories::Column::Name)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect())
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        Ok(Categories::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(category_from_entity))
    }

    async fn find_categories_by_parent(&self, parent_id: Uuid) -> AppResult<Vec<Category>> {
        Ok(Categories::find()
            .filter(categories::Column::ParentId.eq(parent_id))
            .order_by_asc(categories::Column::Name)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(category_from_entity)
            .collect())
    }

    async fn insert_category(&self, category: Category) -> AppResult<Category> {
        let active = categories::ActiveModel {
            id: Set(category.id),
            name: Set(category.name),
            description: Set(category.description),
            parent_id: Set(category.parent_id),
            active: Set(category.active),
            created_at: Set(category.created_at.into()),
        };
        Ok(category_from_entity(active.insert(&self.orm).await?))
    }
}

fn campaign_column(field: CampaignSortField) -> campaigns::Column {
    match field {
        CampaignSortField::Name => campaigns::Column::Name,
        CampaignSortField::StartDate => campaigns::Column::StartDate,
        CampaignSortField::EndDate => campaigns::Column::EndDate,
        CampaignSortField::CreatedDate => campaigns::Column::CreatedAt,
    }
}

#[async_trait]
impl CampaignRepository for OrmRepository {
    async fn find_campaign(&self, id: Uuid) -> AppResult<Option<Campaign>> {
        Ok(Campaigns::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(campaign_from_entity))
    }

    async fn list_campaigns(&self, query: &CampaignQuery) -> AppResult<(Vec<Campaign>, u64)> {
        let filter = &query.filter;
        let mut condition = Condition::all();

        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", escape_like(name));
            condition = condition.add(
                Expr::col(campaigns::Column::Name).ilike(LikeExpr::new(pattern).escape('\\')),
            );
        }
        if let Some(category_id) = filter.category_id {
            condition = condition.add(campaigns::Column::CategoryId.eq(category_id));
        }
        if let Some(business_id) = filter.business_id {
            condition = condition.add(campaigns::Column::BusinessId.eq(business_id));
        }
        if let Some(active) = filter.active {
            condition = condition.add(campaigns::Column::Active.eq(active));
        }
        if let Some(from) = filter.start_from {
            condition = condition.add(campaigns::Column::StartDate.gte(from));
        }
        if let Some(to) = filter.start_to {
            condition = condition.add(campaigns::Column::StartDate.lte(to));
        }
        if let Some(from) = filter.end_from {
            condition = condition.add(campaigns::Column::EndDate.gte(from));
        }
        if let Some(to) = filter.end_to {
            condition = condition.add(campaigns::Column::EndDate.lte(to));
        }

        let mut finder = Campaigns::find().filter(condition);
        for sort in &query.sort {
            let order = match sort.order {
                SortOrder::Asc => Order::Asc,
                SortOrder::Desc => Order::Desc,
            };
            finder = finder.order_by(campaign_column(sort.field), order);
        }
        finder = finder.order_by_asc(campaigns::Column::Id);

        let total = finder.clone().count(&self.orm).await?;

        let items = finder
            .limit(query.size)
            .offset(query.page.saturating_mul(query.size))
            .all(&self.orm)
            .await?
            .into_iter()
            .map(campaign_from_entity)
            .collect();

        Ok((items, total))
    }

    async fn insert_campaign(&self, campaign: Campaign) -> AppResult<Campaign> {
        let model = campaign_active(campaign).insert(&self.orm).await?;
        Ok(campaign_from_entity(model))
    }

    async fn update_campaign(&self, campaign: Campaign) -> AppResult<Campaign> {
        let model = campaign_active(campaign)
            .update(&self.orm)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => AppError::not_found("Campaign"),
                other => AppError::OrmError(other),
            })?;
        Ok(campaign_from_entity(model))
    }

    async fn find_campaign_product(
        &self,
        campaign_id: Uuid,
        product_id: Uuid,
    ) -> AppResult<Option<CampaignProduct>> {
        Ok(CampaignProducts::find()
            .filter(
                Condition::all()
                    .add(campaign_products::Column::CampaignId.eq(campaign_id))
                    .add(campaign_products::Column::ProductId.eq(product_id)),
            )
            .one(&self.orm)
            .await?
            .map(campaign_product_from_entity))
    }

    async fn insert_campaign_product(&self, link: CampaignProduct) -> AppResult<CampaignProduct> {
        let active = campaign_products::ActiveModel {
            id: Set(link.id),
            campaign_id: Set(link.campaign_id),
            product_id: Set(link.product_id),
            created_at: Set(link.created_at.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_on_unique(e, "product is already linked to this campaign"))?;
        Ok(campaign_product_from_entity(model))
    }
}

#[async_trait]
impl DigitalContactRepository for OrmRepository {
    async fn list_digital_contacts(&self) -> AppResult<Vec<DigitalContact>> {
        Ok(DigitalContacts::find()
            .order_by_asc(digital_contacts::Column::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(digital_contact_from_entity)
            .collect())
    }

    async fn find_digital_contact(&self, id: Uuid) -> AppResult<Option<DigitalContact>> {
        Ok(DigitalContacts::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(digital_contact_from_entity))
    }

    async fn find_digital_contacts_by_business(
        &self,
        business_id: Uuid,
    ) -> AppResult<Vec<DigitalContact>> {
        Ok(DigitalContacts::find()
            .filter(digital_contacts::Column::BusinessId.eq(business_id))
            .order_by_asc(digital_contacts::Column::CreatedAt)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(digital_contact_from_entity)
            .collect())
    }

    async fn find_digital_contact_by_type(
        &self,
        business_id: Uuid,
        contact_type: &str,
    ) -> AppResult<Option<DigitalContact>> {
        Ok(DigitalContacts::find()
            .filter(
                Condition::all()
                    .add(digital_contacts::Column::BusinessId.eq(business_id))
                    .add(digital_contacts::Column::ContactType.eq(contact_type)),
            )
            .one(&self.orm)
            .await?
            .map(digital_contact_from_entity))
    }

    async fn insert_digital_contact(&self, contact: DigitalContact) -> AppResult<DigitalContact> {
        let active = digital_contacts::ActiveModel {
            id: Set(contact.id),
            business_id: Set(contact.business_id),
            contact_type: Set(contact.contact_type),
            value: Set(contact.value),
            active: Set(contact.active),
            created_at: Set(contact.created_at.into()),
            updated_at: Set(contact.updated_at.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_on_unique(e, "contact type already registered for business"))?;
        Ok(digital_contact_from_entity(model))
    }
}

fn favorite_target_condition(target: FavoriteTarget) -> Condition {
    match target {
        FavoriteTarget::Store(id) => Condition::all().add(favorites::Column::BusinessId.eq(id)),
        FavoriteTarget::Product(id) => Condition::all().add(favorites::Column::ProductId.eq(id)),
        FavoriteTarget::Offer(id) => Condition::all().add(favorites::Column::CampaignId.eq(id)),
    }
}

#[async_trait]
impl FavoriteRepository for OrmRepository {
    async fn find_favorites_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_asc(favorites::Column::CreatedAt)
            .order_by_asc(favorites::Column::Id)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(favorite_from_entity)
            .collect()
    }

    async fn find_favorite(&self, id: Uuid) -> AppResult<Option<Favorite>> {
        Favorites::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(favorite_from_entity)
            .transpose()
    }

    async fn find_favorite_by_target(
        &self,
        user_id: Uuid,
        target: FavoriteTarget,
    ) -> AppResult<Option<Favorite>> {
        Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorite_target_condition(target))
            .one(&self.orm)
            .await?
            .map(favorite_from_entity)
            .transpose()
    }

    async fn insert_favorite(&self, favorite: Favorite) -> AppResult<Favorite> {
        let (business_id, product_id, campaign_id) = match favorite.target {
            FavoriteTarget::Store(id) => (Some(id), None, None),
            FavoriteTarget::Product(id) => (None, Some(id), None),
            FavoriteTarget::Offer(id) => (None, None, Some(id)),
        };
        let active = favorites::ActiveModel {
            id: Set(favorite.id),
            user_id: Set(favorite.user_id),
            business_id: Set(business_id),
            product_id: Set(product_id),
            campaign_id: Set(campaign_id),
            active: Set(favorite.active),
            created_at: Set(favorite.created_at.into()),
            updated_at: Set(favorite.updated_at.into()),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_on_unique(e, "favorite already exists"))?;
        favorite_from_entity(model)
    }

    async fn delete_favorite(&self, id: Uuid) -> AppResult<bool> {
        let result = Favorites::delete_by_id(id).exec(&self.orm).await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl TimezoneRepository for OrmRepository {
    async fn list_timezones(&self, active_only: bool) -> AppResult<Vec<Timezone>> {
        let mut finder = Timezones::find();
        if active_only {
            finder = finder.filter(timezones::Column::Active.eq(true));
        }
        Ok(finder
            .order_by_asc(timezones::Column::Name)
            .all(&self.orm)
            .await?
            .into_iter()
            .map(timezone_from_entity)
            .collect())
    }

    async fn find_timezone(&self, id: Uuid) -> AppResult<Option<Timezone>> {
        Ok(Timezones::find_by_id(id)
            .one(&self.orm)
            .await?
            .map(timezone_from_entity))
    }

    async fn insert_timezone(&self, timezone: Timezone) -> AppResult<Timezone> {
        let active = timezones::ActiveModel {
            id: Set(timezone.id),
            name: Set(timezone.name),
            utc_offset: Set(timezone.utc_offset),
            active: Set(timezone.active),
        };
        let model = active
            .insert(&self.orm)
            .await
            .map_err(|e| conflict_on_unique(e, "timezone already exists"))?;
        Ok(timezone_from_entity(model))
    }
}

#[async_trait]
impl AuditRepository for OrmRepository {
    async fn record_audit(&self, entry: AuditEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, resource, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.resource)
        .bind(entry.metadata)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn business_from_entity(model: businesses::Model) -> Business {
    Business {
        id: model.id,
        owner_id: model.owner_id,
        name: model.name,
        alias: model.alias,
        description: model.description,
        category_id: model.category_id,
        timezone_id: model.timezone_id,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn product_from_entity(model: products::Model) -> Product {
    Product {
        id: model.id,
        business_id: model.business_id,
        category_id: model.category_id,
        name: model.name,
        description: model.description,
        price: model.price,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn category_from_entity(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
        parent_id: model.parent_id,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn campaign_active(campaign: Campaign) -> campaigns::ActiveModel {
    campaigns::ActiveModel {
        id: Set(campaign.id),
        name: Set(campaign.name),
        description: Set(campaign.description),
        start_date: Set(campaign.start_date.into()),
        end_date: Set(campaign.end_date.into()),
        category_id: Set(campaign.category_id),
        business_id: Set(campaign.business_id),
        active: Set(campaign.active),
        created_at: Set(campaign.created_at.into()),
        last_update: Set(campaign.last_update.into()),
    }
}

fn campaign_from_entity(model: campaigns::Model) -> Campaign {
    Campaign {
        id: model.id,
        name: model.name,
        description: model.description,
        start_date: model.start_date.with_timezone(&Utc),
        end_date: model.end_date.with_timezone(&Utc),
        category_id: model.category_id,
        business_id: model.business_id,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        last_update: model.last_update.with_timezone(&Utc),
    }
}

fn campaign_product_from_entity(model: campaign_products::Model) -> CampaignProduct {
    CampaignProduct {
        id: model.id,
        campaign_id: model.campaign_id,
        product_id: model.product_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn digital_contact_from_entity(model: digital_contacts::Model) -> DigitalContact {
    DigitalContact {
        id: model.id,
        business_id: model.business_id,
        contact_type: model.contact_type,
        value: model.value,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

fn favorite_from_entity(model: favorites::Model) -> AppResult<Favorite> {
    let target = match (model.business_id, model.product_id, model.campaign_id) {
        (Some(id), None, None) => FavoriteTarget::Store(id),
        (None, Some(id), None) => FavoriteTarget::Product(id),
        (None, None, Some(id)) => FavoriteTarget::Offer(id),
        _ => {
            return Err(AppError::Internal(anyhow!(
                "favorite {} must reference exactly one item",
                model.id
            )));
        }
    };
    Ok(Favorite {
        id: model.id,
        user_id: model.user_id,
        target,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn timezone_from_entity(model: timezones::Model) -> Timezone {
    Timezone {
        id: model.id,
        name: model.name,
        utc_offset: model.utc_offset,
        active: model.active,
    }
}
