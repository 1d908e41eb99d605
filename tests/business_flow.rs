mod common;

use common::{BUSINESS_ROLE, auth, test_app, test_app_with, test_config};
use marketplace_directory::{
    dto::{
        businesses::CreateBusinessRequest,
        digital_contacts::CreateDigitalContactRequest,
        favorites::CreateFavoriteRequest,
        products::{CreateProductRequest, LinkProductRequest},
    },
    error::AppError,
    models::{Business, Category},
    repository::{BusinessRepository, CategoryRepository, MemoryRepository, ProductRepository},
    services::{
        business_service, category_service, digital_contact_service, favorite_service,
        product_service,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use marketplace_directory::error::AppResult;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use uuid::Uuid;

fn business(name: &str) -> CreateBusinessRequest {
    CreateBusinessRequest {
        name: name.into(),
        description: None,
        category_id: None,
        timezone_id: None,
    }
}

#[tokio::test]
async fn business_gets_slug_alias_and_owner_role() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let timezone = app.timezone("Asia/Jakarta", true).await;

    let mut payload = business("Corner Bakery & Cafe");
    payload.timezone_id = Some(timezone.id);
    let created = business_service::create_business(&app.state, &owner, payload)
        .await?
        .data
        .unwrap();
    assert_eq!(created.alias, "corner-bakery-cafe");
    assert_eq!(created.owner_id, owner.user_id);
    assert_eq!(created.timezone_id, Some(timezone.id));
    assert!(
        app.identity
            .assigned_roles()
            .contains(&(owner.user_id, BUSINESS_ROLE.to_string()))
    );

    let listed = business_service::list_user_businesses(&app.state, owner.user_id)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items, vec![created]);
    Ok(())
}

#[tokio::test]
async fn business_names_are_unique_ignoring_case() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    business_service::create_business(&app.state, &owner, business("Corner Bakery")).await?;

    let result =
        business_service::create_business(&app.state, &owner, business("CORNER bakery")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn taken_alias_gets_a_suffix_until_attempts_run_out() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    // name differs, alias collides
    app.business(Uuid::new_v4(), "Corner-Bakery").await;

    let created = business_service::create_business(&app.state, &owner, business("Corner Bakery"))
        .await?
        .data
        .unwrap();
    assert!(created.alias.starts_with("corner-bakery-"));
    assert_ne!(created.alias, "corner-bakery");

    let mut config = test_config();
    config.alias_max_attempts = 1;
    let strict = test_app_with(config);
    strict.business(Uuid::new_v4(), "Corner-Bakery").await;
    let result =
        business_service::create_business(&strict.state, &owner, business("Corner Bakery")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn missing_references_are_not_found() {
    let app = test_app();
    let owner = auth(Uuid::new_v4());

    let mut payload = business("Lost");
    payload.category_id = Some(Uuid::new_v4());
    let result = business_service::create_business(&app.state, &owner, payload).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let mut payload = business("Lost");
    payload.timezone_id = Some(Uuid::new_v4());
    let result = business_service::create_business(&app.state, &owner, payload).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn role_assignment_failure_does_not_fail_creation() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    app.identity.fail_with(503, "identity unavailable");

    let created = business_service::create_business(&app.state, &owner, business("Resilient"))
        .await?
        .data
        .unwrap();
    assert!(app.repo.find_business(created.id).await?.is_some());
    assert!(app.identity.assigned_roles().is_empty());
    Ok(())
}

#[tokio::test]
async fn only_owner_deletes_and_dependents_go_with_it() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let fan = auth(Uuid::new_v4());
    let shop = app.business(owner.user_id, "Doomed Shop").await;
    let product = app.product(shop.id, "Cake").await;
    favorite_service::add_favorite(
        &app.state,
        &fan,
        CreateFavoriteRequest {
            kind: "product".into(),
            item_id: product.id,
        },
    )
    .await?;

    let result = business_service::delete_business(&app.state, &fan, shop.id).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
    assert!(app.repo.find_business(shop.id).await?.is_some());

    business_service::delete_business(&app.state, &owner, shop.id).await?;
    assert!(app.repo.find_business(shop.id).await?.is_none());
    assert!(app.repo.find_product(product.id).await?.is_none());
    assert_eq!(app.repo.favorite_count()?, 0);

    let result = business_service::delete_business(&app.state, &owner, shop.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn products_require_owned_business_and_valid_fields() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let shop = app.business(owner.user_id, "Shop").await;

    let payload = |price: i64| CreateProductRequest {
        business_id: shop.id,
        category_id: None,
        name: "Cake".into(),
        description: None,
        price,
    };

    let product = product_service::create_product(&app.state, &owner, payload(2500))
        .await?
        .data
        .unwrap();
    assert_eq!(product.price, 2500);
    assert_eq!(
        product_service::get_product(&app.state, product.id)
            .await?
            .data
            .unwrap(),
        product
    );

    let result = product_service::create_product(&app.state, &owner, payload(-1)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result =
        product_service::create_product(&app.state, &auth(Uuid::new_v4()), payload(10)).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let result = product_service::get_product(&app.state, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn products_link_to_campaigns_of_the_same_business_once() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let shop = app.business(owner.user_id, "Shop").await;
    let other = app.business(owner.user_id, "Other").await;
    let product = app.product(shop.id, "Cake").await;
    let foreign_product = app.product(other.id, "Pie").await;
    let campaign = app
        .campaign(
            shop.id,
            category.id,
            "Cake week",
            "2025-01-01T00:00:00Z",
            "2025-01-08T00:00:00Z",
        )
        .await;

    let link = |product_id| LinkProductRequest {
        product_id,
        campaign_id: campaign.id,
    };

    let created = product_service::link_product(&app.state, &owner, link(product.id))
        .await?
        .data
        .unwrap();
    assert_eq!(created.product_id, product.id);

    let result = product_service::link_product(&app.state, &owner, link(product.id)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let result = product_service::link_product(&app.state, &owner, link(foreign_product.id)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = product_service::link_product(&app.state, &owner, link(Uuid::new_v4())).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let result =
        product_service::link_product(&app.state, &auth(Uuid::new_v4()), link(product.id)).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
    Ok(())
}

#[tokio::test]
async fn one_digital_contact_per_type() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let shop = app.business(owner.user_id, "Shop").await;

    let contact = |kind: &str, value: &str| CreateDigitalContactRequest {
        business_id: shop.id,
        contact_type: kind.into(),
        value: value.into(),
    };

    let created = digital_contact_service::create_digital_contact(
        &app.state,
        &owner,
        contact("Instagram", "https://instagram.com/shop"),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(created.contact_type, "instagram");

    let result = digital_contact_service::create_digital_contact(
        &app.state,
        &owner,
        contact("instagram", "https://instagram.com/shop2"),
    )
    .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let result = digital_contact_service::create_digital_contact(
        &app.state,
        &owner,
        contact("website", "not a url"),
    )
    .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = digital_contact_service::create_digital_contact(
        &app.state,
        &auth(Uuid::new_v4()),
        contact("website", "https://shop.example.com"),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let listed = digital_contact_service::list_business_contacts(&app.state, shop.id)
        .await?
        .data
        .unwrap();
    assert_eq!(listed.items, vec![created.clone()]);
    assert_eq!(
        digital_contact_service::get_digital_contact(&app.state, created.id)
            .await?
            .data
            .unwrap(),
        created
    );
    Ok(())
}

#[tokio::test]
async fn categories_list_active_by_name_and_children_by_parent() -> anyhow::Result<()> {
    let app = test_app();
    let food = app.category("Food").await;
    app.category("Books").await;
    let child = |name: &str, active: bool| Category {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        parent_id: Some(food.id),
        active,
        created_at: Utc::now(),
    };
    app.repo.insert_category(child("Pizza", true)).await?;
    app.repo.insert_category(child("Bakery", false)).await?;

    let listed = category_service::list_categories(&app.state).await?;
    let names: Vec<_> = listed.data.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Books", "Food", "Pizza"]);
    assert_eq!(listed.meta.unwrap().total, Some(3));

    let children = category_service::list_subcategories(&app.state, food.id).await?;
    let names: Vec<_> = children.data.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["Bakery", "Pizza"]);

    let found = category_service::get_category(&app.state, food.id).await?;
    assert_eq!(found.data.unwrap().name, "Food");
    assert!(matches!(
        category_service::get_category(&app.state, Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
    Ok(())
}

/// Misses every name in the pre-check, as when another request inserts the
/// same name between the check and the insert.
struct NameRace {
    inner: Arc<MemoryRepository>,
    inserts: AtomicUsize,
}

#[async_trait]
impl BusinessRepository for NameRace {
    async fn find_business(&self, id: Uuid) -> AppResult<Option<Business>> {
        self.inner.find_business(id).await
    }

    async fn find_businesses_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Business>> {
        self.inner.find_businesses_by_owner(owner_id).await
    }

    async fn business_name_exists(&self, _name: &str) -> AppResult<bool> {
        Ok(false)
    }

    async fn business_alias_exists(&self, alias: &str) -> AppResult<bool> {
        self.inner.business_alias_exists(alias).await
    }

    async fn insert_business(&self, business: Business) -> AppResult<Option<Business>> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_business(business).await
    }

    async fn delete_business(&self, id: Uuid) -> AppResult<bool> {
        self.inner.delete_business(id).await
    }
}

#[tokio::test]
async fn name_conflict_on_insert_is_not_retried_as_alias() -> anyhow::Result<()> {
    let mut app = test_app();
    let owner = auth(Uuid::new_v4());
    app.business(Uuid::new_v4(), "Night Market").await;

    let race = Arc::new(NameRace {
        inner: app.repo.clone(),
        inserts: AtomicUsize::new(0),
    });
    app.state.store.businesses = race.clone();

    let result =
        business_service::create_business(&app.state, &owner, business("night market")).await;
    match result {
        Err(AppError::Conflict(message)) => assert!(message.contains("already exists")),
        other => panic!("expected name conflict, got {other:?}"),
    }
    assert_eq!(race.inserts.load(Ordering::SeqCst), 1);
    Ok(())
}
