mod common;

use std::collections::HashMap;

use common::{at, auth, test_app};
use marketplace_directory::{
    dto::campaigns::{CreateCampaignRequest, UpdateCampaignRequest},
    error::AppError,
    response::Meta,
    services::campaign_service,
};
use uuid::Uuid;

fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn owner_creates_campaign_active_by_default() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;

    let payload = |name: &str| CreateCampaignRequest {
        name: name.into(),
        description: Some("Two for one".into()),
        start_date: at("2025-06-01T00:00:00Z"),
        end_date: at("2025-06-30T00:00:00Z"),
        category_id: category.id,
        business_id: business.id,
        active: None,
    };

    let created = campaign_service::create_campaign(&app.state, &owner, payload("  June deal "))
        .await?
        .data
        .unwrap();
    assert_eq!(created.name, "June deal");
    assert!(created.active);
    assert_eq!(created.created_at, created.last_update);

    let stranger = auth(Uuid::new_v4());
    let result = campaign_service::create_campaign(&app.state, &stranger, payload("Nope")).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let mut missing = payload("Ghost");
    missing.category_id = Uuid::new_v4();
    let result = campaign_service::create_campaign(&app.state, &owner, missing).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let mut inverted = payload("Backwards");
    inverted.end_date = at("2025-05-01T00:00:00Z");
    let result = campaign_service::create_campaign(&app.state, &owner, inverted).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn stale_last_update_is_rejected_without_changes() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;
    let campaign = app
        .campaign(
            business.id,
            category.id,
            "Original",
            "2025-01-01T00:00:00Z",
            "2025-02-01T00:00:00Z",
        )
        .await;

    let update = UpdateCampaignRequest {
        name: Some("Renamed".into()),
        last_update: Some(campaign.last_update - chrono::Duration::seconds(5)),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = campaign_service::get_campaign(&app.state, campaign.id)
        .await?
        .data
        .unwrap();
    assert_eq!(stored, campaign);
    Ok(())
}

#[tokio::test]
async fn matching_last_update_applies_partial_update() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;
    let campaign = app
        .campaign(
            business.id,
            category.id,
            "Original",
            "2025-01-01T00:00:00Z",
            "2025-02-01T00:00:00Z",
        )
        .await;

    let update = UpdateCampaignRequest {
        name: Some("Renamed".into()),
        last_update: Some(campaign.last_update),
        ..Default::default()
    };
    let updated = campaign_service::update_campaign(&app.state, &owner, campaign.id, update)
        .await?
        .data
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.start_date, campaign.start_date);
    assert_eq!(updated.end_date, campaign.end_date);
    assert_eq!(updated.business_id, campaign.business_id);
    assert_eq!(updated.category_id, campaign.category_id);
    assert_eq!(updated.description, campaign.description);
    assert!(updated.last_update > campaign.last_update);

    let stored = campaign_service::get_campaign(&app.state, campaign.id)
        .await?
        .data
        .unwrap();
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.last_update, updated.last_update);

    // the token handed back works for the next update
    let update = UpdateCampaignRequest {
        active: Some(false),
        last_update: Some(updated.last_update),
        ..Default::default()
    };
    let again = campaign_service::update_campaign(&app.state, &owner, campaign.id, update)
        .await?
        .data
        .unwrap();
    assert!(!again.active);
    assert!(again.last_update > updated.last_update);
    Ok(())
}

#[tokio::test]
async fn no_op_update_keeps_last_update() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;
    let campaign = app
        .campaign(
            business.id,
            category.id,
            "Same",
            "2025-01-01T00:00:00Z",
            "2025-02-01T00:00:00Z",
        )
        .await;

    let update = UpdateCampaignRequest {
        name: Some("Same".into()),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update)
        .await?
        .data
        .unwrap();
    assert_eq!(result, campaign);
    assert!(app.repo.audit_entries()?.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_checks_ownership_references_and_dates() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;
    let foreign = app.business(Uuid::new_v4(), "Other Shop").await;
    let campaign = app
        .campaign(
            business.id,
            category.id,
            "Original",
            "2025-01-01T00:00:00Z",
            "2025-02-01T00:00:00Z",
        )
        .await;

    let stranger = auth(Uuid::new_v4());
    let result = campaign_service::update_campaign(
        &app.state,
        &stranger,
        campaign.id,
        UpdateCampaignRequest::default(),
    )
    .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    let result = campaign_service::update_campaign(
        &app.state,
        &owner,
        Uuid::new_v4(),
        UpdateCampaignRequest::default(),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let update = UpdateCampaignRequest {
        category_id: Some(Uuid::new_v4()),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let update = UpdateCampaignRequest {
        business_id: Some(foreign.id),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update).await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    // only the end moves, before the stored start
    let update = UpdateCampaignRequest {
        end_date: Some(at("2024-12-01T00:00:00Z")),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let update = UpdateCampaignRequest {
        name: Some("   ".into()),
        ..Default::default()
    };
    let result = campaign_service::update_campaign(&app.state, &owner, campaign.id, update).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

#[tokio::test]
async fn list_filters_sorts_and_pages() -> anyhow::Result<()> {
    let app = test_app();
    let category = app.category("Food").await;
    let other_category = app.category("Fashion").await;
    let business = app.business(Uuid::new_v4(), "Bakery").await;
    app.campaign(
        business.id,
        category.id,
        "Summer Sale",
        "2025-06-01T00:00:00Z",
        "2025-08-31T00:00:00Z",
    )
    .await;
    app.campaign(
        business.id,
        category.id,
        "Spring Sale",
        "2025-03-01T00:00:00Z",
        "2025-05-31T00:00:00Z",
    )
    .await;
    app.campaign(
        business.id,
        other_category.id,
        "Winter Clearance",
        "2025-12-01T00:00:00Z",
        "2026-01-31T00:00:00Z",
    )
    .await;

    let resp = campaign_service::list_campaigns(
        &app.state,
        &params(&[("q", "sale"), ("sort", "start_date")]),
    )
    .await?;
    assert_eq!(resp.meta, Some(Meta::new(0, 20, 2)));
    let names: Vec<_> = resp
        .data
        .unwrap()
        .items
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Spring Sale", "Summer Sale"]);

    let resp = campaign_service::list_campaigns(
        &app.state,
        &params(&[
            ("category_fk", &category.id.to_string()),
            ("start_from", "2025-05-01T00:00:00"),
        ]),
    )
    .await?;
    let items = resp.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Summer Sale");

    let resp = campaign_service::list_campaigns(
        &app.state,
        &params(&[("sort", "-name"), ("page", "1"), ("size", "2")]),
    )
    .await?;
    assert_eq!(resp.meta, Some(Meta::new(1, 2, 3)));
    let items = resp.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Spring Sale");

    for bad in [
        params(&[("sort", "bogus")]),
        params(&[("sort", "name,,end_date")]),
        params(&[("sort", "- name")]),
        params(&[("size", "0")]),
        params(&[("page", "x")]),
        params(&[("active", "maybe")]),
        params(&[("end_from", "2025-02-01T00:00:00Z"), ("end_to", "2025-01-01T00:00:00Z")]),
    ] {
        let result = campaign_service::list_campaigns(&app.state, &bad).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))), "{bad:?}");
    }
    Ok(())
}

#[tokio::test]
async fn back_to_back_updates_always_advance_last_update() -> anyhow::Result<()> {
    let app = test_app();
    let owner = auth(Uuid::new_v4());
    let category = app.category("Food").await;
    let business = app.business(owner.user_id, "Bakery").await;
    let campaign = app
        .campaign(
            business.id,
            category.id,
            "Round 0",
            "2025-01-01T00:00:00Z",
            "2025-02-01T00:00:00Z",
        )
        .await;

    let mut token = campaign.last_update;
    for round in 1..=200 {
        let update = UpdateCampaignRequest {
            name: Some(format!("Round {round}")),
            last_update: Some(token),
            ..Default::default()
        };
        let updated = campaign_service::update_campaign(&app.state, &owner, campaign.id, update)
            .await?
            .data
            .unwrap();
        assert!(updated.last_update > token, "round {round}");
        token = updated.last_update;
    }
    Ok(())
}
