use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use marketplace_directory::{
    config::database_url,
    db::{create_orm_conn, create_pool, run_migrations},
    models::{Category, Timezone},
    repository::{CategoryRepository, OrmRepository, TimezoneRepository},
};
use uuid::Uuid;

const CATEGORIES: [(&str, &str); 6] = [
    ("Food & Drink", "Restaurants, cafes and bakeries"),
    ("Fashion", "Clothing, shoes and accessories"),
    ("Electronics", "Phones, computers and gadgets"),
    ("Health & Beauty", "Pharmacies, salons and cosmetics"),
    ("Home & Garden", "Furniture, decor and tools"),
    ("Services", "Repairs, cleaning and professional services"),
];

const TIMEZONES: [(&str, &str); 8] = [
    ("UTC", "+00:00"),
    ("Europe/London", "+00:00"),
    ("Europe/Berlin", "+01:00"),
    ("Asia/Jakarta", "+07:00"),
    ("Asia/Singapore", "+08:00"),
    ("Asia/Tokyo", "+09:00"),
    ("America/New_York", "-05:00"),
    ("America/Los_Angeles", "-08:00"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let pool = create_pool(&database_url()?).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let repo = Arc::new(OrmRepository::new(create_orm_conn(&pool), pool));

    let categories = seed_categories(repo.as_ref()).await?;
    let timezones = seed_timezones(repo.as_ref()).await?;

    println!("Seed completed. Categories added: {categories}, timezones added: {timezones}");
    Ok(())
}

async fn seed_categories(repo: &dyn CategoryRepository) -> anyhow::Result<usize> {
    let existing: HashSet<String> = repo
        .list_active_categories()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let mut added = 0;
    for (name, description) in CATEGORIES {
        if existing.contains(name) {
            continue;
        }
        repo.insert_category(Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: Some(description.to_string()),
            parent_id: None,
            active: true,
            created_at: Utc::now(),
        })
        .await?;
        added += 1;
    }
    Ok(added)
}

async fn seed_timezones(repo: &dyn TimezoneRepository) -> anyhow::Result<usize> {
    let existing: HashSet<String> = repo
        .list_timezones(false)
        .await?
        .into_iter()
        .map(|tz| tz.name)
        .collect();

    let mut added = 0;
    for (name, utc_offset) in TIMEZONES {
        if existing.contains(name) {
            continue;
        }
        repo.insert_timezone(Timezone {
            id: Uuid::new_v4(),
            name: name.to_string(),
            utc_offset: utc_offset.to_string(),
            active: true,
        })
        .await?;
        added += 1;
    }
    Ok(added)
}
