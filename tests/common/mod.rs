#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use marketplace_directory::{
    clients::stub::{RecordingEmailDispatcher, StubIdentityClient},
    config::AppConfig,
    middleware::auth::{AuthUser, issue_session_token},
    models::{Business, Campaign, Category, Product, Timezone},
    repository::{
        BusinessRepository, CampaignRepository, CategoryRepository, MemoryRepository,
        ProductRepository, Store, TimezoneRepository,
    },
    state::AppState,
};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";
pub const INITIAL_ROLE: &str = "role-customer";
pub const BUSINESS_ROLE: &str = "role-business-owner";

pub struct TestApp {
    pub state: AppState,
    pub repo: Arc<MemoryRepository>,
    pub identity: StubIdentityClient,
    pub mailer: RecordingEmailDispatcher,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: JWT_SECRET.into(),
        application_id: "marketplace".into(),
        initial_role_id: INITIAL_ROLE.into(),
        business_role_id: BUSINESS_ROLE.into(),
        identity_service_url: "http://identity.test".into(),
        notification_service_url: "http://notification.test".into(),
        internal_api_key: None,
        alias_max_attempts: 5,
        profile_image_max_bytes: 1024,
        body_limit_bytes: 1024 * 1024,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(test_config())
}

pub fn test_app_with(config: AppConfig) -> TestApp {
    let repo = Arc::new(MemoryRepository::new());
    let identity = StubIdentityClient::new();
    let mailer = RecordingEmailDispatcher::new();
    let state = AppState {
        config: Arc::new(config),
        store: Store::from_backend(repo.clone()),
        identity: Arc::new(identity.clone()),
        mailer: Arc::new(mailer.clone()),
    };
    TestApp {
        state,
        repo,
        identity,
        mailer,
    }
}

pub fn auth(user_id: Uuid) -> AuthUser {
    AuthUser { user_id }
}

pub fn token(user_id: Uuid) -> String {
    issue_session_token(JWT_SECRET, user_id, Duration::hours(1)).unwrap()
}

pub fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

impl TestApp {
    pub async fn category(&self, name: &str) -> Category {
        self.repo
            .insert_category(Category {
                id: Uuid::new_v4(),
                name: name.into(),
                description: None,
                parent_id: None,
                active: true,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    pub async fn timezone(&self, name: &str, active: bool) -> Timezone {
        self.repo
            .insert_timezone(Timezone {
                id: Uuid::new_v4(),
                name: name.into(),
                utc_offset: "+00:00".into(),
                active,
            })
            .await
            .unwrap()
    }

    pub async fn business(&self, owner_id: Uuid, name: &str) -> Business {
        let now = Utc::now();
        self.repo
            .insert_business(Business {
                id: Uuid::new_v4(),
                owner_id,
                name: name.into(),
                alias: name.to_lowercase().replace(' ', "-"),
                description: None,
                category_id: None,
                timezone_id: None,
                active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
            .expect("fixture alias is free")
    }

    pub async fn product(&self, business_id: Uuid, name: &str) -> Product {
        let now = Utc::now();
        self.repo
            .insert_product(Product {
                id: Uuid::new_v4(),
                business_id,
                category_id: None,
                name: name.into(),
                description: None,
                price: 1500,
                active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    pub async fn campaign(
        &self,
        business_id: Uuid,
        category_id: Uuid,
        name: &str,
        start: &str,
        end: &str,
    ) -> Campaign {
        let now = Utc::now();
        self.repo
            .insert_campaign(Campaign {
                id: Uuid::new_v4(),
                name: name.into(),
                description: None,
                start_date: at(start),
                end_date: at(end),
                category_id,
                business_id,
                active: true,
                created_at: now,
                last_update: now,
            })
            .await
            .unwrap()
    }
}
