use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub application_id: String,
    pub initial_role_id: String,
    pub business_role_id: String,
    pub identity_service_url: String,
    pub notification_service_url: String,
    pub internal_api_key: Option<String>,
    pub alias_max_attempts: u32,
    pub profile_image_max_bytes: usize,
    pub body_limit_bytes: usize,
}

/// The one setting the maintenance binaries need.
pub fn database_url() -> anyhow::Result<String> {
    env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url()?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let application_id = env::var("APPLICATION_ID")?;
        let initial_role_id = env::var("INITIAL_ROLE_ID")?;
        let business_role_id = env::var("BUSINESS_ROLE_ID")?;
        let identity_service_url = env::var("IDENTITY_SERVICE_URL")?;
        let notification_service_url = env::var("NOTIFICATION_SERVICE_URL")?;
        let internal_api_key = env::var("INTERNAL_API_KEY").ok().filter(|k| !k.is_empty());
        let alias_max_attempts = env::var("ALIAS_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5)
            .max(1);
        let profile_image_max_bytes = env::var("PROFILE_IMAGE_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(5 * 1024 * 1024);
        let body_limit_bytes = env::var("BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024)
            // multipart framing needs headroom above the raw image size
            .max(profile_image_max_bytes + 64 * 1024);

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            application_id,
            initial_role_id,
            business_role_id,
            identity_service_url: identity_service_url.trim_end_matches('/').to_string(),
            notification_service_url: notification_service_url.trim_end_matches('/').to_string(),
            internal_api_key,
            alias_max_attempts,
            profile_image_max_bytes,
            body_limit_bytes,
        })
    }
}
