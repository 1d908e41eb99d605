//! Downstream services this directory depends on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

pub mod error;
pub mod identity;
pub mod notification;
pub mod stub;

pub use error::ClientError;
pub use identity::HttpIdentityClient;
pub use notification::HttpEmailDispatcher;

pub(crate) const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";
pub(crate) const ERROR_MESSAGE_HEADER: &str = "x-error-message";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewIdentityUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub application_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The user/identity backbone. Owns credentials, roles and profile photos.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    async fn get_user(&self, user_id: Uuid) -> Result<User, ClientError>;
    async fn create_user(&self, user: NewIdentityUser) -> Result<User, ClientError>;
    async fn assign_role(&self, user_id: Uuid, role_id: &str) -> Result<(), ClientError>;
    /// Returns the public URL of the stored image.
    async fn upload_profile_image(
        &self,
        user_id: Uuid,
        image: ProfileImage,
    ) -> Result<String, ClientError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub template: String,
    pub variables: serde_json::Value,
}

/// Hands emails to the notification service, which queues them for delivery.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn dispatch(&self, email: EmailMessage) -> Result<(), ClientError>;
}
