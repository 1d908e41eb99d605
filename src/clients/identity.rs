use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    clients::{
        ClientError, INTERNAL_API_KEY_HEADER, IdentityClient, NewIdentityUser, ProfileImage,
        error::ResponseExt,
    },
    models::User,
};

#[derive(Clone)]
pub struct HttpIdentityClient {
    url: String,
    application_id: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct UploadedImage {
    url: String,
}

impl HttpIdentityClient {
    pub fn new(
        url: String,
        application_id: String,
        internal_api_key: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = internal_api_key {
            headers.insert(INTERNAL_API_KEY_HEADER, key.parse()?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            url,
            application_id,
            client,
        })
    }
}

#[async_trait]
impl IdentityClient for HttpIdentityClient {
    #[tracing::instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<User, ClientError> {
        let res = self
            .client
            .get(format!("{}/api/v1/users/{user_id}", self.url))
            .send()
            .await
            .map_client_error()
            .await?;

        res.json::<User>()
            .await
            .map_err(|e| ClientError::Generic(anyhow!(e)))
    }

    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn create_user(&self, user: NewIdentityUser) -> Result<User, ClientError> {
        let res = self
            .client
            .post(format!("{}/api/v1/users", self.url))
            .json(&user)
            .send()
            .await
            .map_client_error()
            .await?;

        res.json::<User>()
            .await
            .map_err(|e| ClientError::Generic(anyhow!(e)))
    }

    #[tracing::instrument(skip(self))]
    async fn assign_role(&self, user_id: Uuid, role_id: &str) -> Result<(), ClientError> {
        self.client
            .put(format!("{}/api/v1/users/{user_id}/roles", self.url))
            .json(&json!({
                "role_id": role_id,
                "application_id": self.application_id,
            }))
            .send()
            .await
            .map_client_error()
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, image), fields(size = image.bytes.len()))]
    async fn upload_profile_image(
        &self,
        user_id: Uuid,
        image: ProfileImage,
    ) -> Result<String, ClientError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ClientError::Generic(anyhow!(e)))?;
        let form = Form::new().part("file", part);

        let res = self
            .client
            .post(format!("{}/api/v1/users/{user_id}/profile-image", self.url))
            .multipart(form)
            .send()
            .await
            .map_client_error()
            .await?;

        let uploaded = res
            .json::<UploadedImage>()
            .await
            .map_err(|e| ClientError::Generic(anyhow!(e)))?;
        Ok(uploaded.url)
    }
}
