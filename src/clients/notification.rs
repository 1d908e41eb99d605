use async_trait::async_trait;

use crate::clients::{
    ClientError, EmailDispatcher, EmailMessage, INTERNAL_API_KEY_HEADER, error::ResponseExt,
};

/// Posts emails to the notification service, which owns the delivery queue.
#[derive(Clone)]
pub struct HttpEmailDispatcher {
    url: String,
    client: reqwest::Client,
}

impl HttpEmailDispatcher {
    pub fn new(url: String, internal_api_key: Option<String>) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(key) = internal_api_key {
            headers.insert(INTERNAL_API_KEY_HEADER, key.parse()?);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl EmailDispatcher for HttpEmailDispatcher {
    #[tracing::instrument(skip(self, email), fields(template = %email.template))]
    async fn dispatch(&self, email: EmailMessage) -> Result<(), ClientError> {
        self.client
            .post(format!("{}/api/v1/emails", self.url))
            .json(&email)
            .send()
            .await
            .map_client_error()
            .await?;
        Ok(())
    }
}
