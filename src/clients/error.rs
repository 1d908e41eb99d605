use anyhow::anyhow;
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{Error, Response};

use crate::{clients::ERROR_MESSAGE_HEADER, error::AppError};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("request error: {0}")]
    Generic(#[from] anyhow::Error),
    #[error("network error: {status_code} {message}")]
    NetworkError { status_code: u16, message: String },
}

#[async_trait]
pub trait ResponseExt {
    async fn map_client_error(self) -> Result<Response, ClientError>;
}

#[async_trait]
impl ResponseExt for Response {
    async fn map_client_error(self) -> Result<Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status_code = self.status().as_u16();
        let header_message = self
            .headers()
            .get(ERROR_MESSAGE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let message = match header_message {
            Some(message) => message,
            None => self.text().await.unwrap_or_default(),
        };
        Err(ClientError::NetworkError {
            status_code,
            message,
        })
    }
}

#[async_trait]
impl ResponseExt for Result<Response, Error> {
    async fn map_client_error(self) -> Result<Response, ClientError> {
        match self {
            Ok(response) => response.map_client_error().await,
            Err(e) => Err(ClientError::Generic(anyhow!(e.to_string()))),
        }
    }
}

/// Client-facing status for a downstream failure.
pub fn nearest_status(status_code: u16) -> StatusCode {
    match status_code {
        400 => StatusCode::BAD_REQUEST,
        401 => StatusCode::UNAUTHORIZED,
        403 => StatusCode::FORBIDDEN,
        404 => StatusCode::NOT_FOUND,
        409 => StatusCode::CONFLICT,
        402..=499 => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NetworkError {
                status_code,
                message,
            } => {
                tracing::warn!(status_code, message = %message, "downstream request failed");
                let message = if message.trim().is_empty() {
                    "downstream service error".to_string()
                } else {
                    message
                };
                AppError::Upstream {
                    status: nearest_status(status_code),
                    message,
                }
            }
            ClientError::Generic(err) => AppError::Internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_known_statuses_and_collapses_the_rest() {
        assert_eq!(nearest_status(404), StatusCode::NOT_FOUND);
        assert_eq!(nearest_status(409), StatusCode::CONFLICT);
        assert_eq!(nearest_status(401), StatusCode::UNAUTHORIZED);
        assert_eq!(nearest_status(422), StatusCode::BAD_REQUEST);
        assert_eq!(nearest_status(502), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn network_error_keeps_downstream_message() {
        let err: AppError = ClientError::NetworkError {
            status_code: 404,
            message: "user 42 does not exist".into(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "user 42 does not exist");
    }
}
