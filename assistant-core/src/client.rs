use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;
use thiserror::Error;

use crate::model::{ErrorBody, Recommendation, RecommendationRequest};

pub const ENDPOINT_PATH: &str = "/api/weather-recommendation";

/// Why a submission did not produce a [`Recommendation`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend answered with a non-success status.
    #[error("backend responded with {status}: {}", .message.as_deref().unwrap_or("<no error message>"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    /// No response was received at all.
    #[error("could not reach the backend")]
    Connectivity(#[source] reqwest::Error),

    /// The backend answered 2xx but the body had an unexpected shape.
    #[error("failed to decode backend response")]
    Decode(#[source] serde_json::Error),
}

impl FetchError {
    /// Error text supplied by the server, if it sent any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, FetchError::Connectivity(_))
    }
}

#[async_trait]
pub trait RecommendationBackend: Send + Sync + Debug {
    async fn fetch(&self, request: &RecommendationRequest) -> Result<Recommendation, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), ENDPOINT_PATH),
            http: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RecommendationBackend for HttpBackend {
    async fn fetch(&self, request: &RecommendationRequest) -> Result<Recommendation, FetchError> {
        tracing::debug!(url = %self.url, city = %request.city, "posting recommendation request");

        let res = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(FetchError::Connectivity)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Connectivity)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty());
            tracing::warn!(%status, body = %truncate_body(&body), "backend returned an error");
            return Err(FetchError::Server { status, message });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, body = %truncate_body(&body), "unexpected response body");
            FetchError::Decode(e)
        })
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
