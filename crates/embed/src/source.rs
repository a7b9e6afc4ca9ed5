//! Where banner configs come from and where telemetry goes.
//!
//! [`HttpBannerSource`] talks to the banner REST API with [`reqwest`].
//! Tests and alternative hosts substitute their own [`BannerSource`].

use async_trait::async_trait;
use cta_core::banner::BannerConfig;
use cta_core::types::DbId;
use serde::Deserialize;

use crate::config::EmbedConfig;
use crate::error::EmbedError;

/// Fetches banner configs and records telemetry for them.
#[async_trait]
pub trait BannerSource: Send + Sync {
    /// The public config for `id`, or `None` if no active banner exists.
    async fn fetch_embed(&self, id: DbId) -> Result<Option<BannerConfig>, EmbedError>;

    async fn track_view(&self, id: DbId) -> Result<(), EmbedError>;

    async fn track_click(&self, id: DbId) -> Result<(), EmbedError>;
}

/// `{ "data": ... }` response envelope used by the banner API.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for the banner API.
pub struct HttpBannerSource {
    client: reqwest::Client,
    api_url: String,
}

impl HttpBannerSource {
    /// Create a client with the configured base URL and request timeout.
    pub fn from_config(config: &EmbedConfig) -> Result<Self, EmbedError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    /// Create a source reusing an existing [`reqwest::Client`].
    ///
    /// * `api_url` - Base URL including the version prefix, e.g.
    ///   `https://cms.example.com/api/v1`.
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn banner_url(&self, id: DbId, action: &str) -> String {
        format!("{}/cta-banners/{id}/{action}", self.api_url)
    }

    async fn post_event(&self, id: DbId, action: &str) -> Result<(), EmbedError> {
        let response = self.client.post(self.banner_url(id, action)).send().await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise an
    /// [`EmbedError::Api`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, EmbedError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(EmbedError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl BannerSource for HttpBannerSource {
    async fn fetch_embed(&self, id: DbId) -> Result<Option<BannerConfig>, EmbedError> {
        let response = self.client.get(self.banner_url(id, "embed")).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::ensure_success(response).await?;
        let envelope: DataEnvelope<BannerConfig> = response.json().await?;
        Ok(Some(envelope.data))
    }

    async fn track_view(&self, id: DbId) -> Result<(), EmbedError> {
        self.post_event(id, "track-view").await
    }

    async fn track_click(&self, id: DbId) -> Result<(), EmbedError> {
        self.post_event(id, "track-click").await
    }
}
