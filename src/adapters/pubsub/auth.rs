//! Access tokens for the Pub/Sub REST API
//!
//! A static token from configuration never changes, so it only suits short
//! runs and the emulator. On Cloud Run or GCE the metadata server hands out
//! short-lived tokens for the attached service account; those are cached and
//! fetched again shortly before they expire.

use crate::config::{PublisherConfig, SecretString};
use crate::domain::{PublishError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Refresh this long before the metadata server's expiry
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// Token endpoint of the GCE/Cloud Run metadata server
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Where the bearer token for a publish request comes from
pub enum TokenProvider {
    /// No authorization header (emulator)
    Anonymous,
    /// Fixed token from configuration
    Static(SecretString),
    /// Tokens fetched from the metadata server and cached until near expiry
    Metadata(MetadataTokenSource),
}

/// Cached access token from the metadata server
pub struct MetadataTokenSource {
    client: Client,
    url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataTokenSource {
    /// Source reading tokens from `url`
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Utc::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = fetch_metadata_token(&self.client, &self.url).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }
}

impl TokenProvider {
    /// Pick the provider for `config`; a static token wins over the metadata server
    pub fn from_config(config: &PublisherConfig, client: Client) -> Self {
        if let Some(token) = &config.access_token {
            return Self::Static(token.clone());
        }
        match &config.metadata_token_url {
            Some(url) => Self::Metadata(MetadataTokenSource::new(client, url.as_str())),
            None => Self::Anonymous,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Static(_) => "static",
            Self::Metadata(_) => "metadata",
        }
    }

    /// Bearer token for the next request, if any
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Failed`] if the metadata server can't be reached
    /// or answers with something other than a token.
    pub async fn bearer_token(&self) -> Result<Option<String>> {
        match self {
            Self::Anonymous => Ok(None),
            Self::Static(token) => Ok(Some(token.expose_secret().as_str().to_string())),
            Self::Metadata(source) => source.token().await.map(Some),
        }
    }
}

async fn fetch_metadata_token(client: &Client, url: &str) -> Result<CachedToken> {
    let response = client
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| PublishError::Failed(format!("Failed to request access token: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(PublishError::Failed(format!(
            "Access token request failed with status {status}: {body}"
        ))
        .into());
    }

    let token: MetadataTokenResponse = response
        .json()
        .await
        .map_err(|e| PublishError::Failed(format!("Invalid access token response: {e}")))?;

    let lifetime = (token.expires_in - REFRESH_MARGIN_SECONDS).max(0);
    let expires_at = Utc::now() + chrono::Duration::seconds(lifetime);
    tracing::debug!(expires_at = %expires_at, "Fetched Pub/Sub access token");

    Ok(CachedToken {
        access_token: token.access_token,
        expires_at,
    })
}
