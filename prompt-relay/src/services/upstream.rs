//! Outbound call to the generative-language provider.
//!
//! One POST per prompt, no retries and no streaming.

use super::relay::RelayError;
use crate::config::UpstreamSettings;
use crate::models::GenerateContentRequest;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Sends an envelope upstream and returns the decoded JSON payload.
#[async_trait]
pub trait TextUpstream: Send + Sync {
    async fn generate_content(&self, request: &GenerateContentRequest)
        -> Result<Value, RelayError>;
}

/// `reqwest`-backed upstream built from [`UpstreamSettings`].
pub struct HttpTextUpstream {
    settings: UpstreamSettings,
    client: Client,
}

impl HttpTextUpstream {
    pub fn new(settings: UpstreamSettings) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            settings,
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl TextUpstream for HttpTextUpstream {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<Value, RelayError> {
        let url = self
            .settings
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RelayError::Internal(anyhow!("upstream URL is not configured")))?;

        let mut call = self.client.post(url).json(request);
        if let Some(key) = self.settings.api_key() {
            call = call.query(&[("key", key)]);
        }

        tracing::debug!(upstream = %url, "Sending request to text API");

        let response = call
            .send()
            .await
            .map_err(|e| RelayError::Internal(anyhow!(e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e.without_url(), "Failed to read text API error body");
                String::new()
            });
            return Err(RelayError::Upstream { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| e.without_url())
            .context("upstream returned a non-JSON body")
            .map_err(RelayError::Internal)
    }
}
