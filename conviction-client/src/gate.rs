//! HTTP client for the conviction service.
//!
//! The service serves the public configuration at its root and decides,
//! through its allow-list, whether a submitted proposal joins the global
//! state.

use conviction_types::PublicConfig;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ConvictionError, Result};

/// Gate client configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Base URI of the conviction service
    pub service_uri: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GateConfig {
    pub fn new(service_uri: impl Into<String>) -> Self {
        Self {
            service_uri: service_uri.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Outcome of a gate notification that reached the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    /// Service accepted the request
    Accepted,
    /// Service answered with a non-success status, e.g. 401 for accounts
    /// outside the allow-list
    Rejected(u16),
}

impl GateStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// HTTP client for the conviction service
#[derive(Debug, Clone)]
pub struct AccessGate {
    config: GateConfig,
    client: Client,
}

impl AccessGate {
    /// Build the HTTP client for `config.service_uri`.
    ///
    /// Fails with [`ConvictionError::ConfigFetch`] when the URI is not an
    /// absolute HTTP(S) URL or the client cannot be built.
    pub fn new(config: GateConfig) -> Result<Self> {
        let setup_error = |reason: String| ConvictionError::ConfigFetch {
            uri: config.service_uri.clone(),
            reason,
        };

        let base = Url::parse(&config.service_uri).map_err(|e| setup_error(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(setup_error(format!("unsupported scheme {}", base.scheme())));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| setup_error(e.to_string()))?;
        Ok(Self { config, client })
    }

    pub fn service_uri(&self) -> &str {
        &self.config.service_uri
    }

    /// `GET {serviceURI}` → [`PublicConfig`]
    pub async fn fetch_config(&self) -> Result<PublicConfig> {
        let uri = &self.config.service_uri;
        let fetch_error = |reason: String| ConvictionError::ConfigFetch {
            uri: uri.clone(),
            reason,
        };

        let response = self
            .client
            .get(uri)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(fetch_error(format!("HTTP {} - {}", status, body)));
        }

        let config: PublicConfig = response
            .json()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        debug!(did = %config.ceramic.did, chain_id = config.environment.chain_id, "Fetched public config");
        Ok(config)
    }

    /// `GET {serviceURI}/proposals/{address}`
    ///
    /// Only transport failures are errors. The response body is ignored and a
    /// non-success status is reported, not raised.
    pub async fn notify_proposal(&self, address: &str) -> Result<GateStatus> {
        let url = join_url(&self.config.service_uri, &["proposals", address]);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status.is_success() {
            info!(%address, "Gate accepted proposal notification");
            Ok(GateStatus::Accepted)
        } else {
            if status == StatusCode::UNAUTHORIZED {
                warn!(%address, "Address is not on the gate allow-list");
            } else {
                warn!(%address, status = status.as_u16(), "Gate rejected proposal notification");
            }
            Ok(GateStatus::Rejected(status.as_u16()))
        }
    }
}

/// Join path segments onto a base URI with exactly one `/` between parts.
fn join_url(base: &str, segments: &[&str]) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(segment);
    }
    url
}
