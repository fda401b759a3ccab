//! Forwarding of accepted listings to the sniper service.
//!
//! Delivery is best-effort and at-most-once: `dispatch` spawns the call and
//! returns immediately, and a failure is only logged.

use crate::error::ForwardError;
use crate::types::PumpBuyRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

/// Destination for accepted listings.
#[async_trait]
pub trait ListingSink: Send + Sync {
    /// Deliver one listing. Called from a spawned task.
    async fn forward(&self, request: PumpBuyRequest) -> Result<(), ForwardError>;
}

/// Forwards listings to `POST {base}/pump-buy`.
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    http_client: Client,
    base_url: String,
}

impl HttpForwarder {
    /// Create a forwarder with a fresh HTTP client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ForwardError> {
        let base_url = base_url.into();
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ForwardError::Request {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self::with_client(http_client, base_url))
    }

    /// Create a forwarder around an existing client.
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn buy_url(&self) -> String {
        format!("{}/pump-buy", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    /// Ask the sniper service whether it is healthy; the JSON body is
    /// returned untouched.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<serde_json::Value, ForwardError> {
        let url = self.health_url();
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| ForwardError::Request {
                url: url.clone(),
                source,
            })?;

        response
            .json()
            .await
            .map_err(|source| ForwardError::Request { url, source })
    }
}

#[async_trait]
impl ListingSink for HttpForwarder {
    #[instrument(skip(self, request), fields(mint = %request.mint))]
    async fn forward(&self, request: PumpBuyRequest) -> Result<(), ForwardError> {
        let url = self.buy_url();
        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ForwardError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForwardError::Status { url, status });
        }

        debug!("Forwarded {} to {}", request.mint, url);
        Ok(())
    }
}

/// Fire-and-forget delivery of one listing.
///
/// The returned handle may be dropped; it exists so callers that care (tests,
/// graceful shutdown) can wait for the call to settle.
pub fn dispatch(sink: Arc<dyn ListingSink>, request: PumpBuyRequest) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mint = request.mint.clone();
        if let Err(e) = sink.forward(request).await {
            error!("{} {} (mint {})", e.url(), e, mint);
        }
    })
}
