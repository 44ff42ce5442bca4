//! Hyper-based HTTP caller.
//!
//! This module provides [`HyperCaller`], the default [`Caller`], using
//! hyper_util's legacy client.

use std::time::Duration;

use bytes::Bytes;
use futures::FutureExt;
use http::{Method, Request, header};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use rustls::ClientConfig;
use telego_core::{Envelope, Payload};

use super::caller::{BoxFuture, Caller};
use super::connector::{build_https_connector, default_tls_config};
use crate::error::BotError;

/// Type alias for the hyper client with HTTPS connector.
type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// HTTP caller using hyper_util's legacy client.
///
/// Every request is a `POST` carrying the payload as its body. The response
/// body is parsed as an envelope whatever the HTTP status, because the API
/// reports failures as envelopes with non-2xx statuses.
///
/// # Example
///
/// ```ignore
/// use telego_client::transport::HyperCaller;
///
/// let caller = HyperCaller::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HyperCaller {
    client: HyperClient,
    /// Deadline for one round trip.
    timeout: Option<Duration>,
}

impl std::fmt::Debug for HyperCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperCaller")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HyperCaller {
    /// Create a new caller builder.
    pub fn builder() -> HyperCallerBuilder {
        HyperCallerBuilder::new()
    }

    /// Create a caller with default settings.
    pub fn new() -> Result<Self, BotError> {
        Self::builder().build()
    }

    /// Round trip deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn send(&self, url: &str, payload: &Payload) -> Result<Envelope, BotError> {
        let content_type = payload.content_type().header_value().ok_or_else(|| {
            BotError::Encode(format!(
                "invalid content type {:?}",
                payload.content_type().header_string()
            ))
        })?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(header::CONTENT_TYPE, content_type)
            .body(Full::new(payload.body().clone()))
            .map_err(|e| BotError::Transport(format!("failed to build request: {}", e)))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| BotError::Transport(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| BotError::Transport(format!("failed to read response body: {}", e)))?
            .to_bytes();

        Envelope::from_slice(&body).map_err(|e| {
            BotError::Transport(format!("unexpected response (HTTP {}): {}", status, e))
        })
    }
}

impl Caller for HyperCaller {
    fn call<'a>(
        &'a self,
        url: &'a str,
        payload: &'a Payload,
    ) -> BoxFuture<'a, Result<Envelope, BotError>> {
        async move {
            match self.timeout {
                Some(t) => tokio::time::timeout(t, self.send(url, payload))
                    .await
                    .map_err(|_| {
                        BotError::Transport(format!("request timed out after {:?}", t))
                    })?,
                None => self.send(url, payload).await,
            }
        }
        .boxed()
    }
}

/// Builder for [`HyperCaller`].
///
/// # Example
///
/// ```ignore
/// use telego_client::transport::HyperCallerBuilder;
/// use std::time::Duration;
///
/// let caller = HyperCallerBuilder::new()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct HyperCallerBuilder {
    /// Custom TLS configuration.
    tls_config: Option<ClientConfig>,
    /// Deadline for one round trip.
    timeout: Option<Duration>,
}

impl Default for HyperCallerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperCallerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tls_config: None,
            timeout: None,
        }
    }

    /// Set a custom TLS configuration.
    ///
    /// Required when no `tls-*` root certificate feature is enabled.
    pub fn tls_config(mut self, config: ClientConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Fail a round trip that takes longer than `timeout`.
    ///
    /// Default: no deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the caller.
    pub fn build(self) -> Result<HyperCaller, BotError> {
        let tls_config = self
            .tls_config
            .or_else(default_tls_config)
            .ok_or_else(|| {
                BotError::Transport(
                    "no TLS configuration: enable a `tls-*` feature or pass one via `tls_config`"
                        .into(),
                )
            })?;

        let https_connector = build_https_connector(tls_config);

        let client = Client::builder(TokioExecutor::new()).build(https_connector);

        Ok(HyperCaller {
            client,
            timeout: self.timeout,
        })
    }
}

impl std::fmt::Debug for HyperCallerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperCallerBuilder")
            .field("tls_config", &self.tls_config.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}
