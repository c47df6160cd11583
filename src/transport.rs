//! HTTP transport seam.
//!
//! The facade talks to the service through the [`Transport`] trait so
//! tests (and callers with special timeout or proxy needs) can supply
//! their own implementation. [`HttpTransport`] is the reqwest-backed
//! default.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::errors::ExchangeError;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A blocking-free GET against a fully resolved URL, returning the raw
/// response body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a GET request and return the body text.
    async fn get(&self, url: &Url) -> Result<String, ExchangeError>;
}

/// Reqwest-backed transport with a 30-second request timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the default timeout.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// Create a transport around an existing client, keeping whatever
    /// timeout and middleware the caller configured.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, ExchangeError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Http { status });
        }

        Ok(response.text().await?)
    }
}
