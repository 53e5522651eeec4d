use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use super::FetchError;
use crate::constants::EXPORTER_USER_AGENT;

/// Blocking-style GET capability the fetcher is written against.
///
/// Callers await each request before issuing the next, so implementations
/// never see concurrent calls from the fetcher.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with `query` appended, returning the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Remote`] for non-success statuses and
    /// [`FetchError::Transport`] for network failures and timeouts.
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(EXPORTER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<String, FetchError> {
        trace!(url = %url, params = query.len(), "GET");

        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
