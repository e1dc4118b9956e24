use reqwest::{Client, Proxy};
use tracing::debug;

use crate::config::SiteOptions;
use crate::errors::{AppError, AppResult, FetchError, FetchResult};
use crate::utils::retry::{with_retry, RetryConfig};

/// HTTP session owned by a single site adapter
///
/// Carries the site's proxy, user agent and timeout, and retries transient
/// failures according to the configured backoff.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    retry: RetryConfig,
}

impl HttpSession {
    pub fn new(options: &SiteOptions) -> AppResult<Self> {
        let mut builder = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.http.timeout)
            .gzip(true);

        if let Some(proxy) = &options.proxy {
            let proxy = Proxy::all(proxy.as_str()).map_err(|e| {
                AppError::configuration(format!("Invalid proxy for site '{}': {e}", options.site))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            AppError::internal(format!(
                "Failed to create HTTP client for site '{}': {e}",
                options.site
            ))
        })?;

        Ok(Self {
            client,
            retry: RetryConfig::from(&options.http),
        })
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// GET a page and return its body as text
    pub async fn get_text(&self, url: &str) -> FetchResult<String> {
        with_retry(&self.retry, || self.get_text_once(url), url).await
    }

    async fn get_text_once(&self, url: &str) -> FetchResult<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::network(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::network(url, format!("Failed to read response: {e}")))
    }
}
