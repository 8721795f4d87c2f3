//! HTTP retrieval with exponential backoff retry logic.
//!
//! - [`FetchPage`]: core trait for async page retrieval
//! - [`HttpClient`]: reqwest-backed implementation with timeout and user agent
//! - [`RetryFetch`]: decorator that adds retries to any `FetchPage`
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```
//!
//! Connection errors, timeouts, `429` and `5xx` answers are retried. Other
//! statuses fail immediately.

use crate::config::CrawlerSettings;
use crate::error::{Result, ScraperError};
use rand::{Rng, rng};
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, instrument};

/// Trait for async page retrieval.
pub trait FetchPage {
    /// Retrieve `url` and return the response body as text.
    ///
    /// Non-2xx responses are errors.
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Plain reqwest client. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(settings: &CrawlerSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpClient {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        debug!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(text)
    }
}

/// Wrapper that adds exponential backoff retries to any [`FetchPage`].
pub struct RetryFetch<T> {
    inner: T,
    /// Retries after the first failure; `0` means a single attempt.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: Duration,
    /// Upper bound for the exponential part of the delay.
    max_delay: Duration,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    /// Create a new retry wrapper around an existing [`FetchPage`] implementation.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying fetcher to wrap
    /// * `max_retries` - Retries after the first failed attempt
    /// * `base_delay` - Initial delay between retries, doubled each time
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = HttpClient::new(&settings)?;
    /// let fetcher = RetryFetch::new(client, 2, Duration::from_millis(500));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    pub fn from_settings(inner: T, settings: &CrawlerSettings) -> Self {
        Self::new(inner, settings.max_retries, settings.retry_base_delay())
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let shift = (attempt - 1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

/// Whether another attempt could plausibly succeed.
fn is_retryable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) => true,
        ScraperError::Status { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

impl<T> FetchPage for RetryFetch<T>
where
    T: FetchPage,
{
    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch_page(url).await {
                Ok(body) => return Ok(body),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries || !is_retryable(&e) {
                        debug!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                            error = %e,
                            "fetch_page giving up"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    debug!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "fetch_page attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_retry(max_retries: usize) -> RetryFetch<HttpClient> {
        let client = HttpClient::new(&CrawlerSettings::default()).unwrap();
        RetryFetch::new(client, max_retries, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_fetch_page_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hi</p>"))
            .mount(&server)
            .await;

        let client = HttpClient::new(&CrawlerSettings::default()).unwrap();
        let body = client
            .fetch_page(&format!("{}/a/1", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(&CrawlerSettings::default()).unwrap();
        let err = client
            .fetch_page(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_retry_recovers_from_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let body = fast_retry(2)
            .fetch_page(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_retry_budget_exhausted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let err = fast_retry(2)
            .fetch_page(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = fast_retry(3)
            .fetch_page(&format!("{}/gone", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_backoff_is_capped() {
        let client = HttpClient::new(&CrawlerSettings::default()).unwrap();
        let retry = RetryFetch::new(client, 40, Duration::from_secs(1));
        let delay = retry.backoff(30);
        assert!(delay <= Duration::from_secs(30) + Duration::from_millis(250));
        assert!(delay >= Duration::from_secs(30));
    }
}
