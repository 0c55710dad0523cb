use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};
use yotei_domain::YoteiError;

use crate::errors::InfraError;

/// HTTP client shared by the model adapters.
///
/// Retries server errors, rate limiting and transport failures with
/// exponential backoff. A `Retry-After` on a 429 or 503 replaces the backoff,
/// capped at `max_retry_after`. Client errors are returned to the caller
/// untouched.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
    max_retry_after: Duration,
}

impl HttpClient {
    /// Builder with default timeout, attempts and backoff.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout, retry count and backoff.
    pub fn new() -> Result<Self, YoteiError> {
        Self::builder().build()
    }

    /// Start a request on the shared connection pool.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute `builder`, retrying retryable failures.
    ///
    /// The request body must be buffered so the builder can be cloned per
    /// attempt.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, YoteiError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    YoteiError::Internal("request body must be buffered to allow retries".into())
                })?
                .build()
                .map_err(|err| YoteiError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            let last_attempt = attempt == attempts;
            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if should_retry_status(status) && !last_attempt {
                        let delay = self.retry_delay(attempt, status, response.headers());
                        debug!(attempt, %status, delay_ms = delay.as_millis() as u64, "retrying HTTP request");
                        sleep_for(delay).await;
                        continue;
                    }
                    return Ok(response);
                }
                Err(err) => {
                    if should_retry_error(&err) && !last_attempt {
                        debug!(attempt, %method, %url, error = %err, "HTTP request failed, retrying");
                        sleep_for(self.backoff_delay(attempt)).await;
                        continue;
                    }

                    warn!(attempt, %method, %url, error = %err, "HTTP request failed");
                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(YoteiError::Internal("http client exhausted retries without a response".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }

    /// Server-requested wait for throttling statuses, else the backoff.
    fn retry_delay(&self, retry_number: usize, status: StatusCode, headers: &HeaderMap) -> Duration {
        let throttled =
            status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE;
        match retry_after(headers) {
            Some(requested) if throttled => requested.min(self.max_retry_after),
            _ => self.backoff_delay(retry_number),
        }
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

async fn sleep_for(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    max_retry_after: Duration,
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            max_retry_after: Duration::from_secs(10),
            user_agent: Some(concat!("yotei/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Delay before the first retry; doubles after each attempt.
    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Longest `Retry-After` the client will wait before retrying.
    pub fn max_retry_after(mut self, cap: Duration) -> Self {
        self.max_retry_after = cap;
        self
    }

    /// `User-Agent` header value.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// # Errors
    /// Returns an error when the underlying reqwest client cannot be built.
    pub fn build(self) -> Result<HttpClient, YoteiError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| YoteiError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts,
            base_backoff: self.base_backoff,
            max_retry_after: self.max_retry_after,
        })
    }
}

fn should_retry_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_request() {
        return true;
    }
    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return true;
    }
    false
}
