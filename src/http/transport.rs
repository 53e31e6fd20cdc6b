//! The `EpicTransport` seam and its reqwest implementation

use super::rate_limiter::RateLimiter;
use super::request::{ApiRequest, ApiResponse, Method, RequestBody};
use crate::errors::{EpicError, EpicResult};
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Sends one request and returns the raw status and body.
///
/// Implementations only fail for transport problems (DNS, TLS, timeout).
/// Non-2xx responses are returned as values so callers can classify them.
#[async_trait]
pub trait EpicTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> EpicResult<ApiResponse>;
}

/// `DeviceAuthGenerator/<os>/<arch>`
pub fn default_user_agent() -> String {
    format!(
        "DeviceAuthGenerator/{}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// One pooled reqwest client shared by every request of a login flow
pub struct HttpTransport {
    client: Client,
    rate_limiter: Option<RateLimiter>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self, String> {
        let user_agent = if user_agent.trim().is_empty() {
            default_user_agent()
        } else {
            user_agent.to_string()
        };

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            USER_AGENT,
            user_agent
                .parse()
                .map_err(|e| format!("Invalid user agent '{}': {}", user_agent, e))?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            rate_limiter: None,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Enables client-side pacing; 0 leaves the transport unlimited
    pub fn with_rate_limit(mut self, max_per_minute: usize) -> Self {
        if max_per_minute > 0 {
            self.rate_limiter = Some(RateLimiter::new(max_per_minute));
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl EpicTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> EpicResult<ApiResponse> {
        let _guard = match &self.rate_limiter {
            Some(limiter) => Some(limiter.acquire().await.map_err(EpicError::Http)?),
            None => None,
        };

        logger::debug(LogTag::Http, &format!("→ {}", request.describe()));

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(auth) = &request.authorization {
            builder = builder.header(AUTHORIZATION, auth.header_value());
        }
        builder = match &request.body {
            RequestBody::None => builder,
            RequestBody::Form(pairs) => builder.form(pairs),
            RequestBody::Json(value) => builder.json(value),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        logger::debug(
            LogTag::Http,
            &format!("← {} {} ({} bytes)", status, request.describe(), body.len()),
        );

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_shape() {
        let agent = default_user_agent();
        assert!(agent.starts_with("DeviceAuthGenerator/"));
        assert_eq!(agent.split('/').count(), 3);
    }

    #[test]
    fn test_blank_user_agent_falls_back() {
        let transport = HttpTransport::new("  ", 5).unwrap();
        assert_eq!(transport.timeout(), Duration::from_secs(5));
    }
}
