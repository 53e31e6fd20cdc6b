//! Login-scoped HTTP session
//!
//! An `EpicSession` is opened before the first request of a login flow and
//! closed after the last one. It owns the transport handle, the two client
//! credentials and the cached client-credentials bearer token.

use super::request::{ApiRequest, ApiResponse};
use super::transport::EpicTransport;
use crate::errors::EpicResult;
use crate::logger::{self, LogTag};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cached service token is refreshed this long before its expiry
const TOKEN_SAFETY_MARGIN_SECS: i64 = 30;

// ============================================================================
// CLIENT CREDENTIALS
// ============================================================================

/// Pre-encoded `basic` client credentials (`base64(client_id:secret)`)
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    encoded: String,
}

impl ClientCredentials {
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self {
            encoded: encoded.into().trim().to_string(),
        }
    }

    pub fn from_client_secret(client_id: &str, secret: &str) -> Self {
        Self {
            encoded: STANDARD.encode(format!("{}:{}", client_id, secret)),
        }
    }

    pub fn token(&self) -> &str {
        &self.encoded
    }

    /// Client id decoded from the credentials, if they are valid base64
    pub fn client_id(&self) -> Option<String> {
        let decoded = STANDARD.decode(&self.encoded).ok()?;
        let text = String::from_utf8(decoded).ok()?;
        text.split_once(':').map(|(id, _)| id.to_string())
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id())
            .finish()
    }
}

// ============================================================================
// BEARER SESSION
// ============================================================================

/// Short-lived client-credentials token; never persisted
#[derive(Clone, PartialEq, Eq)]
pub struct BearerSession {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl BearerSession {
    pub fn new(access_token: String, expires_in_secs: i64) -> Self {
        Self {
            access_token,
            expires_at: Utc::now() + ChronoDuration::seconds(expires_in_secs),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(TOKEN_SAFETY_MARGIN_SECS) < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl std::fmt::Debug for BearerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerSession")
            .field("access_token", &logger::redact(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// EPIC SESSION
// ============================================================================

pub struct EpicSession {
    label: String,
    transport: Arc<dyn EpicTransport>,
    switch_credentials: ClientCredentials,
    ios_credentials: ClientCredentials,
    service_token: Mutex<Option<BearerSession>>,
    requests: AtomicUsize,
    closed: AtomicBool,
}

impl EpicSession {
    pub fn open(
        label: impl Into<String>,
        transport: Arc<dyn EpicTransport>,
        switch_credentials: ClientCredentials,
        ios_credentials: ClientCredentials,
    ) -> Self {
        let label = label.into();
        logger::debug(LogTag::Http, &format!("Session {} opened", label));
        Self {
            label,
            transport,
            switch_credentials,
            ios_credentials,
            service_token: Mutex::new(None),
            requests: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Client used for client_credentials and device_code grants
    pub fn switch_credentials(&self) -> &ClientCredentials {
        &self.switch_credentials
    }

    /// Client used for the final exchange_code grant
    pub fn ios_credentials(&self) -> &ClientCredentials {
        &self.ios_credentials
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub async fn send(&self, request: ApiRequest) -> EpicResult<ApiResponse> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.transport.send(request).await
    }

    /// Cached service token, acquired again when missing or close to expiry
    pub async fn service_token(&self) -> EpicResult<BearerSession> {
        let mut cached = self.service_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_valid() {
                return Ok(token.clone());
            }
            logger::debug(LogTag::Auth, "Service token close to expiry, refreshing");
        }

        let token = crate::epic::auth::get_service_token(self).await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token after the upstream rejected it with 401
    pub async fn invalidate_service_token(&self) {
        *self.service_token.lock().await = None;
    }

    pub fn close(self) {
        self.closed.store(true, Ordering::Relaxed);
        logger::debug(
            LogTag::Http,
            &format!(
                "Session {} closed after {} requests",
                self.label,
                self.request_count()
            ),
        );
    }
}

impl Drop for EpicSession {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::Relaxed) {
            logger::debug(
                LogTag::Http,
                &format!(
                    "Session {} released without close after {} requests",
                    self.label,
                    self.request_count()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::MockTransport;

    #[test]
    fn test_credentials_from_client_secret() {
        let creds = ClientCredentials::from_client_secret("abc", "def");
        assert_eq!(creds.token(), "YWJjOmRlZg==");
        assert_eq!(creds.client_id().as_deref(), Some("abc"));
    }

    #[test]
    fn test_default_switch_credentials_decode() {
        let creds = ClientCredentials::from_encoded(
            "OThmN2U0MmMyZTNhNGY4NmE3NGViNDNmYmI0MWVkMzk6MGEyNDQ5YTItMDAxYS00NTFlLWFmZWMtM2U4MTI5MDFjNGQ3",
        );
        assert_eq!(
            creds.client_id().as_deref(),
            Some("98f7e42c2e3a4f86a74eb43fbb41ed39")
        );
        assert!(!format!("{:?}", creds).contains("0a2449a2"));
    }

    #[test]
    fn test_bearer_validity_margin() {
        let now = Utc::now();
        let token = BearerSession {
            access_token: "t".into(),
            expires_at: now + ChronoDuration::seconds(20),
        };
        assert!(!token.is_valid_at(now));

        let token = BearerSession {
            access_token: "t".into(),
            expires_at: now + ChronoDuration::seconds(120),
        };
        assert!(token.is_valid_at(now));
    }

    #[tokio::test]
    async fn test_service_token_is_cached() {
        let mock = MockTransport::new();
        mock.on_form("grant_type", "client_credentials", |_| {
            ApiResponse::new(200, r#"{"access_token":"svc-1","expires_in":14400}"#)
        });
        let session = mock.session();

        let first = session.service_token().await.unwrap();
        let second = session.service_token().await.unwrap();

        assert_eq!(first.access_token, "svc-1");
        assert_eq!(second.access_token, "svc-1");
        assert_eq!(mock.count_form("grant_type", "client_credentials"), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_token() {
        let mock = MockTransport::new();
        mock.on_form("grant_type", "client_credentials", |_| {
            ApiResponse::new(200, r#"{"access_token":"svc","expires_in":14400}"#)
        });
        let session = mock.session();

        session.service_token().await.unwrap();
        session.invalidate_service_token().await;
        session.service_token().await.unwrap();

        assert_eq!(mock.count_form("grant_type", "client_credentials"), 2);
        assert_eq!(session.request_count(), 2);
        session.close();
    }
}
