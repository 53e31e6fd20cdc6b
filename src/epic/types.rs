//! Typed Epic account service documents
//!
//! Every upstream field is optional on the wire; missing fields default so
//! schema drift surfaces as empty values, not parse failures.

use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// OAUTH
// ============================================================================

/// `oauth/token` response for any grant type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub expires_at: String,
    pub refresh_token: String,
    pub account_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl TokenResponse {
    /// Absolute expiry: `expires_at` when parseable, else now + `expires_in`
    pub fn expiry(&self) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now() + ChronoDuration::seconds(self.expires_in))
    }
}

/// Error envelope returned by every Epic service on non-2xx
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EpicErrorBody {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceCodeResponse {
    pub user_code: String,
    pub device_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: String,
    pub expires_in: u64,
    pub interval: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExchangeCodeResponse {
    pub code: String,
    #[serde(rename = "expiresInSeconds")]
    pub expires_in_seconds: i64,
}

/// One login attempt's device code; consumed by exactly one poll loop
#[derive(Clone)]
pub struct DeviceCodeChallenge {
    pub user_code: String,
    pub device_code: String,
    pub verification_url: String,
    pub expires_at: DateTime<Utc>,
    /// Remaining validity when the challenge was issued
    pub expires_in: Duration,
}

impl std::fmt::Debug for DeviceCodeChallenge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceCodeChallenge")
            .field("user_code", &self.user_code)
            .field("device_code", &crate::logger::redact(&self.device_code))
            .field("verification_url", &self.verification_url)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The end user after a completed device-code login
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub account_id: String,
    pub display_name: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn from_token(token: TokenResponse) -> Self {
        let expires_at = token.expiry();
        Self {
            account_id: token.account_id,
            display_name: token.display_name,
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at,
        }
    }
}

impl std::fmt::Debug for AuthenticatedUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedUser")
            .field("account_id", &self.account_id)
            .field("display_name", &self.display_name)
            .field("access_token", &crate::logger::redact(&self.access_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

/// Private account record from the display-name lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountMetadata {
    pub id: String,
    pub display_name: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub email_verified: bool,
    pub tfa_enabled: bool,
    pub country: String,
    pub minor_verified: bool,
    pub headless: bool,
    pub number_of_display_name_changes: u32,
    pub can_update_display_name: bool,
    pub has_hashed_email: bool,
}

/// Linked platform account (PSN, Xbox, Steam, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExternalAuth {
    #[serde(rename = "type")]
    pub auth_type: String,
    pub external_display_name: String,
    pub external_auth_id: String,
    pub date_added: String,
}

impl ExternalAuth {
    pub fn date_added_display(&self) -> String {
        format_epic_date(&self.date_added)
    }
}

/// Raw public account document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PublicAccountDocument {
    pub id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub created: String,
}

/// Public account info; `error` is set instead of failing when the outer
/// lookup was rejected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicAccountInfo {
    /// `dd/mm/yyyy`, or `?` when unknown
    pub creation_date: String,
    pub external_auths: Vec<ExternalAuth>,
    pub error: Option<String>,
}

impl PublicAccountInfo {
    pub fn degraded(error: String) -> Self {
        Self {
            creation_date: "?".to_string(),
            external_auths: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceAuthCreated {
    pub location: String,
    pub ip_address: String,
    pub date_time: String,
}

/// Persistent device credentials created for the account
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceAuth {
    pub device_id: String,
    pub account_id: String,
    pub secret: String,
    pub user_agent: String,
    pub created: DeviceAuthCreated,
}

impl std::fmt::Debug for DeviceAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceAuth")
            .field("device_id", &self.device_id)
            .field("account_id", &self.account_id)
            .field("secret", &crate::logger::redact(&self.secret))
            .field("created", &self.created)
            .finish()
    }
}

/// Epic timestamps (`2019-08-23T17:01:41.622Z`) as `dd/mm/yyyy`; `?` if unparseable
pub fn format_epic_date(raw: &str) -> String {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return parsed.format("%d/%m/%Y").to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%d/%m/%Y").to_string(),
        Err(_) => "?".to_string(),
    }
}
