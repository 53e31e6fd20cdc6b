//! Device-Code Authenticator
//!
//! `Idle → ChallengeIssued → Polling → {Authorized | Expired | Denied}`
//!
//! The poll loop is bounded by the challenge's own expiry and checks a
//! cancellation token on every iteration, including while it sleeps.

use super::endpoints;
use super::types::{
    AuthenticatedUser, DeviceCodeChallenge, DeviceCodeResponse, EpicErrorBody,
    ExchangeCodeResponse, TokenResponse,
};
use crate::errors::{EpicError, EpicResult};
use crate::http::request::truncate_body;
use crate::http::{ApiRequest, ApiResponse, BearerSession, EpicSession};
use crate::logger::{self, LogTag};
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Device codes without an `expires_in` get this window
const DEFAULT_DEVICE_CODE_TTL_SECS: u64 = 600;

// ============================================================================
// SERVICE TOKEN
// ============================================================================

/// Exchanges the switch client credentials for a short-lived service token.
///
/// 400/401 mean the client id was revoked upstream; that is an operator
/// problem and is not retried.
pub async fn get_service_token(session: &EpicSession) -> EpicResult<BearerSession> {
    let request = ApiRequest::post(endpoints::OAUTH_TOKEN)
        .basic(session.switch_credentials().token())
        .form(&[("grant_type", endpoints::GRANT_CLIENT_CREDENTIALS)]);

    let response = session.send(request).await?;
    if !response.is_success() {
        logger::error(
            LogTag::Auth,
            &format!(
                "Service token rejected (HTTP {}), switch client credentials may be revoked",
                response.status
            ),
        );
        return Err(EpicError::AuthError {
            operation: endpoints::GRANT_CLIENT_CREDENTIALS,
            status: response.status,
            detail: truncate_body(&response.body),
        });
    }

    let token: TokenResponse = response.json("service token")?;
    if token.access_token.is_empty() {
        return Err(EpicError::parse("service token", "missing access_token"));
    }

    logger::debug(
        LogTag::Auth,
        &format!(
            "Service token acquired {} (expires in {}s)",
            logger::redact(&token.access_token),
            token.expires_in
        ),
    );
    Ok(BearerSession::new(token.access_token, token.expires_in))
}

// ============================================================================
// DEVICE CODE
// ============================================================================

/// Issues a device code. A 401 refreshes the service token and retries once.
pub async fn create_device_code(session: &EpicSession) -> EpicResult<DeviceCodeChallenge> {
    let mut response = request_device_code(session).await?;

    if response.status == 401 {
        logger::warning(LogTag::Auth, "Service token rejected for device code, refreshing");
        session.invalidate_service_token().await;
        response = request_device_code(session).await?;
    }

    if !response.is_success() {
        return Err(EpicError::AuthError {
            operation: "device_authorization",
            status: response.status,
            detail: truncate_body(&response.body),
        });
    }

    let device: DeviceCodeResponse = response.json("device authorization")?;
    if device.device_code.is_empty() || device.user_code.is_empty() {
        return Err(EpicError::parse(
            "device authorization",
            "missing device_code or user_code",
        ));
    }

    let ttl = if device.expires_in > 0 {
        device.expires_in
    } else {
        DEFAULT_DEVICE_CODE_TTL_SECS
    };

    logger::info(
        LogTag::Auth,
        &format!("Device code issued, user code {} valid for {}s", device.user_code, ttl),
    );

    Ok(DeviceCodeChallenge {
        verification_url: endpoints::activation_url(&device.user_code),
        user_code: device.user_code,
        device_code: device.device_code,
        expires_at: Utc::now() + ChronoDuration::seconds(ttl as i64),
        expires_in: Duration::from_secs(ttl),
    })
}

async fn request_device_code(session: &EpicSession) -> EpicResult<ApiResponse> {
    let service = session.service_token().await?;
    let request = ApiRequest::post(endpoints::DEVICE_AUTHORIZATION)
        .bearer(&service.access_token)
        .form(&[]);
    session.send(request).await
}

// ============================================================================
// POLLING
// ============================================================================

/// Classification of one device_code grant attempt
#[derive(Debug, PartialEq)]
pub enum PollOutcome {
    Authorized(String),
    Pending,
    Expired,
    Denied,
}

/// Pure classifier for a device_code token response.
///
/// Only explicit expiry/denial codes are terminal. Every other failure,
/// including unknown codes and unparseable bodies, keeps the loop polling.
pub fn classify_poll_response(response: &ApiResponse) -> PollOutcome {
    if response.is_success() {
        return match serde_json::from_str::<TokenResponse>(&response.body) {
            Ok(token) if !token.access_token.is_empty() => {
                PollOutcome::Authorized(token.access_token)
            }
            _ => PollOutcome::Pending,
        };
    }

    let code = serde_json::from_str::<EpicErrorBody>(&response.body)
        .map(|body| body.error_code.to_lowercase())
        .unwrap_or_default();

    if code.contains("authorization_pending") || code.contains("slow_down") {
        PollOutcome::Pending
    } else if code.contains("expired") || code.contains("not_found") {
        PollOutcome::Expired
    } else if code.contains("declined") || code.contains("denied") {
        PollOutcome::Denied
    } else {
        PollOutcome::Pending
    }
}

/// Polls the device_code grant until the user completes the login, then
/// trades the device token for the final iOS-client user token.
pub async fn poll_until_authorized(
    session: &EpicSession,
    challenge: &DeviceCodeChallenge,
    poll_interval: Duration,
    cancel: &CancellationToken,
) -> EpicResult<AuthenticatedUser> {
    let deadline = Instant::now() + challenge.expires_in;
    let mut attempts: u32 = 0;

    let device_token = loop {
        if cancel.is_cancelled() {
            logger::info(LogTag::Auth, "Device code polling cancelled");
            return Err(EpicError::Cancelled);
        }
        if Instant::now() >= deadline {
            logger::info(
                LogTag::Auth,
                &format!("Device code expired after {} attempts", attempts),
            );
            return Err(EpicError::AuthExpired);
        }

        attempts += 1;
        let request = ApiRequest::post(endpoints::PROD03_OAUTH_TOKEN)
            .basic(session.switch_credentials().token())
            .form(&[
                ("grant_type", endpoints::GRANT_DEVICE_CODE),
                ("device_code", challenge.device_code.as_str()),
            ]);

        let result = tokio::select! {
            _ = cancel.cancelled() => return Err(EpicError::Cancelled),
            result = session.send(request) => result,
        };

        match result {
            Ok(response) => match classify_poll_response(&response) {
                PollOutcome::Authorized(token) => break token,
                PollOutcome::Pending => {
                    logger::verbose(
                        LogTag::Auth,
                        &format!("Attempt {}: still pending (HTTP {})", attempts, response.status),
                    );
                }
                PollOutcome::Expired => return Err(EpicError::AuthExpired),
                PollOutcome::Denied => return Err(EpicError::AuthDenied),
            },
            Err(e) if e.is_recoverable() => {
                logger::warning(
                    LogTag::Auth,
                    &format!("Attempt {} failed, polling continues: {}", attempts, e),
                );
            }
            Err(e) => return Err(e),
        }

        let wait = poll_interval.min(deadline.saturating_duration_since(Instant::now()));
        tokio::select! {
            _ = cancel.cancelled() => return Err(EpicError::Cancelled),
            _ = tokio::time::sleep(wait) => {}
        }
    };

    logger::debug(
        LogTag::Auth,
        &format!("Device code authorized after {} attempts", attempts),
    );

    let exchange_code = create_exchange_code_with(session, &device_token).await?;
    exchange_for_user(session, &exchange_code).await
}

/// `exchange_code` grant with the iOS client; failure here is an auth problem
async fn exchange_for_user(
    session: &EpicSession,
    exchange_code: &str,
) -> EpicResult<AuthenticatedUser> {
    let request = ApiRequest::post(endpoints::PROD03_OAUTH_TOKEN)
        .basic(session.ios_credentials().token())
        .form(&[
            ("grant_type", endpoints::GRANT_EXCHANGE_CODE),
            ("exchange_code", exchange_code),
        ]);

    let response = session.send(request).await?;
    if !response.is_success() {
        logger::error(
            LogTag::Auth,
            &format!(
                "Exchange code grant rejected (HTTP {}), iOS client credentials may be blocked",
                response.status
            ),
        );
        return Err(EpicError::AuthError {
            operation: endpoints::GRANT_EXCHANGE_CODE,
            status: response.status,
            detail: truncate_body(&response.body),
        });
    }

    let token: TokenResponse = response.json("user token")?;
    if token.access_token.is_empty() || token.account_id.is_empty() {
        return Err(EpicError::parse("user token", "missing access_token or account_id"));
    }

    let user = AuthenticatedUser::from_token(token);
    logger::info(
        LogTag::Auth,
        &format!("Authenticated {} ({})", user.display_name, user.account_id),
    );
    Ok(user)
}

// ============================================================================
// EXCHANGE CODE
// ============================================================================

/// One-time exchange code for the given bearer token
pub async fn create_exchange_code_with(
    session: &EpicSession,
    access_token: &str,
) -> EpicResult<String> {
    let response = session
        .send(ApiRequest::get(endpoints::OAUTH_EXCHANGE).bearer(access_token))
        .await?
        .ensure_success("oauth exchange")?;

    let exchange: ExchangeCodeResponse = response.json("exchange code")?;
    if exchange.code.is_empty() {
        return Err(EpicError::parse("exchange code", "missing code"));
    }
    Ok(exchange.code)
}

/// One-time exchange code for an authenticated user
pub async fn create_exchange_code(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<String> {
    create_exchange_code_with(session, &user.access_token).await
}
