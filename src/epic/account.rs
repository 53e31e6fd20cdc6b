//! Account Metadata Fetcher

use super::endpoints;
use super::types::{
    format_epic_date, AccountMetadata, AuthenticatedUser, DeviceAuth, ExternalAuth,
    PublicAccountDocument, PublicAccountInfo,
};
use crate::errors::{EpicError, EpicResult};
use crate::http::{ApiRequest, EpicSession};
use crate::logger::{self, LogTag};

/// Private account record looked up by display name.
///
/// Any non-2xx, or a 2xx without an id, means the account is banned,
/// deleted or has never launched the game.
pub async fn get_account_metadata(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<AccountMetadata> {
    let request = ApiRequest::get(endpoints::account_by_display_name(&user.display_name))
        .bearer(&user.access_token);
    let response = session.send(request).await?;

    if !response.is_success() {
        logger::warning(
            LogTag::Account,
            &format!(
                "Account lookup for {} failed (HTTP {})",
                user.display_name, response.status
            ),
        );
        return Err(EpicError::AccountNotFound {
            lookup: user.display_name.clone(),
        });
    }

    let metadata: AccountMetadata = response.json("account metadata")?;
    if metadata.id.is_empty() {
        return Err(EpicError::AccountNotFound {
            lookup: user.display_name.clone(),
        });
    }

    logger::debug(
        LogTag::Account,
        &format!("Account metadata loaded for {}", metadata.id),
    );
    Ok(metadata)
}

/// Public account info with linked accounts.
///
/// A rejected outer lookup yields a degraded record instead of an error so
/// the rest of the login report can still be built.
pub async fn get_public_account_info(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<PublicAccountInfo> {
    let request =
        ApiRequest::get(endpoints::public_account(&user.account_id)).bearer(&user.access_token);
    let response = session.send(request).await?;

    if !response.is_success() {
        logger::warning(
            LogTag::Account,
            &format!("Public account info unavailable (HTTP {})", response.status),
        );
        return Ok(PublicAccountInfo::degraded(format!(
            "Error fetching account info ({})",
            response.status
        )));
    }

    let document: PublicAccountDocument = response.json("public account info")?;
    let creation_date = if document.created.is_empty() {
        "?".to_string()
    } else {
        format_epic_date(&document.created)
    };

    Ok(PublicAccountInfo {
        creation_date,
        external_auths: get_external_connections(session, user).await?,
        error: None,
    })
}

/// Linked platform accounts. "None linked" and "endpoint denied" look the
/// same upstream; both come back as an empty list.
pub async fn get_external_connections(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<Vec<ExternalAuth>> {
    let request =
        ApiRequest::get(endpoints::external_auths(&user.account_id)).bearer(&user.access_token);
    let response = session.send(request).await?;

    if !response.is_success() {
        logger::debug(
            LogTag::Account,
            &format!(
                "External auths unavailable (HTTP {}), treating as none",
                response.status
            ),
        );
        return Ok(Vec::new());
    }

    response.json("external auths")
}

/// Creates persistent device credentials for the account.
///
/// The login flow never calls this; callers that want to re-authenticate
/// later without a new device code use it with a fresh `AuthenticatedUser`.
pub async fn create_device_auth(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<DeviceAuth> {
    let request = ApiRequest::post(endpoints::device_auth(&user.account_id))
        .bearer(&user.access_token)
        .json(serde_json::json!({}));

    let device_auth: DeviceAuth = session
        .send(request)
        .await?
        .ensure_success("deviceAuth")?
        .json("device auth")?;

    logger::info(
        LogTag::Account,
        &format!("Device auth {} created", device_auth.device_id),
    );
    Ok(device_auth)
}
