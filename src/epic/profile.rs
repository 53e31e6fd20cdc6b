//! MCP `QueryProfile` calls

use super::endpoints;
use super::types::AuthenticatedUser;
use crate::errors::EpicResult;
use crate::http::{ApiRequest, EpicSession};
use crate::logger::{self, LogTag};
use crate::profile::{AthenaProfile, CommonProfile, ProfileId, ProfileResponse};
use serde::de::DeserializeOwned;

/// Fetches one MCP profile; the body is parsed once into the typed document
pub async fn query_profile<A>(
    session: &EpicSession,
    user: &AuthenticatedUser,
    profile_id: ProfileId,
) -> EpicResult<ProfileResponse<A>>
where
    A: DeserializeOwned + Default,
{
    let request = ApiRequest::post(endpoints::query_profile(
        &user.account_id,
        profile_id.as_str(),
    ))
    .bearer(&user.access_token)
    .json(serde_json::json!({}));

    let response = session
        .send(request)
        .await?
        .ensure_success(&format!("QueryProfile {}", profile_id))?;

    let profile: ProfileResponse<A> = response.json(&format!("{} profile", profile_id))?;
    logger::debug(
        LogTag::Profile,
        &format!(
            "{} profile rvn {} with {} change(s)",
            profile_id,
            profile.profile_revision,
            profile.profile_changes.len()
        ),
    );
    Ok(profile)
}

pub async fn get_common_profile(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<CommonProfile> {
    query_profile(session, user, ProfileId::CommonCore).await
}

pub async fn get_athena_profile(
    session: &EpicSession,
    user: &AuthenticatedUser,
) -> EpicResult<AthenaProfile> {
    query_profile(session, user, ProfileId::Athena).await
}
