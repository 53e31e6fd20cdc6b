//! Epic Games service URLs. These must stay byte-identical to what the
//! upstream services accept.

pub const OAUTH_TOKEN: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/oauth/token";

pub const PROD03_OAUTH_TOKEN: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/token";

pub const OAUTH_EXCHANGE: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/exchange";

pub const DEVICE_AUTHORIZATION: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/oauth/deviceAuthorization";

const PUBLIC_ACCOUNT_PROD03: &str =
    "https://account-public-service-prod03.ol.epicgames.com/account/api/public/account";

const PUBLIC_ACCOUNT_PROD: &str =
    "https://account-public-service-prod.ol.epicgames.com/account/api/public/account";

const FORTNITE_PROFILE: &str =
    "https://fortnite-public-service-prod11.ol.epicgames.com/fortnite/api/game/v2/profile";

const ACTIVATION: &str = "https://www.epicgames.com/activate";

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const GRANT_DEVICE_CODE: &str = "device_code";
pub const GRANT_EXCHANGE_CODE: &str = "exchange_code";

pub fn account_by_display_name(display_name: &str) -> String {
    format!("{}/displayName/{}", PUBLIC_ACCOUNT_PROD03, display_name)
}

pub fn public_account(account_id: &str) -> String {
    format!("{}/{}", PUBLIC_ACCOUNT_PROD03, account_id)
}

pub fn external_auths(account_id: &str) -> String {
    format!("{}/{}/externalAuths", PUBLIC_ACCOUNT_PROD03, account_id)
}

pub fn device_auth(account_id: &str) -> String {
    format!("{}/{}/deviceAuth", PUBLIC_ACCOUNT_PROD, account_id)
}

pub fn query_profile(account_id: &str, profile_id: &str) -> String {
    format!(
        "{}/{}/client/QueryProfile?profileId={}&rvn=-1",
        FORTNITE_PROFILE, account_id, profile_id
    )
}

pub fn activation_url(user_code: &str) -> String {
    format!("{}?userCode={}", ACTIVATION, user_code)
}
