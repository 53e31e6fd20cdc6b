//! Epic Games account services
//!
//! - `endpoints`: fixed service URLs and grant names
//! - `auth`: service token, device code, poll loop, exchange codes
//! - `account`: account metadata, public info, linked accounts, device auths
//! - `profile`: MCP `QueryProfile` calls
//! - `types`: typed upstream documents

pub mod account;
pub mod auth;
pub mod endpoints;
pub mod profile;
pub mod types;

pub use account::{
    create_device_auth, get_account_metadata, get_external_connections, get_public_account_info,
};
pub use auth::{
    classify_poll_response, create_device_code, create_exchange_code, get_service_token,
    poll_until_authorized, PollOutcome,
};
pub use profile::{get_athena_profile, get_common_profile, query_profile};
pub use types::{
    AccountMetadata, AuthenticatedUser, DeviceAuth, DeviceCodeChallenge, ExternalAuth,
    PublicAccountInfo,
};
