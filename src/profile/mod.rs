//! MCP profile documents and the pure parsers built on them
//!
//! - `documents`: typed `QueryProfile` response shapes
//! - `common`: purchase summary and owned banners from `common_core`
//! - `seasons`: season history from `athena`

pub mod common;
pub mod documents;
pub mod seasons;

pub use common::{owned_banner_ids, parse_common_profile, PurchaseSummary, BANNER_CATEGORY};
pub use documents::{
    AthenaAttributes, AthenaProfile, CommonAttributes, CommonProfile, ItemVariant, Profile,
    ProfileId, ProfileItem, ProfileResponse,
};
pub use seasons::{summarize_seasons, CurrentSeason, SeasonRecord, SeasonSummary};
