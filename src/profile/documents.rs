//! Typed MCP profile documents (`QueryProfile` responses)
//!
//! One parser per document shape. Every level defaults, so a missing
//! `stats`, `attributes` or `items` key parses to empty values and upstream
//! schema drift stays contained here.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which MCP profile to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileId {
    /// Currency, purchases, gifts, banners
    CommonCore,
    /// Cosmetic ownership and season stats
    Athena,
}

impl ProfileId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::CommonCore => "common_core",
            ProfileId::Athena => "athena",
        }
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct ProfileResponse<A> {
    pub profile_revision: i64,
    pub profile_id: String,
    pub profile_changes: Vec<ProfileChange<A>>,
}

impl<A> ProfileResponse<A> {
    pub fn profiles(&self) -> impl Iterator<Item = &Profile<A>> {
        self.profile_changes.iter().map(|change| &change.profile)
    }

    /// Profile of the first change (a full profile update on `rvn=-1`)
    pub fn first_profile(&self) -> Option<&Profile<A>> {
        self.profile_changes.first().map(|change| &change.profile)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct ProfileChange<A> {
    pub change_type: String,
    pub profile: Profile<A>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct Profile<A> {
    pub rvn: i64,
    pub items: HashMap<String, ProfileItem>,
    pub stats: ProfileStats<A>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(bound(deserialize = "A: Deserialize<'de> + Default"))]
pub struct ProfileStats<A> {
    pub attributes: A,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileItem {
    #[serde(rename = "templateId")]
    pub template_id: String,
    pub attributes: ItemAttributes,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemAttributes {
    pub variants: Vec<ItemVariant>,
    pub favorite: bool,
}

/// One style channel of a cosmetic and the tags the account owns in it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemVariant {
    pub channel: String,
    pub active: String,
    pub owned: Vec<String>,
}

// ============================================================================
// COMMON CORE
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommonAttributes {
    pub mtx_purchase_history: MtxPurchaseHistory,
    pub in_app_purchases: InAppPurchases,
    pub gift_history: GiftHistory,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MtxPurchaseHistory {
    pub refunds_used: u64,
    pub refund_credits: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InAppPurchases {
    pub receipts: Vec<serde_json::Value>,
    pub fulfillment_counts: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GiftHistory {
    pub num_sent: u64,
    pub num_received: u64,
    pub gifts: Vec<serde_json::Value>,
}

// ============================================================================
// ATHENA
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AthenaAttributes {
    pub past_seasons: Vec<PastSeason>,
    pub season_num: u32,
    pub level: u32,
    pub book_purchased: bool,
    pub book_level: u32,
    #[serde(rename = "accountLevel")]
    pub account_level: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PastSeason {
    pub season_number: u32,
    pub num_wins: u64,
    pub num_high_bracket: u64,
    pub num_low_bracket: u64,
    pub num_royal_royales: u64,
    pub season_xp: u64,
    pub season_level: u32,
    pub book_xp: u64,
    pub book_level: u32,
    #[serde(rename = "purchasedVIP")]
    pub purchased_vip: bool,
}

pub type CommonProfile = ProfileResponse<CommonAttributes>;
pub type AthenaProfile = ProfileResponse<AthenaAttributes>;
