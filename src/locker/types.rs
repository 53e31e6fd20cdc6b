use crate::errors::PartialDataWarning;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Synthetic bucket of mythic/exclusive records, always present
pub const EXCLUSIVE_BUCKET: &str = "AthenaExclusive";
/// Synthetic bucket of most-wanted records, always present
pub const POPULAR_BUCKET: &str = "AthenaPopular";
/// Banner bucket, always present
pub const BANNER_BUCKET: &str = "HomebaseBannerIcon";

pub const OUTFITS: &str = "AthenaCharacter";
pub const BACKPACKS: &str = "AthenaBackpack";
pub const PICKAXES: &str = "AthenaPickaxe";
pub const EMOTES: &str = "AthenaDance";
pub const GLIDERS: &str = "AthenaGlider";

/// Buckets that exist in every snapshot, even when empty
pub const SEEDED_BUCKETS: [&str; 8] = [
    OUTFITS,
    BACKPACKS,
    PICKAXES,
    EMOTES,
    GLIDERS,
    EXCLUSIVE_BUCKET,
    POPULAR_BUCKET,
    BANNER_BUCKET,
];

pub const MYTHIC_RARITY: &str = "mythic";

/// One owned cosmetic joined with its catalog entry.
///
/// Rarity is final before the record is shared, so every bucket holding the
/// same `Arc` sees the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CosmeticRecord {
    /// Catalog id as returned by the catalog (original casing)
    pub cosmetic_id: String,
    pub display_name: String,
    pub small_icon_url: Option<String>,
    pub icon_url: Option<String>,
    pub rarity: String,
    /// Native category; kept for lineage in synthetic buckets
    pub category: String,
    pub is_banner: bool,
    pub is_exclusive: bool,
    pub is_popular: bool,
    pub owned_variant_tags: Vec<String>,
}

impl CosmeticRecord {
    /// Lowercased id used for every list and variant lookup
    pub fn lookup_key(&self) -> String {
        self.cosmetic_id.to_lowercase()
    }

    pub fn is_mythic(&self) -> bool {
        self.rarity == MYTHIC_RARITY
    }
}

/// Aggregate of one locker fetch; immutable once built
#[derive(Debug, Clone, Default)]
pub struct LockerSnapshot {
    pub categories: BTreeMap<String, Vec<Arc<CosmeticRecord>>>,
    /// Lowercased cosmetic id → owned variant tags
    pub unlocked_variants: BTreeMap<String, Vec<String>>,
    /// Lowercased banner ids owned by the account
    pub owned_banners: BTreeSet<String>,
    /// Chunks or passes skipped while building; empty when complete
    pub warnings: Vec<PartialDataWarning>,
}

impl LockerSnapshot {
    /// Records of one bucket; unknown buckets are empty
    pub fn bucket(&self, category: &str) -> &[Arc<CosmeticRecord>] {
        self.categories
            .get(category)
            .map(|records| records.as_slice())
            .unwrap_or(&[])
    }

    pub fn count(&self, category: &str) -> usize {
        self.bucket(category).len()
    }

    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}
