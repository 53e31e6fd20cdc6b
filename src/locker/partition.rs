//! Inventory partitioning and variant resolution

use crate::profile::AthenaProfile;
use std::collections::{BTreeMap, BTreeSet};

const COSMETIC_PREFIX: &str = "Athena";

/// Athena templates that track progression, not cosmetics
const NON_COSMETIC_CATEGORIES: [&str; 6] = [
    "AthenaRewardGraph",
    "AthenaRewardEventGraph",
    "AthenaSeason",
    "AthenaChallengeBundle",
    "AthenaChallengeBundleSchedule",
    "AthenaAccolades",
];

/// Owned cosmetic ids grouped by category, plus owned variant tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedInventory {
    /// Category → sorted, deduplicated lowercase cosmetic ids
    pub categories: BTreeMap<String, BTreeSet<String>>,
    /// Lowercase cosmetic id → owned variant tags across all channels
    pub variants: BTreeMap<String, Vec<String>>,
}

impl PartitionedInventory {
    pub fn total_items(&self) -> usize {
        self.categories.values().map(|ids| ids.len()).sum()
    }
}

/// `AthenaCharacter:CID_029_...` → (`AthenaCharacter`, `cid_029_...`)
pub fn split_template_id(template_id: &str) -> Option<(&str, String)> {
    let (category, id) = template_id.split_once(':')?;
    if category.is_empty() || id.is_empty() {
        return None;
    }
    Some((category, id.to_lowercase()))
}

pub fn partition_inventory(profile: &AthenaProfile) -> PartitionedInventory {
    let mut inventory = PartitionedInventory::default();

    for item in profile.profiles().flat_map(|p| p.items.values()) {
        let Some((category, id)) = split_template_id(&item.template_id) else {
            continue;
        };
        if !category.starts_with(COSMETIC_PREFIX) || NON_COSMETIC_CATEGORIES.contains(&category) {
            continue;
        }

        for variant in &item.attributes.variants {
            if variant.owned.is_empty() {
                continue;
            }
            let tags = inventory.variants.entry(id.clone()).or_default();
            for tag in &variant.owned {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }

        inventory
            .categories
            .entry(category.to_string())
            .or_default()
            .insert(id);
    }

    inventory
}
