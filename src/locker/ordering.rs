//! Presentation ordering of locker buckets

use super::reference::{RankedList, ReferenceLists};
use super::types::{CosmeticRecord, POPULAR_BUCKET};
use std::sync::Arc;

/// Rarity rank, best first; unknown rarities sort after all of these
pub const RARITY_ORDER: [&str; 16] = [
    "mythic",
    "legendary",
    "dark",
    "slurp",
    "starwars",
    "marvel",
    "lava",
    "frozen",
    "gaminglegends",
    "shadow",
    "icon",
    "dc",
    "epic",
    "rare",
    "uncommon",
    "common",
];

pub fn rarity_rank(rarity: &str) -> usize {
    RARITY_ORDER
        .iter()
        .position(|known| known.eq_ignore_ascii_case(rarity))
        .unwrap_or(RARITY_ORDER.len())
}

fn list_rank(list: &RankedList, record: &CosmeticRecord) -> usize {
    list.position(&record.cosmetic_id).unwrap_or(usize::MAX)
}

/// Orders the exclusive bucket by exclusivity-list position; ids not on the
/// list go last. Stable for equal keys.
pub fn sort_exclusive(records: &mut [Arc<CosmeticRecord>], lists: &ReferenceLists) {
    records.sort_by_key(|record| list_rank(&lists.exclusive, record));
}

/// Rendering order of one bucket.
///
/// Records sort by rarity rank. Mythic records follow exclusivity-list
/// order, and in the popular bucket the remaining records follow the
/// most-wanted list order. Stable for equal keys.
///
/// Not used by the text messages; this is the order the locker image
/// renderer draws tiles in.
pub fn display_order(
    records: &[Arc<CosmeticRecord>],
    category: &str,
    lists: &ReferenceLists,
) -> Vec<Arc<CosmeticRecord>> {
    let popular_bucket = category == POPULAR_BUCKET;
    let mut ordered = records.to_vec();
    ordered.sort_by_key(|record| {
        let secondary = if record.is_mythic() {
            list_rank(&lists.exclusive, record)
        } else if popular_bucket {
            list_rank(&lists.popular, record)
        } else {
            0
        };
        (rarity_rank(&record.rarity), secondary)
    });
    ordered
}
