//! Locker Aggregator
//!
//! Turns the athena profile into a `LockerSnapshot`:
//! 1. Partition owned `Athena*` template ids by category, collect owned variants
//! 2. Resolve every category against the catalog in fixed-size chunks
//! 3. Reclassify listed cosmetics as mythic when the account owns the right style
//! 4. Tag most-wanted cosmetics into the popular bucket
//! 5. Merge owned banners from the banner catalog
//! 6. Order the exclusive bucket by the exclusivity list
//!
//! A failing chunk or banner pass is recorded as a `PartialDataWarning` and
//! skipped. Aggregation itself never fails.

pub mod exclusivity;
pub mod ordering;
pub mod partition;
pub mod reference;
pub mod types;

pub use exclusivity::{is_exclusive_override, MYTHIC_VARIANT_RULES};
pub use ordering::{display_order, rarity_rank, sort_exclusive};
pub use partition::{partition_inventory, PartitionedInventory};
pub use reference::{RankedList, ReferenceLists};
pub use types::{
    CosmeticRecord, LockerSnapshot, BACKPACKS, BANNER_BUCKET, EMOTES, EXCLUSIVE_BUCKET, GLIDERS,
    OUTFITS, PICKAXES, POPULAR_BUCKET,
};

use crate::catalog::{CatalogBanner, CatalogClient, CatalogCosmetic};
use crate::errors::PartialDataWarning;
use crate::logger::{self, LogTag};
use crate::profile::AthenaProfile;
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use types::{MYTHIC_RARITY, SEEDED_BUCKETS};

const BANNER_RARITY: &str = "common";

pub struct LockerAggregator<'a> {
    catalog: &'a CatalogClient,
    lists: &'a ReferenceLists,
}

impl<'a> LockerAggregator<'a> {
    pub fn new(catalog: &'a CatalogClient, lists: &'a ReferenceLists) -> Self {
        Self { catalog, lists }
    }

    pub async fn build_snapshot(
        &self,
        athena: &AthenaProfile,
        owned_banners: &BTreeSet<String>,
    ) -> LockerSnapshot {
        let inventory = partition_inventory(athena);
        logger::info(
            LogTag::Locker,
            &format!(
                "Resolving {} cosmetics in {} categories",
                inventory.total_items(),
                inventory.categories.len()
            ),
        );

        let mut snapshot = LockerSnapshot {
            owned_banners: owned_banners.clone(),
            ..LockerSnapshot::default()
        };
        for bucket in SEEDED_BUCKETS {
            snapshot.categories.insert(bucket.to_string(), Vec::new());
        }

        for (category, ids) in &inventory.categories {
            snapshot.categories.entry(category.clone()).or_default();
            let records = self
                .resolve_category(category, ids, &inventory.variants, &mut snapshot.warnings)
                .await;
            for record in records {
                distribute(&mut snapshot.categories, Arc::new(record), category);
            }
        }

        for record in self.resolve_banners(owned_banners, &mut snapshot.warnings).await {
            distribute(&mut snapshot.categories, Arc::new(record), BANNER_BUCKET);
        }

        if let Some(exclusive) = snapshot.categories.get_mut(EXCLUSIVE_BUCKET) {
            sort_exclusive(exclusive, self.lists);
        }

        snapshot.unlocked_variants = inventory.variants;

        logger::info(
            LogTag::Locker,
            &format!(
                "Locker built: {} exclusive, {} popular, {} banners, {} warning(s)",
                snapshot.count(EXCLUSIVE_BUCKET),
                snapshot.count(POPULAR_BUCKET),
                snapshot.count(BANNER_BUCKET),
                snapshot.warnings.len()
            ),
        );
        snapshot
    }

    /// One catalog request per chunk; chunks of a category run concurrently
    async fn resolve_category(
        &self,
        category: &str,
        ids: &BTreeSet<String>,
        variants: &BTreeMap<String, Vec<String>>,
        warnings: &mut Vec<PartialDataWarning>,
    ) -> Vec<CosmeticRecord> {
        let ids: Vec<String> = ids.iter().cloned().collect();
        let chunks: Vec<&[String]> = ids.chunks(self.catalog.batch_size()).collect();
        let total = chunks.len();

        let results = join_all(chunks.iter().map(|chunk| self.catalog.search_ids(chunk))).await;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(items) => {
                    for item in items {
                        if !seen.insert(item.id.to_lowercase()) {
                            continue;
                        }
                        if let Some(record) = self.cosmetic_record(category, item, variants) {
                            records.push(record);
                        }
                    }
                }
                Err(e) => {
                    let warning = PartialDataWarning::new(
                        format!("{} chunk {}/{}", category, index + 1, total),
                        &e,
                    );
                    logger::warning(LogTag::Locker, &warning.to_string());
                    warnings.push(warning);
                }
            }
        }

        logger::debug(
            LogTag::Locker,
            &format!("{}: {}/{} resolved", category, records.len(), ids.len()),
        );
        records
    }

    fn cosmetic_record(
        &self,
        category: &str,
        item: CatalogCosmetic,
        variants: &BTreeMap<String, Vec<String>>,
    ) -> Option<CosmeticRecord> {
        let key = item.id.to_lowercase();
        if key.is_empty() {
            return None;
        }
        // Emote bucket also receives sprays/emoticons sharing the template
        if category == EMOTES && !item.is_type("emote") && !self.lists.is_exclusive(&key) {
            return None;
        }

        let owned = variants.get(&key).cloned().unwrap_or_default();
        let mythic = is_exclusive_override(&key, &owned, self.lists);
        let rarity = if mythic {
            MYTHIC_RARITY.to_string()
        } else {
            item.normalized_rarity()
        };

        Some(CosmeticRecord {
            display_name: item.name,
            small_icon_url: item.images.small_icon,
            icon_url: item.images.icon,
            rarity,
            category: category.to_string(),
            is_banner: false,
            is_exclusive: mythic,
            is_popular: self.lists.is_popular(&key),
            owned_variant_tags: owned,
            cosmetic_id: item.id,
        })
    }

    /// Banner catalog is fetched once, and only when the account owns banners
    async fn resolve_banners(
        &self,
        owned: &BTreeSet<String>,
        warnings: &mut Vec<PartialDataWarning>,
    ) -> Vec<CosmeticRecord> {
        if owned.is_empty() {
            return Vec::new();
        }

        let catalog = match self.catalog.banners().await {
            Ok(catalog) => catalog,
            Err(e) => {
                let warning = PartialDataWarning::new("banners", &e);
                logger::warning(LogTag::Locker, &warning.to_string());
                warnings.push(warning);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        catalog
            .into_iter()
            .filter(|banner| {
                let key = banner.id.to_lowercase();
                owned.contains(&key) && seen.insert(key)
            })
            .map(|banner| self.banner_record(banner))
            .collect()
    }

    fn banner_record(&self, banner: CatalogBanner) -> CosmeticRecord {
        let exclusive = self.lists.is_exclusive(&banner.id);
        let display_name = if banner.name.is_empty() {
            banner.dev_name
        } else {
            banner.name
        };

        CosmeticRecord {
            display_name,
            small_icon_url: banner.images.small_icon,
            icon_url: banner.images.icon,
            rarity: if exclusive { MYTHIC_RARITY } else { BANNER_RARITY }.to_string(),
            category: BANNER_BUCKET.to_string(),
            is_banner: true,
            is_exclusive: exclusive,
            is_popular: false,
            owned_variant_tags: Vec::new(),
            cosmetic_id: banner.id,
        }
    }
}

/// Same `Arc` goes into the native bucket and every synthetic bucket it qualifies for
fn distribute(
    categories: &mut BTreeMap<String, Vec<Arc<CosmeticRecord>>>,
    record: Arc<CosmeticRecord>,
    native: &str,
) {
    if record.is_exclusive {
        categories
            .entry(EXCLUSIVE_BUCKET.to_string())
            .or_default()
            .push(record.clone());
    }
    if record.is_popular {
        categories
            .entry(POPULAR_BUCKET.to_string())
            .or_default()
            .push(record.clone());
    }
    categories.entry(native.to_string()).or_default().push(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogConfig;
    use crate::http::testing::MockTransport;
    use crate::http::{ApiRequest, ApiResponse};
    use serde_json::json;
    use std::collections::HashMap;

    /// Catalog echoing every requested id; `kinds` overrides (type, rarity)
    fn catalog_responder(
        kinds: HashMap<String, (&'static str, &'static str)>,
        failing_id: Option<&'static str>,
    ) -> impl Fn(&ApiRequest) -> crate::errors::EpicResult<ApiResponse> + Send + Sync {
        move |req: &ApiRequest| {
            let ids: Vec<&str> = req
                .query
                .iter()
                .filter(|(k, _)| k == "id")
                .map(|(_, v)| v.as_str())
                .collect();
            if failing_id.map_or(false, |fail| ids.contains(&fail)) {
                return Ok(ApiResponse::new(500, "catalog down"));
            }
            let data: Vec<serde_json::Value> = ids
                .iter()
                .map(|id| {
                    let (kind, rarity) = kinds.get(*id).copied().unwrap_or(("outfit", "rare"));
                    json!({
                        "id": id.to_uppercase(),
                        "name": format!("Name {}", id),
                        "type": {"value": kind},
                        "rarity": {"value": rarity},
                        "images": {"smallIcon": format!("https://img/{}.png", id)}
                    })
                })
                .collect();
            Ok(ApiResponse::new(
                200,
                json!({"status": 200, "data": data}).to_string(),
            ))
        }
    }

    fn athena(items: serde_json::Value) -> AthenaProfile {
        serde_json::from_value(json!({"profileChanges": [{"profile": {"items": items}}]})).unwrap()
    }

    fn catalog(mock: &Arc<MockTransport>) -> CatalogClient {
        CatalogClient::new(mock.clone(), &CatalogConfig::default())
    }

    #[tokio::test]
    async fn test_empty_inventory_has_all_seeded_buckets() {
        let mock = MockTransport::new();
        let catalog = catalog(&mock);
        let lists = ReferenceLists::default();

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&athena(json!({})), &BTreeSet::new())
            .await;

        for bucket in [
            OUTFITS,
            BACKPACKS,
            PICKAXES,
            EMOTES,
            GLIDERS,
            EXCLUSIVE_BUCKET,
            POPULAR_BUCKET,
            BANNER_BUCKET,
        ] {
            let records = snapshot.categories.get(bucket);
            assert!(records.is_some(), "missing bucket {}", bucket);
            assert!(records.unwrap().is_empty());
        }
        assert_eq!(snapshot.categories.len(), 8);
        assert!(snapshot.is_complete());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_batches_and_tolerates_failed_chunk() {
        let mock = MockTransport::new();
        mock.route(
            |req| req.url.contains("/search/ids"),
            catalog_responder(HashMap::new(), Some("cid_050")),
        );
        let catalog = catalog(&mock);
        let lists = ReferenceLists::default();

        let items: serde_json::Map<String, serde_json::Value> = (0..130)
            .map(|n| {
                (
                    format!("guid-{}", n),
                    json!({"templateId": format!("AthenaCharacter:CID_{:03}", n)}),
                )
            })
            .collect();

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&athena(serde_json::Value::Object(items)), &BTreeSet::new())
            .await;

        let sizes: Vec<usize> = mock
            .calls()
            .iter()
            .map(|req| req.query.iter().filter(|(k, _)| k == "id").count())
            .collect();
        assert_eq!(sizes, vec![50, 50, 30]);
        assert_eq!(snapshot.count(OUTFITS), 80);
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].scope, "AthenaCharacter chunk 2/3");
        assert!(!snapshot.is_complete());
    }

    #[tokio::test]
    async fn test_mythic_shared_between_buckets() {
        let mock = MockTransport::new();
        mock.route(
            |req| req.url.contains("/search/ids"),
            catalog_responder(HashMap::new(), None),
        );
        let catalog = catalog(&mock);
        let lists = ReferenceLists::from_text(
            "CID_029_Athena_Commando_F_Halloween\nCID_030_Athena_Commando_M_Halloween\n",
            "CID_029_Athena_Commando_F_Halloween\n",
        );

        let profile = athena(json!({
            "a": {"templateId": "AthenaCharacter:cid_029_athena_commando_f_halloween",
                  "attributes": {"variants": [{"channel": "Material", "owned": ["Mat1", "Mat3"]}]}},
            "b": {"templateId": "AthenaCharacter:cid_030_athena_commando_m_halloween",
                  "attributes": {"variants": [{"channel": "Material", "owned": ["Mat2"]}]}},
            "c": {"templateId": "AthenaCharacter:cid_100_plain"}
        }));

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&profile, &BTreeSet::new())
            .await;

        assert_eq!(snapshot.count(OUTFITS), 3);
        let exclusive = snapshot.bucket(EXCLUSIVE_BUCKET);
        assert_eq!(exclusive.len(), 1);
        assert_eq!(exclusive[0].rarity, "mythic");
        assert_eq!(exclusive[0].category, OUTFITS);

        let native = snapshot
            .bucket(OUTFITS)
            .iter()
            .find(|r| r.lookup_key() == "cid_029_athena_commando_f_halloween")
            .unwrap();
        assert!(Arc::ptr_eq(native, &exclusive[0]));
        assert!(Arc::ptr_eq(native, &snapshot.bucket(POPULAR_BUCKET)[0]));

        // Listed, but the required Mat1 style is not owned
        let purple = snapshot
            .bucket(OUTFITS)
            .iter()
            .find(|r| r.lookup_key() == "cid_030_athena_commando_m_halloween")
            .unwrap();
        assert_eq!(purple.rarity, "rare");
        assert!(!purple.is_exclusive);

        let plain = snapshot
            .bucket(OUTFITS)
            .iter()
            .find(|r| r.lookup_key() == "cid_100_plain")
            .unwrap();
        assert_eq!(plain.rarity, "rare");
        assert_eq!(
            snapshot.unlocked_variants["cid_029_athena_commando_f_halloween"],
            vec!["Mat1".to_string(), "Mat3".to_string()]
        );
    }

    #[tokio::test]
    async fn test_exclusive_bucket_order() {
        let mock = MockTransport::new();
        mock.route(
            |req| req.url.contains("/search/ids"),
            catalog_responder(HashMap::new(), None),
        );
        let catalog = catalog(&mock);
        let lists = ReferenceLists::from_text("cid_a\ncid_b\ncid_c\n", "");

        let profile = athena(json!({
            "1": {"templateId": "AthenaCharacter:cid_c"},
            "2": {"templateId": "AthenaPickaxe:cid_a"}
        }));

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&profile, &BTreeSet::new())
            .await;

        let order: Vec<String> = snapshot
            .bucket(EXCLUSIVE_BUCKET)
            .iter()
            .map(|r| r.lookup_key())
            .collect();
        assert_eq!(order, vec!["cid_a", "cid_c"]);
    }

    #[tokio::test]
    async fn test_emote_bucket_filters_non_emotes() {
        let mock = MockTransport::new();
        let mut kinds = HashMap::new();
        kinds.insert("eid_dance".to_string(), ("emote", "rare"));
        kinds.insert("spid_spray".to_string(), ("spray", "uncommon"));
        kinds.insert("spid_listed".to_string(), ("spray", "uncommon"));
        mock.route(
            |req| req.url.contains("/search/ids"),
            catalog_responder(kinds, None),
        );
        let catalog = catalog(&mock);
        let lists = ReferenceLists::from_text("spid_listed\n", "");

        let profile = athena(json!({
            "1": {"templateId": "AthenaDance:eid_dance"},
            "2": {"templateId": "AthenaDance:spid_spray"},
            "3": {"templateId": "AthenaDance:spid_listed"}
        }));

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&profile, &BTreeSet::new())
            .await;

        let keys: Vec<String> = snapshot.bucket(EMOTES).iter().map(|r| r.lookup_key()).collect();
        assert_eq!(keys, vec!["eid_dance", "spid_listed"]);
    }

    #[tokio::test]
    async fn test_banner_pass() {
        let mock = MockTransport::new();
        mock.on_url("/v1/banners", |_| {
            ApiResponse::new(
                200,
                json!({"status": 200, "data": [
                    {"id": "BRSeason01", "name": "Season 1", "images": {"smallIcon": "s", "icon": "i"}},
                    {"id": "OtherBanner", "name": "Other"},
                    {"id": "StandardBanner1", "devName": "Standard 1"}
                ]})
                .to_string(),
            )
        });
        let catalog = catalog(&mock);
        let lists = ReferenceLists::from_text("brseason01\n", "");
        let owned: BTreeSet<String> = ["brseason01", "standardbanner1"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(&athena(json!({})), &owned)
            .await;

        let banners = snapshot.bucket(BANNER_BUCKET);
        assert_eq!(banners.len(), 2);
        assert!(banners.iter().all(|b| b.is_banner));
        assert_eq!(banners[1].display_name, "Standard 1");
        assert_eq!(snapshot.bucket(EXCLUSIVE_BUCKET).len(), 1);
        assert_eq!(snapshot.bucket(EXCLUSIVE_BUCKET)[0].cosmetic_id, "BRSeason01");
        assert_eq!(mock.count_url("/v1/banners"), 1);
    }

    #[tokio::test]
    async fn test_banner_failure_is_a_warning() {
        let mock = MockTransport::new();
        mock.on_url("/v1/banners", |_| ApiResponse::new(500, "down"));
        mock.route(
            |req| req.url.contains("/search/ids"),
            catalog_responder(HashMap::new(), None),
        );
        let catalog = catalog(&mock);
        let lists = ReferenceLists::default();
        let owned: BTreeSet<String> = ["brseason01".to_string()].into_iter().collect();

        let snapshot = LockerAggregator::new(&catalog, &lists)
            .build_snapshot(
                &athena(json!({"1": {"templateId": "AthenaGlider:glider_1"}})),
                &owned,
            )
            .await;

        assert_eq!(snapshot.count(GLIDERS), 1);
        assert!(snapshot.bucket(BANNER_BUCKET).is_empty());
        assert_eq!(snapshot.warnings.len(), 1);
        assert_eq!(snapshot.warnings[0].scope, "banners");
        assert_eq!(snapshot.owned_banners, owned);
    }
}
