//! Common-Profile Parser
//!
//! Pure functions over the `common_core` document: V-Bucks balance, refund
//! counters, V-Bucks pack purchases, gifts and owned banners.

use super::documents::CommonProfile;
use serde::Serialize;
use std::collections::BTreeSet;

/// Currency item templates counted towards the balance
const CURRENCY_TEMPLATES: [&str; 4] = [
    "Currency:MtxPurchased",
    "Currency:MtxEarned",
    "Currency:MtxGiveaway",
    "Currency:MtxPurchaseBonus",
];

/// V-Bucks pack SKUs and their face values
pub const VBUCKS_PACKS: [(&str, u64); 5] = [
    ("FN_1000_POINTS", 1000),
    ("FN_2800_POINTS", 2800),
    ("FN_5000_POINTS", 5000),
    ("FN_7500_POINTS", 7500),
    ("FN_13500_POINTS", 13500),
];

/// Template category of banner icons in the common profile
pub const BANNER_CATEGORY: &str = "HomebaseBannerIcon";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurchaseSummary {
    /// Current balance across all currency items
    pub current_vbucks: i64,
    pub refunds_used: u64,
    pub refund_credits: u64,
    pub receipts: usize,
    /// Fulfillment count per pack, in `VBUCKS_PACKS` order
    pub pack_counts: [u64; 5],
    pub total_vbucks_bought: u64,
    pub pending_gifts: usize,
    pub gifts_sent: u64,
    pub gifts_received: u64,
}

impl PurchaseSummary {
    /// `(face value, count)` per pack
    pub fn packs(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        VBUCKS_PACKS
            .iter()
            .zip(self.pack_counts.iter())
            .map(|((_, value), count)| (*value, *count))
    }
}

/// Weighted sum of pack counts by face value
pub fn total_vbucks_bought(pack_counts: &[u64; 5]) -> u64 {
    VBUCKS_PACKS
        .iter()
        .zip(pack_counts.iter())
        .map(|((_, value), count)| value * count)
        .sum()
}

/// Builds the purchase summary. Never fails: absent keys count as zero.
///
/// The balance comes from the first profile change. Counters found in
/// several changes combine by maximum, so change order does not matter.
pub fn parse_common_profile(profile: &CommonProfile) -> PurchaseSummary {
    let mut summary = PurchaseSummary::default();

    if let Some(first) = profile.first_profile() {
        summary.current_vbucks = first
            .items
            .values()
            .filter(|item| CURRENCY_TEMPLATES.contains(&item.template_id.as_str()))
            .map(|item| item.quantity)
            .sum();
    }

    for change in profile.profiles() {
        let attributes = &change.stats.attributes;

        let history = &attributes.mtx_purchase_history;
        summary.refunds_used = summary.refunds_used.max(history.refunds_used);
        summary.refund_credits = summary.refund_credits.max(history.refund_credits);

        let iap = &attributes.in_app_purchases;
        summary.receipts = summary.receipts.max(iap.receipts.len());
        for (slot, (sku, _)) in VBUCKS_PACKS.iter().enumerate() {
            let count = iap.fulfillment_counts.get(*sku).copied().unwrap_or(0);
            summary.pack_counts[slot] = summary.pack_counts[slot].max(count);
        }

        let gifts = &attributes.gift_history;
        summary.pending_gifts = summary.pending_gifts.max(gifts.gifts.len());
        summary.gifts_sent = summary.gifts_sent.max(gifts.num_sent);
        summary.gifts_received = summary.gifts_received.max(gifts.num_received);
    }

    summary.total_vbucks_bought = total_vbucks_bought(&summary.pack_counts);
    summary
}

/// Lowercased ids of `HomebaseBannerIcon:<id>` items in any change
pub fn owned_banner_ids(profile: &CommonProfile) -> BTreeSet<String> {
    profile
        .profiles()
        .flat_map(|p| p.items.values())
        .filter_map(|item| {
            let (prefix, id) = item.template_id.split_once(':')?;
            if prefix.eq_ignore_ascii_case(BANNER_CATEGORY) && !id.is_empty() {
                Some(id.to_lowercase())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn change(fulfillment: serde_json::Value, gifts_sent: u64) -> serde_json::Value {
        json!({
            "profile": {
                "stats": {"attributes": {
                    "in_app_purchases": {"receipts": ["a", "b"], "fulfillmentCounts": fulfillment},
                    "gift_history": {"num_sent": gifts_sent, "num_received": 1, "gifts": [{}]},
                    "mtx_purchase_history": {"refundsUsed": 2, "refundCredits": 1}
                }}
            }
        })
    }

    fn parse(value: serde_json::Value) -> CommonProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_weighted_total() {
        let profile = parse(json!({"profileChanges": [change(json!({
            "FN_1000_POINTS": 1,
            "FN_2800_POINTS": 2,
            "FN_5000_POINTS": 0,
            "FN_7500_POINTS": 1,
            "FN_13500_POINTS": 3
        }), 4)]}));

        let summary = parse_common_profile(&profile);
        assert_eq!(summary.pack_counts, [1, 2, 0, 1, 3]);
        assert_eq!(summary.total_vbucks_bought, 1000 + 5600 + 7500 + 40500);
        assert_eq!(summary.receipts, 2);
        assert_eq!(summary.refunds_used, 2);
        assert_eq!(summary.refund_credits, 1);
        assert_eq!(summary.gifts_sent, 4);
        assert_eq!(summary.gifts_received, 1);
        assert_eq!(summary.pending_gifts, 1);
    }

    #[test]
    fn test_total_invariant_under_change_order() {
        let a = change(json!({"FN_1000_POINTS": 3, "FN_13500_POINTS": 1}), 2);
        let b = change(json!({"FN_2800_POINTS": 5, "FN_1000_POINTS": 1}), 7);

        let forward = parse_common_profile(&parse(json!({"profileChanges": [a.clone(), b.clone()]})));
        let reverse = parse_common_profile(&parse(json!({"profileChanges": [b, a]})));

        assert_eq!(forward.total_vbucks_bought, reverse.total_vbucks_bought);
        assert_eq!(forward.pack_counts, reverse.pack_counts);
        assert_eq!(forward.gifts_sent, 7);
        assert_eq!(
            forward.total_vbucks_bought,
            total_vbucks_bought(&[3, 5, 0, 0, 1])
        );
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        for doc in [
            json!({}),
            json!({"profileChanges": []}),
            json!({"profileChanges": [{}]}),
            json!({"profileChanges": [{"profile": {"stats": {}}}]}),
        ] {
            assert_eq!(parse_common_profile(&parse(doc)), PurchaseSummary::default());
        }
    }

    #[test]
    fn test_currency_balance_from_first_change() {
        let profile = parse(json!({"profileChanges": [{"profile": {"items": {
            "a": {"templateId": "Currency:MtxPurchased", "quantity": 1200},
            "b": {"templateId": "Currency:MtxEarned", "quantity": 300},
            "c": {"templateId": "Currency:MtxComplimentary", "quantity": 999},
            "d": {"templateId": "HomebaseBannerIcon:StandardBanner1", "quantity": 1}
        }}}]}));

        assert_eq!(parse_common_profile(&profile).current_vbucks, 1500);
    }

    #[test]
    fn test_owned_banner_ids() {
        let profile = parse(json!({"profileChanges": [{"profile": {"items": {
            "a": {"templateId": "HomebaseBannerIcon:StandardBanner1"},
            "b": {"templateId": "homebasebannericon:BRSeason01"},
            "c": {"templateId": "HomebaseBannerColor:DefaultColor1"},
            "d": {"templateId": "HomebaseBannerIcon:"}
        }}}]}));

        let banners = owned_banner_ids(&profile);
        assert_eq!(
            banners.into_iter().collect::<Vec<_>>(),
            vec!["brseason01".to_string(), "standardbanner1".to_string()]
        );
    }
}
