//! Mythic/exclusive reclassification
//!
//! The catalog's rarity says nothing about which styles an account unlocked.
//! For a few cosmetics only one unlocked style counts as the exclusive form.

use super::reference::ReferenceLists;

/// Listed cosmetic id (lowercase) → variant tag that must be owned
pub const MYTHIC_VARIANT_RULES: [(&str, &str); 10] = [
    ("cid_029_athena_commando_f_halloween", "Mat3"),
    ("cid_030_athena_commando_m_halloween", "Mat1"),
    ("cid_116_athena_commando_m_carbideblack", "Stage5"),
    ("cid_694_athena_commando_m_catburglar", "Stage4"),
    ("cid_693_athena_commando_m_buffcat", "Stage4"),
    ("cid_691_athena_commando_f_tntina", "Stage4"),
    ("cid_690_athena_commando_f_photographer", "Stage4"),
    ("cid_701_athena_commando_m_bananaagent", "Stage4"),
    ("cid_315_athena_commando_m_teriyakifish", "Mat2"),
    ("cid_971_athena_commando_m_jupiter_s0z6m", "Mat2"),
];

pub fn required_variant(cosmetic_id: &str) -> Option<&'static str> {
    MYTHIC_VARIANT_RULES
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(cosmetic_id))
        .map(|(_, tag)| *tag)
}

/// True when the cosmetic counts as mythic for this account.
///
/// Unlisted ids never qualify. Listed ids with a rule need the rule's tag
/// among the owned variants; listed ids without a rule always qualify.
pub fn is_exclusive_override(
    cosmetic_id: &str,
    owned_variants: &[String],
    lists: &ReferenceLists,
) -> bool {
    if !lists.is_exclusive(cosmetic_id) {
        return false;
    }
    match required_variant(cosmetic_id) {
        Some(tag) => owned_variants
            .iter()
            .any(|owned| owned.eq_ignore_ascii_case(tag)),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists() -> ReferenceLists {
        ReferenceLists::from_text(
            "CID_029_Athena_Commando_F_Halloween\nCID_017_Athena_Commando_M\n",
            "",
        )
    }

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unlisted_never_mythic() {
        let lists = lists();
        assert!(!is_exclusive_override("CID_999_Unlisted", &[], &lists));
        assert!(!is_exclusive_override(
            "CID_116_Athena_Commando_M_CarbideBlack",
            &tags(&["Stage5"]),
            &lists
        ));
    }

    #[test]
    fn test_rule_requires_variant() {
        let lists = lists();
        let id = "CID_029_Athena_Commando_F_Halloween";
        assert!(!is_exclusive_override(id, &[], &lists));
        assert!(!is_exclusive_override(id, &tags(&["Mat1", "Mat2"]), &lists));
        assert!(is_exclusive_override(id, &tags(&["Mat1", "mat3"]), &lists));
    }

    #[test]
    fn test_listed_without_rule_is_unconditional() {
        assert!(is_exclusive_override("cid_017_athena_commando_m", &[], &lists()));
    }

    #[test]
    fn test_required_variant_lookup() {
        assert_eq!(required_variant("CID_701_Athena_Commando_M_BananaAgent"), Some("Stage4"));
        assert_eq!(required_variant("CID_001"), None);
    }
}
