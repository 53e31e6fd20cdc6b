//! fortnite-api.com response shapes

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct CatalogEnvelope<T> {
    pub status: u16,
    pub data: T,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogValue {
    pub value: String,
    pub display_value: String,
    pub backend_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogImages {
    pub small_icon: Option<String>,
    pub icon: Option<String>,
}

/// One battle royale cosmetic from `/v2/cosmetics/br/search/ids`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogCosmetic {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub cosmetic_type: CatalogValue,
    pub rarity: CatalogValue,
    pub series: Option<CatalogValue>,
    pub images: CatalogImages,
}

impl CatalogCosmetic {
    /// Series wins over rarity: "Gaming Legends Series" → `gaminglegends`
    pub fn normalized_rarity(&self) -> String {
        if let Some(series) = &self.series {
            let normalized = normalize_series(&series.value);
            if !normalized.is_empty() {
                return normalized;
            }
        }
        self.rarity.value.to_lowercase()
    }

    pub fn is_type(&self, value: &str) -> bool {
        self.cosmetic_type.value.eq_ignore_ascii_case(value)
    }
}

/// One banner from `/v1/banners`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogBanner {
    pub id: String,
    pub dev_name: String,
    pub name: String,
    pub category: String,
    pub images: CatalogImages,
}

fn normalize_series(value: &str) -> String {
    value
        .to_lowercase()
        .replace("series", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cosmetic(rarity: &str, series: Option<&str>) -> CatalogCosmetic {
        CatalogCosmetic {
            rarity: CatalogValue {
                value: rarity.to_string(),
                ..Default::default()
            },
            series: series.map(|s| CatalogValue {
                value: s.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_rarity_normalization() {
        assert_eq!(cosmetic("Legendary", None).normalized_rarity(), "legendary");
        assert_eq!(
            cosmetic("Epic", Some("Gaming Legends Series")).normalized_rarity(),
            "gaminglegends"
        );
        assert_eq!(cosmetic("Rare", Some("Icon Series")).normalized_rarity(), "icon");
        assert_eq!(cosmetic("Epic", Some("MARVEL SERIES")).normalized_rarity(), "marvel");
        assert_eq!(cosmetic("Epic", Some("Star Wars Series")).normalized_rarity(), "starwars");
        assert_eq!(cosmetic("Uncommon", Some("")).normalized_rarity(), "uncommon");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"{"status":200,"data":[{"id":"CID_029_Athena_Commando_F_Halloween","name":"Ghoul Trooper",
            "type":{"value":"outfit","displayValue":"Outfit","backendValue":"AthenaCharacter"},
            "rarity":{"value":"epic"},
            "images":{"smallIcon":"https://x/small.png","icon":"https://x/icon.png"}}]}"#;
        let envelope: CatalogEnvelope<Vec<CatalogCosmetic>> = serde_json::from_str(json).unwrap();
        let item = &envelope.data[0];
        assert_eq!(item.name, "Ghoul Trooper");
        assert!(item.is_type("Outfit"));
        assert_eq!(item.cosmetic_type.backend_value, "AthenaCharacter");
        assert!(item.series.is_none());
        assert_eq!(item.images.small_icon.as_deref(), Some("https://x/small.png"));
    }
}
