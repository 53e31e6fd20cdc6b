//! Season History Summarizer

use super::documents::AthenaProfile;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonRecord {
    pub season_number: u32,
    pub level: u32,
    pub battle_pass_purchased: bool,
    pub wins: u64,
    pub book_level: u32,
    /// Sum of every bracket count
    pub matches: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentSeason {
    pub season_number: u32,
    pub level: u32,
    pub battle_pass_purchased: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonSummary {
    /// Past seasons, ascending by season number
    pub seasons: Vec<SeasonRecord>,
    pub career_wins: u64,
    pub career_matches: u64,
    pub seasons_played: usize,
    pub current_season: Option<CurrentSeason>,
    pub account_level: u32,
}

/// Pure transform of the athena profile already fetched for the locker
pub fn summarize_seasons(profile: &AthenaProfile) -> SeasonSummary {
    let Some(first) = profile.first_profile() else {
        return SeasonSummary::default();
    };
    let attributes = &first.stats.attributes;

    let mut seasons: Vec<SeasonRecord> = attributes
        .past_seasons
        .iter()
        .map(|past| SeasonRecord {
            season_number: past.season_number,
            level: past.season_level,
            battle_pass_purchased: past.purchased_vip,
            wins: past.num_wins,
            book_level: past.book_level,
            matches: past.num_high_bracket + past.num_low_bracket + past.num_royal_royales,
        })
        .collect();
    seasons.sort_by_key(|season| season.season_number);

    let current_season = (attributes.season_num > 0).then(|| CurrentSeason {
        season_number: attributes.season_num,
        level: attributes.level,
        battle_pass_purchased: attributes.book_purchased,
    });

    SeasonSummary {
        career_wins: seasons.iter().map(|s| s.wins).sum(),
        career_matches: seasons.iter().map(|s| s.matches).sum(),
        seasons_played: seasons.len(),
        seasons,
        current_season,
        account_level: attributes.account_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> AthenaProfile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summarize() {
        let profile = parse(json!({"profileChanges": [{"profile": {"stats": {"attributes": {
            "season_num": 31,
            "level": 45,
            "book_purchased": true,
            "accountLevel": 820,
            "past_seasons": [
                {"seasonNumber": 12, "numWins": 3, "seasonLevel": 100, "bookLevel": 100,
                 "purchasedVIP": true, "numHighBracket": 10, "numLowBracket": 5, "numRoyalRoyales": 1},
                {"seasonNumber": 2, "numWins": 1, "seasonLevel": 40, "numLowBracket": 20}
            ]
        }}}}]}));

        let summary = summarize_seasons(&profile);
        assert_eq!(summary.seasons_played, 2);
        assert_eq!(summary.seasons[0].season_number, 2);
        assert_eq!(summary.seasons[1].matches, 16);
        assert!(summary.seasons[1].battle_pass_purchased);
        assert!(!summary.seasons[0].battle_pass_purchased);
        assert_eq!(summary.career_wins, 4);
        assert_eq!(summary.career_matches, 36);
        assert_eq!(summary.account_level, 820);
        assert_eq!(
            summary.current_season,
            Some(CurrentSeason {
                season_number: 31,
                level: 45,
                battle_pass_purchased: true
            })
        );
    }

    #[test]
    fn test_missing_stats_default() {
        assert_eq!(summarize_seasons(&parse(json!({}))), SeasonSummary::default());

        let summary = summarize_seasons(&parse(json!({"profileChanges": [{"profile": {}}]})));
        assert!(summary.seasons.is_empty());
        assert!(summary.current_season.is_none());
        assert_eq!(summary.career_matches, 0);
    }
}
