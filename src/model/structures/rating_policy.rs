use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Whether tournament games feed the global rating.
///
/// Casual games always do. The league historically excluded tournament games,
/// which is the default.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TournamentRatingPolicy {
    #[default]
    Exclude,
    Include
}

impl TournamentRatingPolicy {
    pub fn rates_tournament_games(self) -> bool {
        matches!(self, TournamentRatingPolicy::Include)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::TournamentRatingPolicy;

    #[test]
    fn test_parse() {
        assert_eq!(TournamentRatingPolicy::from_str("exclude"), Ok(TournamentRatingPolicy::Exclude));
        assert_eq!(TournamentRatingPolicy::from_str("INCLUDE"), Ok(TournamentRatingPolicy::Include));
        assert!(TournamentRatingPolicy::from_str("sometimes").is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for policy in TournamentRatingPolicy::iter() {
            assert_eq!(TournamentRatingPolicy::from_str(&policy.to_string()), Ok(policy));
        }
    }

    #[test]
    fn test_default_excludes_tournament_games() {
        assert!(!TournamentRatingPolicy::default().rates_tournament_games());
    }
}
