use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::structures::ids::{MatchId, PlayerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub rating_before: f64,
    pub rating_after: f64,
    pub timestamp: DateTime<Utc>
}

impl RatingChange {
    pub fn delta(&self) -> f64 {
        self.rating_after - self.rating_before
    }
}

impl fmt::Display for RatingChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} -> {:.2} ({:+.2})",
            self.rating_before,
            self.rating_after,
            self.delta()
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    use super::RatingChange;

    #[test]
    fn test_display_signs_delta() {
        let change = RatingChange {
            match_id: 1,
            player_id: 2,
            rating_before: 1000.0,
            rating_after: 984.0,
            timestamp: Utc::now()
        };

        assert_abs_diff_eq!(change.delta(), -16.0);
        assert_eq!(change.to_string(), "1000.00 -> 984.00 (-16.00)");
    }
}
