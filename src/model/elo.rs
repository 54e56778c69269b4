use chrono::{DateTime, Utc};

use crate::model::{
    constants::{DEFAULT_WEIGHTING, ELO_SCALE, RATING_FLOOR},
    error::LadderError,
    structures::{game::Match, participant::Participant, rating_change::RatingChange}
};

/// Expected score of a player against an opponent, in `[0, 1]`.
///
/// `10^(r/400) / (10^(r/400) + 10^(opponent/400))`
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    let transformed = 10f64.powf(rating / ELO_SCALE);
    let opponent_transformed = 10f64.powf(opponent_rating / ELO_SCALE);

    transformed / (transformed + opponent_transformed)
}

/// # ELO update
///
/// Returns `(new_winner_rating, new_loser_rating)` for a single result. The
/// winner gains `weighting * (1 - expected_winner)` and the loser drops by
/// `weighting * expected_loser`. Both values are floored at [`RATING_FLOOR`]
/// and rounded to 2 decimal places.
pub fn apply_result(winner_rating: f64, loser_rating: f64, weighting: f64) -> (f64, f64) {
    let winner_score = expected_score(winner_rating, loser_rating);
    let loser_score = expected_score(loser_rating, winner_rating);

    let winner_after = winner_rating + weighting * (1.0 - winner_score);
    let loser_after = loser_rating - weighting * loser_score;

    (
        round_rating(winner_after.max(RATING_FLOOR)),
        round_rating(loser_after.max(RATING_FLOOR))
    )
}

fn round_rating(rating: f64) -> f64 {
    (rating * 100.0).round() / 100.0
}

/// Applies [`apply_result`] to completed games and produces the rating change
/// records for both players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingEngine {
    pub weighting: f64
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(DEFAULT_WEIGHTING)
    }
}

impl RatingEngine {
    pub fn new(weighting: f64) -> RatingEngine {
        RatingEngine { weighting }
    }

    /// Rates a completed game. Returns the winner's change first.
    ///
    /// The participants are not modified; callers persist `rating_after`.
    pub fn rate(
        &self,
        game: &Match,
        winner: &Participant,
        loser: &Participant,
        timestamp: DateTime<Utc>
    ) -> Result<[RatingChange; 2], LadderError> {
        let recorded_winner = game.winner.ok_or(LadderError::MatchNotCompleted(game.id))?;

        if recorded_winner != winner.id || !game.involves(loser.id) || winner.id == loser.id {
            return Err(LadderError::InvalidMatchCompletion {
                match_id: game.id,
                reason: "rated players do not match the recorded result"
            });
        }

        let (winner_after, loser_after) = apply_result(winner.rating, loser.rating, self.weighting);

        Ok([
            RatingChange {
                match_id: game.id,
                player_id: winner.id,
                rating_before: winner.rating,
                rating_after: winner_after,
                timestamp
            },
            RatingChange {
                match_id: game.id,
                player_id: loser.id,
                rating_before: loser.rating,
                rating_after: loser_after,
                timestamp
            }
        ])
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::Utc;

    use crate::model::{
        constants::RATING_FLOOR,
        elo::{apply_result, expected_score, RatingEngine},
        error::LadderError,
        structures::{
            game::{Match, MatchOutcome},
            match_kind::MatchKind,
            participant::Participant
        }
    };

    #[test]
    fn test_equal_ratings() {
        assert_abs_diff_eq!(expected_score(1000.0, 1000.0), 0.5);

        let (winner, loser) = apply_result(1000.0, 1000.0, 32.0);
        assert_abs_diff_eq!(winner, 1016.0);
        assert_abs_diff_eq!(loser, 984.0);
    }

    #[test]
    fn test_expected_scores_sum_to_one() {
        let a = expected_score(1200.0, 950.0);
        let b = expected_score(950.0, 1200.0);

        assert!(a > 0.5);
        assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let (fav_after, _) = apply_result(1400.0, 1000.0, 32.0);
        let (dog_after, _) = apply_result(1000.0, 1400.0, 32.0);

        assert!(fav_after - 1400.0 < dog_after - 1000.0);
    }

    #[test]
    fn test_floor_clamps_loser() {
        let (winner, loser) = apply_result(105.0, 100.0, 32.0);

        assert!(winner > 105.0);
        assert_abs_diff_eq!(loser, RATING_FLOOR);

        let (_, loser) = apply_result(105.0, 100.0, 10_000.0);
        assert_abs_diff_eq!(loser, RATING_FLOOR);
    }

    #[test]
    fn test_ratings_never_below_floor_and_gap_moves_to_winner() {
        let ratings = [100.5, 150.0, 480.25, 1000.0, 1333.33, 2100.0];
        let weightings = [1.0, 16.0, 32.0, 64.0, 400.0];

        for &w in &ratings {
            for &l in &ratings {
                for &k in &weightings {
                    let (new_w, new_l) = apply_result(w, l, k);

                    assert!(new_w >= RATING_FLOOR);
                    assert!(new_l >= RATING_FLOOR);
                    assert!(new_w >= w - 0.005);
                    assert!(new_l <= l + 0.005);
                    assert!(new_w - new_l >= w - l - 0.01);
                }
            }
        }
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        let (winner, loser) = apply_result(1234.567, 987.654, 32.0);

        assert_abs_diff_eq!(winner * 100.0, (winner * 100.0).round(), epsilon = 1e-6);
        assert_abs_diff_eq!(loser * 100.0, (loser * 100.0).round(), epsilon = 1e-6);
    }

    #[test]
    fn test_engine_produces_changes_for_both_players() {
        let winner = Participant::new(1, "anna", None);
        let loser = Participant::new(2, "bert", None);
        let mut game = Match::new(5, [2, 1], MatchKind::Casual, Utc::now()).unwrap();
        game.complete(&MatchOutcome::winner(1), Utc::now()).unwrap();

        let [w, l] = RatingEngine::default().rate(&game, &winner, &loser, Utc::now()).unwrap();

        assert_eq!(w.player_id, 1);
        assert_eq!(w.match_id, 5);
        assert_abs_diff_eq!(w.rating_before, 1000.0);
        assert_abs_diff_eq!(w.rating_after, 1016.0);
        assert_eq!(l.player_id, 2);
        assert_abs_diff_eq!(l.rating_after, 984.0);
    }

    #[test]
    fn test_engine_rejects_unfinished_or_mismatched_games() {
        let anna = Participant::new(1, "anna", None);
        let bert = Participant::new(2, "bert", None);
        let mut game = Match::new(5, [1, 2], MatchKind::Casual, Utc::now()).unwrap();
        let engine = RatingEngine::new(16.0);

        assert_eq!(
            engine.rate(&game, &anna, &bert, Utc::now()),
            Err(LadderError::MatchNotCompleted(5))
        );

        game.complete(&MatchOutcome::winner(2), Utc::now()).unwrap();
        assert!(matches!(
            engine.rate(&game, &anna, &bert, Utc::now()),
            Err(LadderError::InvalidMatchCompletion { .. })
        ));
    }
}
