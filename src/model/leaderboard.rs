use std::cmp::Ordering;

use itertools::Itertools;
use serde::Serialize;

use crate::model::structures::{ids::PlayerId, participant::Participant};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub rating: f64,
    pub percentile: f64
}

/// Ranks participants by rating, highest first. Equal ratings keep input order.
pub fn leaderboard(participants: &[Participant]) -> Vec<LeaderboardEntry> {
    let total = participants.len();

    participants
        .iter()
        .sorted_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal))
        .enumerate()
        .map(|(i, p)| {
            let rank = i as u32 + 1;
            LeaderboardEntry {
                rank,
                player_id: p.id,
                name: p.to_string(),
                rating: p.rating,
                percentile: percentile(rank, total).unwrap_or(0.0)
            }
        })
        .collect()
}

/// `P = (n/N) * 100` where `n` is the number of players ranked below.
fn percentile(rank: u32, total: usize) -> Option<f64> {
    if rank < 1 || total == 0 {
        return None;
    }

    let below = total as f64 - rank as f64;
    Some(below / total as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::{
        model::{
            leaderboard::{leaderboard, percentile},
            structures::participant::Participant
        },
        utils::test_utils::generate_participants
    };

    fn rated(id: i32, name: &str, rating: f64) -> Participant {
        let mut p = Participant::new(id, name, None);
        p.rating = rating;
        p
    }

    #[test]
    fn test_sorted_by_rating_descending() {
        let board = leaderboard(&[
            rated(1, "anna", 1000.0),
            rated(2, "bert", 1200.0),
            rated(3, "carl", 984.0),
        ]);

        let ids: Vec<i32> = board.iter().map(|e| e.player_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);
        assert_eq!(board[0].name, "bert");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let board = leaderboard(&[rated(5, "e", 1000.0), rated(3, "c", 1000.0)]);
        assert_eq!(board[0].player_id, 5);
        assert_eq!(board[1].player_id, 3);
    }

    #[test]
    fn test_percentile() {
        assert_eq!(percentile(0, 10), None);
        assert_eq!(percentile(1, 0), None);
        assert_eq!(percentile(1, 1), Some(0.0));

        assert_abs_diff_eq!(percentile(1, 2).unwrap(), 50.0, epsilon = 0.0001);
        assert_abs_diff_eq!(percentile(2, 2).unwrap(), 0.0, epsilon = 0.0001);
        assert_abs_diff_eq!(percentile(1, 10).unwrap(), 90.0, epsilon = 0.0001);
        assert_abs_diff_eq!(percentile(1, 1000).unwrap(), 99.9, epsilon = 0.0001);
    }

    #[test]
    fn test_ranks_a_full_league() {
        let participants = generate_participants(50);
        let board = leaderboard(&participants);

        assert_eq!(board.len(), 50);
        assert!(board.windows(2).all(|w| w[0].rating >= w[1].rating));
        assert!(board.windows(2).all(|w| w[0].percentile > w[1].percentile));
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), (1..=50).collect::<Vec<u32>>());
        assert_abs_diff_eq!(board[49].percentile, 0.0);
    }

    #[test]
    fn test_empty() {
        assert!(leaderboard(&[]).is_empty());
    }
}
