use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    error::LadderError,
    structures::{
        ids::{MatchId, PlayerId},
        match_kind::MatchKind
    }
};

/// A single game between two players.
///
/// Games stay active until a winner is reported. Once completed, the winner
/// and scores never change again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    /// Home player first. Only meaningful for display; pairing is unordered.
    pub players: [PlayerId; 2],
    pub active: bool,
    pub winner: Option<PlayerId>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub is_tournament: bool,
    pub is_elimination: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>
}

/// What gets reported when a game is finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: PlayerId,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>
}

impl MatchOutcome {
    pub fn winner(winner: PlayerId) -> MatchOutcome {
        MatchOutcome {
            winner,
            home_score: None,
            away_score: None
        }
    }

    pub fn with_scores(mut self, home_score: i32, away_score: i32) -> MatchOutcome {
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self
    }
}

impl Match {
    pub fn new(
        id: MatchId,
        players: [PlayerId; 2],
        kind: MatchKind,
        created_at: DateTime<Utc>
    ) -> Result<Match, LadderError> {
        if players[0] == players[1] {
            return Err(LadderError::InvalidMatchPlayers {
                reason: "a player cannot play against themselves"
            });
        }

        Ok(Match {
            id,
            players,
            active: true,
            winner: None,
            home_score: None,
            away_score: None,
            is_tournament: kind.is_tournament(),
            is_elimination: kind.is_elimination(),
            created_at,
            completed_at: None
        })
    }

    pub fn kind(&self) -> MatchKind {
        match (self.is_tournament, self.is_elimination) {
            (_, true) => MatchKind::Elimination,
            (true, false) => MatchKind::RoundRobin,
            (false, false) => MatchKind::Casual
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.players.contains(&player_id)
    }

    pub fn is_completed(&self) -> bool {
        !self.active && self.winner.is_some()
    }

    /// The player who did not win. `None` while the game is in progress.
    pub fn loser(&self) -> Option<PlayerId> {
        let winner = self.winner?;
        self.players.iter().copied().find(|p| *p != winner)
    }

    /// Records the result and closes the game. The game is left untouched on error.
    pub fn complete(&mut self, outcome: &MatchOutcome, completed_at: DateTime<Utc>) -> Result<(), LadderError> {
        if !self.active || self.winner.is_some() {
            return Err(LadderError::InvalidMatchCompletion {
                match_id: self.id,
                reason: "the game has already been completed"
            });
        }

        if !self.involves(outcome.winner) {
            return Err(LadderError::InvalidMatchCompletion {
                match_id: self.id,
                reason: "the winner is not one of the game's players"
            });
        }

        self.winner = Some(outcome.winner);
        self.home_score = outcome.home_score;
        self.away_score = outcome.away_score;
        self.active = false;
        self.completed_at = Some(completed_at);

        Ok(())
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.winner {
            Some(winner) => write!(f, "Game {}: won by {}", self.id, winner),
            None => write!(f, "Game {}: in progress", self.id)
        }
    }
}
