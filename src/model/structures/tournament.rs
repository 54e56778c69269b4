use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::model::{
    bracket::Standings,
    constants::ELIMINATION_STEP,
    error::LadderError,
    structures::{
        game::Match,
        ids::{MatchId, PlayerId, TournamentId}
    }
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    pub has_round_robin: bool,
    pub round_robin_rounds: u32,
    pub has_elimination: bool,
    /// Number of players seeded into the first elimination round
    pub elimination_field_size: u32
}

impl TournamentConfig {
    pub fn round_robin(name: &str, rounds: u32) -> TournamentConfig {
        TournamentConfig {
            name: name.to_string(),
            has_round_robin: true,
            round_robin_rounds: rounds,
            has_elimination: false,
            elimination_field_size: 0
        }
    }

    pub fn elimination(name: &str, field_size: u32) -> TournamentConfig {
        TournamentConfig {
            name: name.to_string(),
            has_round_robin: false,
            round_robin_rounds: 0,
            has_elimination: true,
            elimination_field_size: field_size
        }
    }

    pub fn with_elimination(mut self, field_size: u32) -> TournamentConfig {
        self.has_elimination = true;
        self.elimination_field_size = field_size;
        self
    }

    /// Validates the configuration, zeroing the counts of disabled phases.
    pub fn validate(mut self) -> Result<TournamentConfig, LadderError> {
        if !self.has_round_robin && !self.has_elimination {
            return Err(LadderError::InvalidTournamentConfig(
                "there must be either round robin rounds or elimination rounds or both"
            ));
        }

        if !self.has_round_robin {
            self.round_robin_rounds = 0;
        } else if self.round_robin_rounds == 0 {
            return Err(LadderError::InvalidTournamentConfig(
                "a round robin component needs more than zero rounds"
            ));
        }

        if !self.has_elimination {
            self.elimination_field_size = 0;
        } else if self.elimination_field_size == 0 {
            return Err(LadderError::InvalidTournamentConfig(
                "an elimination component needs more than zero players"
            ));
        } else if self.elimination_field_size % ELIMINATION_STEP != 0 {
            return Err(LadderError::InvalidTournamentConfig(
                "the elimination field must have an even number of players"
            ));
        }

        Ok(self)
    }
}

/// Mutable progress of a tournament. Written back by the store after every
/// state machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentProgress {
    pub started: bool,
    pub round_robin_finished: bool,
    pub elimination_field_size_remaining: u32,
    pub active: bool
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentPhase {
    Scheduled,
    RoundRobinInProgress,
    RoundRobinFinished,
    EliminationInProgress,
    Finished
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub config: TournamentConfig,
    pub progress: TournamentProgress,
    /// Entrants in join order. Also the seeding order for elimination ties.
    pub players: Vec<PlayerId>,
    pub games: Vec<Match>
}

impl Tournament {
    pub fn new(id: TournamentId, config: TournamentConfig) -> Result<Tournament, LadderError> {
        let config = config.validate()?;
        let progress = TournamentProgress {
            started: false,
            round_robin_finished: false,
            elimination_field_size_remaining: config.elimination_field_size,
            active: true
        };

        Ok(Tournament {
            id,
            config,
            progress,
            players: Vec::new(),
            games: Vec::new()
        })
    }

    pub fn game(&self, match_id: MatchId) -> Option<&Match> {
        self.games.iter().find(|g| g.id == match_id)
    }

    pub fn active_games(&self) -> impl Iterator<Item = &Match> {
        self.games.iter().filter(|g| g.active)
    }

    pub fn elimination_games(&self) -> impl Iterator<Item = &Match> {
        self.games.iter().filter(|g| g.is_elimination)
    }

    /// Current phase, derived from the progress flags.
    ///
    /// A tournament reads as [`TournamentPhase::Finished`] as soon as its final
    /// has been scheduled, while the final itself is still active. Use
    /// [`Tournament::champion`] or [`Tournament::active_games`] to tell whether
    /// it has been played.
    pub fn phase(&self) -> TournamentPhase {
        if !self.progress.started {
            TournamentPhase::Scheduled
        } else if !self.progress.active {
            TournamentPhase::Finished
        } else if !self.progress.round_robin_finished {
            TournamentPhase::RoundRobinInProgress
        } else if self.config.has_elimination && self.elimination_games().next().is_none() {
            TournamentPhase::RoundRobinFinished
        } else {
            TournamentPhase::EliminationInProgress
        }
    }

    /// Entrants with their win counts, most wins first. Ties keep join order.
    pub fn standings(&self) -> Vec<(PlayerId, u32)> {
        Standings::seeded(&self.players).record(&self.games).ranked()
    }

    /// The tournament winner, once it can be named.
    ///
    /// With an elimination phase this is the winner of the final, which is only
    /// known after the final itself has been played.
    pub fn champion(&self) -> Option<PlayerId> {
        if self.phase() != TournamentPhase::Finished {
            return None;
        }

        if self.config.has_elimination {
            return self.elimination_games().last().and_then(|g| g.winner);
        }

        self.standings().first().map(|(player_id, _)| *player_id)
    }
}
