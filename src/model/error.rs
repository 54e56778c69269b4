use thiserror::Error;

use crate::model::structures::ids::{MatchId, PlayerId, TournamentId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LadderError {
    #[error("There must be an even number of players (at least 2) for a schedule, got {participants}")]
    InvalidScheduleInput { participants: usize },

    #[error("Game {match_id} cannot be completed: {reason}")]
    InvalidMatchCompletion { match_id: MatchId, reason: &'static str },

    #[error("A game requires two players, please try again ({reason})")]
    InvalidMatchPlayers { reason: &'static str },

    #[error("Invalid tournament configuration: {0}")]
    InvalidTournamentConfig(&'static str),

    #[error("Elimination field of {field_size} needs at least that many players, got {players}")]
    NotEnoughPlayers { field_size: u32, players: usize },

    #[error("Tournament {0} has already been started")]
    TournamentAlreadyStarted(TournamentId),

    #[error("Player {player_id} has already joined tournament {tournament_id}")]
    AlreadyJoined { tournament_id: TournamentId, player_id: PlayerId },

    #[error("Username {0} is already registered")]
    DuplicateUsername(String),

    #[error("Player {0} not found")]
    UnknownParticipant(PlayerId),

    #[error("Game {0} not found")]
    UnknownMatch(MatchId),

    #[error("Tournament {0} not found")]
    UnknownTournament(TournamentId),

    #[error("Game {match_id} is not part of tournament {tournament_id}")]
    MatchNotInTournament { tournament_id: TournamentId, match_id: MatchId },

    #[error("Game {0} has no winner yet")]
    MatchNotCompleted(MatchId)
}
