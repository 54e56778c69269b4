use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    error::LadderError,
    structures::{
        game::Match,
        ids::{MatchId, PlayerId, TournamentId},
        match_kind::MatchKind,
        participant::Participant,
        rating_change::RatingChange,
        tournament::{Tournament, TournamentConfig, TournamentProgress}
    }
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access league file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize league file: {0}")]
    Serialization(#[from] serde_json::Error)
}

/// The lookups and writes the league needs from its persistence layer.
///
/// Lookups of unknown ids fail with the matching `Unknown*` error. Tournaments
/// are returned fully assembled, with their games in creation order; a linked
/// game that cannot be found fails the lookup with `UnknownMatch`.
pub trait LeagueStore {
    fn get_participant(&self, id: PlayerId) -> Result<Participant, LadderError>;
    fn get_participants(&self) -> Vec<Participant>;
    fn find_participant(&self, username: &str) -> Option<Participant>;
    fn create_participant(&mut self, username: &str, full_name: Option<&str>) -> Participant;
    fn save_rating(&mut self, id: PlayerId, rating: f64) -> Result<(), LadderError>;

    fn get_match(&self, id: MatchId) -> Result<Match, LadderError>;
    fn get_matches(&self) -> Vec<Match>;
    fn create_match(
        &mut self,
        players: [PlayerId; 2],
        kind: MatchKind,
        created_at: DateTime<Utc>
    ) -> Result<Match, LadderError>;
    fn save_match(&mut self, game: &Match) -> Result<(), LadderError>;

    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, LadderError>;
    fn get_tournaments(&self) -> Result<Vec<Tournament>, LadderError>;
    fn tournament_of_match(&self, match_id: MatchId) -> Option<TournamentId>;
    fn create_tournament(&mut self, config: TournamentConfig) -> Result<Tournament, LadderError>;
    fn add_tournament_player(&mut self, id: TournamentId, player_id: PlayerId) -> Result<(), LadderError>;
    fn add_tournament_match(&mut self, id: TournamentId, match_id: MatchId) -> Result<(), LadderError>;
    fn save_tournament_progress(&mut self, id: TournamentId, progress: &TournamentProgress) -> Result<(), LadderError>;

    fn create_rating_change(&mut self, change: RatingChange);
    fn get_rating_changes(&self, match_id: MatchId) -> Vec<RatingChange>;
    fn clear_rating_changes(&mut self);
}
