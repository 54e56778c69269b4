use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::store::{LeagueStore, StoreError};
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

/// Tournament row. Entrants and games are linked by id and resolved on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TournamentRecord {
    id: TournamentId,
    config: TournamentConfig,
    progress: TournamentProgress,
    players: Vec<PlayerId>,
    match_ids: Vec<MatchId>
}

/// In-memory league, persisted as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    participants: IndexMap<PlayerId, Participant>,
    matches: IndexMap<MatchId, Match>,
    tournaments: IndexMap<TournamentId, TournamentRecord>,
    rating_changes: Vec<RatingChange>
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Reads a league file. A missing file is an empty league.
    pub fn load(path: &Path) -> Result<MemoryStore, StoreError> {
        if !path.exists() {
            info!("No league file at {}, starting empty", path.display());
            return Ok(MemoryStore::new());
        }

        let contents = fs::read_to_string(path)?;
        let store: MemoryStore = serde_json::from_str(&contents)?;

        info!(
            "Loaded {} players, {} games and {} tournaments",
            store.participants.len(),
            store.matches.len(),
            store.tournaments.len()
        );

        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        info!("League saved to {}", path.display());
        Ok(())
    }

    fn record(&self, id: TournamentId) -> Result<&TournamentRecord, LadderError> {
        self.tournaments.get(&id).ok_or(LadderError::UnknownTournament(id))
    }

    fn record_mut(&mut self, id: TournamentId) -> Result<&mut TournamentRecord, LadderError> {
        self.tournaments
            .get_mut(&id)
            .ok_or(LadderError::UnknownTournament(id))
    }

    /// Resolves a tournament row. A linked game missing from the file is an
    /// `UnknownMatch`.
    fn assemble(&self, record: &TournamentRecord) -> Result<Tournament, LadderError> {
        let games = record
            .match_ids
            .iter()
            .map(|id| self.matches.get(id).cloned().ok_or(LadderError::UnknownMatch(*id)))
            .collect::<Result<Vec<Match>, LadderError>>()?;

        Ok(Tournament {
            id: record.id,
            config: record.config.clone(),
            progress: record.progress,
            players: record.players.clone(),
            games
        })
    }
}

impl LeagueStore for MemoryStore {
    fn get_participant(&self, id: PlayerId) -> Result<Participant, LadderError> {
        self.participants
            .get(&id)
            .cloned()
            .ok_or(LadderError::UnknownParticipant(id))
    }

    fn get_participants(&self) -> Vec<Participant> {
        self.participants.values().cloned().collect()
    }

    fn find_participant(&self, username: &str) -> Option<Participant> {
        self.participants
            .values()
            .find(|p| p.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    fn create_participant(&mut self, username: &str, full_name: Option<&str>) -> Participant {
        let id = self.participants.len() as PlayerId + 1;
        let participant = Participant::new(id, username, full_name);

        self.participants.insert(id, participant.clone());
        participant
    }

    fn save_rating(&mut self, id: PlayerId, rating: f64) -> Result<(), LadderError> {
        let participant = self
            .participants
            .get_mut(&id)
            .ok_or(LadderError::UnknownParticipant(id))?;

        participant.rating = rating;
        Ok(())
    }

    fn get_match(&self, id: MatchId) -> Result<Match, LadderError> {
        self.matches.get(&id).cloned().ok_or(LadderError::UnknownMatch(id))
    }

    fn get_matches(&self) -> Vec<Match> {
        self.matches.values().cloned().collect()
    }

    fn create_match(
        &mut self,
        players: [PlayerId; 2],
        kind: MatchKind,
        created_at: DateTime<Utc>
    ) -> Result<Match, LadderError> {
        for player_id in players {
            if !self.participants.contains_key(&player_id) {
                return Err(LadderError::UnknownParticipant(player_id));
            }
        }

        let id = self.matches.len() as MatchId + 1;
        let game = Match::new(id, players, kind, created_at)?;

        self.matches.insert(id, game.clone());
        Ok(game)
    }

    fn save_match(&mut self, game: &Match) -> Result<(), LadderError> {
        let stored = self
            .matches
            .get_mut(&game.id)
            .ok_or(LadderError::UnknownMatch(game.id))?;

        *stored = game.clone();
        Ok(())
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Tournament, LadderError> {
        self.assemble(self.record(id)?)
    }

    fn get_tournaments(&self) -> Result<Vec<Tournament>, LadderError> {
        self.tournaments.values().map(|r| self.assemble(r)).collect()
    }

    fn tournament_of_match(&self, match_id: MatchId) -> Option<TournamentId> {
        self.tournaments
            .values()
            .find(|r| r.match_ids.contains(&match_id))
            .map(|r| r.id)
    }

    fn create_tournament(&mut self, config: TournamentConfig) -> Result<Tournament, LadderError> {
        let id = self.tournaments.len() as TournamentId + 1;
        let tournament = Tournament::new(id, config)?;

        self.tournaments.insert(
            id,
            TournamentRecord {
                id,
                config: tournament.config.clone(),
                progress: tournament.progress,
                players: Vec::new(),
                match_ids: Vec::new()
            }
        );

        Ok(tournament)
    }

    fn add_tournament_player(&mut self, id: TournamentId, player_id: PlayerId) -> Result<(), LadderError> {
        if !self.participants.contains_key(&player_id) {
            return Err(LadderError::UnknownParticipant(player_id));
        }

        self.record_mut(id)?.players.push(player_id);
        Ok(())
    }

    fn add_tournament_match(&mut self, id: TournamentId, match_id: MatchId) -> Result<(), LadderError> {
        if !self.matches.contains_key(&match_id) {
            return Err(LadderError::UnknownMatch(match_id));
        }

        self.record_mut(id)?.match_ids.push(match_id);
        Ok(())
    }

    fn save_tournament_progress(&mut self, id: TournamentId, progress: &TournamentProgress) -> Result<(), LadderError> {
        self.record_mut(id)?.progress = *progress;
        Ok(())
    }

    fn create_rating_change(&mut self, change: RatingChange) {
        self.rating_changes.push(change);
    }

    fn get_rating_changes(&self, match_id: MatchId) -> Vec<RatingChange> {
        self.rating_changes
            .iter()
            .filter(|c| c.match_id == match_id)
            .cloned()
            .collect()
    }

    fn clear_rating_changes(&mut self) {
        self.rating_changes.clear();
    }
}
