use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::LeagueConfig,
    database::store::LeagueStore,
    model::{
        constants::DEFAULT_RATING,
        elo::RatingEngine,
        error::LadderError,
        leaderboard::{leaderboard, LeaderboardEntry},
        state_machine::{TournamentStateMachine, TournamentUpdate},
        structures::{
            game::{Match, MatchOutcome},
            ids::{MatchId, PlayerId, TournamentId},
            match_kind::MatchKind,
            participant::Participant,
            rating_change::RatingChange,
            tournament::{Tournament, TournamentConfig}
        }
    },
    utils::progress_utils::progress_bar
};

/// Everything that happened because a game was finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub game: Match,
    /// Empty when the game was not rated
    pub rating_changes: Vec<RatingChange>,
    pub tournament_update: Option<TournamentUpdate>,
    /// Games created by the tournament step, in creation order
    pub new_games: Vec<Match>
}

/// The league's request handlers: runs the engine against a store and
/// persists whatever it returns.
///
/// All mutations take `&mut self`, so a single `League` never runs two
/// tournament steps at once.
pub struct League<S: LeagueStore> {
    store: S,
    config: LeagueConfig
}

impl<S: LeagueStore> League<S> {
    pub fn new(store: S, config: LeagueConfig) -> League<S> {
        League { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    fn engine(&self) -> RatingEngine {
        RatingEngine::new(self.config.weighting)
    }

    fn is_rated(&self, game: &Match) -> bool {
        !game.is_tournament || self.config.tournament_rating_policy.rates_tournament_games()
    }

    /// Post-registration hook: every new account gets a participant with the
    /// default rating.
    pub fn register_player(&mut self, username: &str, full_name: Option<&str>) -> Result<Participant, LadderError> {
        let username = username.trim();
        if self.store.find_participant(username).is_some() {
            return Err(LadderError::DuplicateUsername(username.to_string()));
        }

        let participant = self.store.create_participant(username, full_name);
        info!(player_id = participant.id, "Registered {}", participant);

        Ok(participant)
    }

    pub fn player(&self, id: PlayerId) -> Result<Participant, LadderError> {
        self.store.get_participant(id)
    }

    /// Creates a casual game between two different players.
    pub fn create_match(&mut self, player_a: PlayerId, player_b: PlayerId) -> Result<Match, LadderError> {
        let game = self
            .store
            .create_match([player_a, player_b], MatchKind::Casual, Utc::now())?;

        debug!(match_id = game.id, "Created casual game {} vs {}", player_a, player_b);
        Ok(game)
    }

    pub fn game(&self, id: MatchId) -> Result<Match, LadderError> {
        self.store.get_match(id)
    }

    /// # Finishing a game
    ///
    /// 1. Validate and record the result. Invalid results leave the game untouched.
    /// 2. Update both ratings if the game is rated under the current policy.
    /// 3. For tournament games, run the state machine and persist its update.
    pub fn finish_match(&mut self, match_id: MatchId, outcome: MatchOutcome) -> Result<MatchReport, LadderError> {
        let now = Utc::now();
        let mut game = self.store.get_match(match_id)?;

        game.complete(&outcome, now)?;
        self.store.save_match(&game)?;
        info!(match_id, "{}", game);

        let rating_changes = if self.is_rated(&game) {
            self.rate(&game, now)?
        } else {
            Vec::new()
        };

        let mut report = MatchReport {
            game,
            rating_changes,
            tournament_update: None,
            new_games: Vec::new()
        };

        if !report.game.is_tournament {
            return Ok(report);
        }

        match self.store.tournament_of_match(match_id) {
            Some(tournament_id) => {
                let tournament = self.store.get_tournament(tournament_id)?;
                let update = TournamentStateMachine::on_match_completed(&tournament, match_id)?;

                report.new_games = self.apply_tournament_update(&update, now)?;
                report.tournament_update = Some(update);
            }
            None => warn!(match_id, "Tournament game is not attached to any tournament")
        }

        Ok(report)
    }

    /// Runs the ELO update for a completed game and records one change per player.
    fn rate(&mut self, game: &Match, timestamp: DateTime<Utc>) -> Result<Vec<RatingChange>, LadderError> {
        let winner_id = game.winner.ok_or(LadderError::MatchNotCompleted(game.id))?;
        let loser_id = game.loser().ok_or(LadderError::MatchNotCompleted(game.id))?;

        let winner = self.store.get_participant(winner_id)?;
        let loser = self.store.get_participant(loser_id)?;
        let changes = self.engine().rate(game, &winner, &loser, timestamp)?;

        for change in &changes {
            self.store.save_rating(change.player_id, change.rating_after)?;
            self.store.create_rating_change(change.clone());
        }

        debug!(
            match_id = game.id,
            "Rated {} ({}) and {} ({})",
            winner,
            changes[0],
            loser,
            changes[1]
        );

        Ok(changes.to_vec())
    }

    pub fn rating_changes(&self, match_id: MatchId) -> Vec<RatingChange> {
        self.store.get_rating_changes(match_id)
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        leaderboard(&self.store.get_participants())
    }

    /// Resets every rating and replays all rated games in the order they were
    /// completed. Returns the number of games replayed.
    pub fn recalculate_ratings(&mut self) -> Result<usize, LadderError> {
        for participant in self.store.get_participants() {
            self.store.save_rating(participant.id, DEFAULT_RATING)?;
        }
        self.store.clear_rating_changes();

        let games = self
            .store
            .get_matches()
            .into_iter()
            .filter(|g| g.is_completed() && self.is_rated(g))
            .sorted_by_key(|g| (g.completed_at, g.id))
            .collect_vec();

        let bar = progress_bar(games.len() as u64, "Recalculating ratings".to_string());
        for game in &games {
            let timestamp = game.completed_at.unwrap_or(game.created_at);
            self.rate(game, timestamp)?;
            bar.inc(1);
        }
        bar.finish();

        info!("Replayed {} rated games", games.len());
        Ok(games.len())
    }

    pub fn create_tournament(&mut self, config: TournamentConfig) -> Result<Tournament, LadderError> {
        let tournament = self.store.create_tournament(config)?;
        info!(tournament_id = tournament.id, "Created tournament {}", tournament.config.name);

        Ok(tournament)
    }

    pub fn tournament(&self, id: TournamentId) -> Result<Tournament, LadderError> {
        self.store.get_tournament(id)
    }

    pub fn tournaments(&self) -> Result<Vec<Tournament>, LadderError> {
        self.store.get_tournaments()
    }

    /// Entrants can only join before the first games are scheduled.
    pub fn join_tournament(&mut self, tournament_id: TournamentId, player_id: PlayerId) -> Result<(), LadderError> {
        let tournament = self.store.get_tournament(tournament_id)?;
        self.store.get_participant(player_id)?;

        if tournament.progress.started {
            return Err(LadderError::TournamentAlreadyStarted(tournament_id));
        }

        if tournament.players.contains(&player_id) {
            return Err(LadderError::AlreadyJoined {
                tournament_id,
                player_id
            });
        }

        self.store.add_tournament_player(tournament_id, player_id)?;
        debug!(tournament_id, player_id, "Player joined");

        Ok(())
    }

    pub fn start_tournament(&mut self, tournament_id: TournamentId) -> Result<Tournament, LadderError> {
        let tournament = self.store.get_tournament(tournament_id)?;
        let update = TournamentStateMachine::start(&tournament)?;

        self.apply_tournament_update(&update, Utc::now())?;
        self.store.get_tournament(tournament_id)
    }

    fn apply_tournament_update(
        &mut self,
        update: &TournamentUpdate,
        created_at: DateTime<Utc>
    ) -> Result<Vec<Match>, LadderError> {
        let mut created = Vec::with_capacity(update.new_games.len());

        for pairing in &update.new_games {
            let game = self.store.create_match(pairing.players, pairing.kind, created_at)?;
            self.store.add_tournament_match(update.tournament_id, game.id)?;
            created.push(game);
        }

        self.store
            .save_tournament_progress(update.tournament_id, &update.progress)?;

        Ok(created)
    }
}
