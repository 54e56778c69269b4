use serde::Serialize;
use tracing::{debug, info};

use crate::model::{
    bracket::{knockout_field, pair_field, Standings},
    constants::ELIMINATION_STEP,
    error::LadderError,
    schedule::generate_schedule,
    structures::{
        ids::{MatchId, PlayerId, TournamentId},
        match_kind::MatchKind,
        tournament::{Tournament, TournamentProgress}
    }
};

/// A game the store should create and attach to the tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewPairing {
    pub players: [PlayerId; 2],
    pub kind: MatchKind
}

/// Result of one state machine step. The core never writes anything itself;
/// the store persists `progress` and creates `new_games` in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentUpdate {
    pub tournament_id: TournamentId,
    pub progress: TournamentProgress,
    pub new_games: Vec<NewPairing>
}

impl TournamentUpdate {
    fn unchanged(tournament: &Tournament) -> TournamentUpdate {
        TournamentUpdate {
            tournament_id: tournament.id,
            progress: tournament.progress,
            new_games: Vec::new()
        }
    }

    pub fn is_finished(&self) -> bool {
        !self.progress.active
    }

    fn push_round(&mut self, pairs: Vec<(PlayerId, PlayerId)>, kind: MatchKind) {
        self.new_games.extend(pairs.into_iter().map(|(home, away)| NewPairing {
            players: [home, away],
            kind
        }));
    }
}

/// # Tournament progression
///
/// Round robin -> elimination -> finished. A tournament without round robin
/// goes straight to elimination; one without elimination finishes when the
/// round robin does.
///
/// Callers must not run two steps for the same tournament concurrently.
pub struct TournamentStateMachine;

impl TournamentStateMachine {
    /// Schedules the opening games.
    ///
    /// With a round robin phase this is the whole round robin schedule, built
    /// from the entrants in join order. Without one, the first elimination
    /// round is seeded from join order.
    pub fn start(tournament: &Tournament) -> Result<TournamentUpdate, LadderError> {
        if tournament.progress.started {
            return Err(LadderError::TournamentAlreadyStarted(tournament.id));
        }

        let config = &tournament.config;
        if config.has_elimination && config.elimination_field_size as usize > tournament.players.len() {
            return Err(LadderError::NotEnoughPlayers {
                field_size: config.elimination_field_size,
                players: tournament.players.len()
            });
        }

        let mut update = TournamentUpdate::unchanged(tournament);
        update.progress.started = true;

        if config.has_round_robin {
            let schedule = generate_schedule(&tournament.players, config.round_robin_rounds)?;
            update.push_round(schedule, MatchKind::RoundRobin);
        } else {
            update.progress.round_robin_finished = true;
            Self::advance_elimination(tournament, &mut update)?;
            Self::finish_if_done(&mut update);
        }

        info!(
            tournament_id = tournament.id,
            games = update.new_games.len(),
            "Tournament started"
        );

        Ok(update)
    }

    /// Runs after a tournament game has been completed.
    ///
    /// Nothing happens while other games of the tournament are still active.
    /// Once the last one is done the round robin is marked finished, the next
    /// elimination round is generated while the remaining field allows it,
    /// and the tournament is closed when no field is left.
    pub fn on_match_completed(tournament: &Tournament, match_id: MatchId) -> Result<TournamentUpdate, LadderError> {
        let game = tournament
            .game(match_id)
            .ok_or(LadderError::MatchNotInTournament {
                tournament_id: tournament.id,
                match_id
            })?;

        if !game.is_completed() {
            return Err(LadderError::MatchNotCompleted(match_id));
        }

        Self::check_invariants(tournament);

        let mut update = TournamentUpdate::unchanged(tournament);

        let still_active = tournament.active_games().filter(|g| g.id != match_id).count();
        if still_active > 0 {
            debug!(tournament_id = tournament.id, still_active, "Round still in progress");
            return Ok(update);
        }

        if !update.progress.round_robin_finished {
            info!(tournament_id = tournament.id, "Round robin finished");
            update.progress.round_robin_finished = true;
        }

        if tournament.config.has_elimination {
            Self::advance_elimination(tournament, &mut update)?;
        }

        Self::finish_if_done(&mut update);

        Ok(update)
    }

    /// Generates the next elimination round if the remaining field allows it.
    ///
    /// The first round is seeded from every game played so far. Later rounds
    /// only pair players who have not lost an elimination game. A round of a
    /// single game is the final and uses up the remaining field.
    fn advance_elimination(tournament: &Tournament, update: &mut TournamentUpdate) -> Result<(), LadderError> {
        let remaining = update.progress.elimination_field_size_remaining;
        if remaining < ELIMINATION_STEP {
            return Ok(());
        }

        let has_elimination_games = tournament.elimination_games().next().is_some();
        let (standings, field_size) = if has_elimination_games {
            let survivors = Standings::seeded(&tournament.players)
                .record(tournament.elimination_games())
                .survivors(tournament.elimination_games());
            let field_size = knockout_field(&survivors, remaining);
            (survivors, field_size)
        } else {
            (Standings::seeded(&tournament.players).record(&tournament.games), remaining)
        };

        if field_size < ELIMINATION_STEP {
            debug!(tournament_id = tournament.id, "Knockout already decided");
            update.progress.elimination_field_size_remaining = 0;
            return Ok(());
        }

        let pairs = pair_field(&standings, field_size)?;

        info!(
            tournament_id = tournament.id,
            field_size,
            games = pairs.len(),
            "Elimination round generated"
        );

        update.progress.elimination_field_size_remaining = if pairs.len() == 1 {
            0
        } else {
            remaining - ELIMINATION_STEP
        };
        update.push_round(pairs, MatchKind::Elimination);

        Ok(())
    }

    fn finish_if_done(update: &mut TournamentUpdate) {
        let progress = &mut update.progress;
        if progress.round_robin_finished && progress.elimination_field_size_remaining == 0 && progress.active {
            info!(tournament_id = update.tournament_id, "Tournament finished");
            progress.active = false;
        }
    }

    fn check_invariants(tournament: &Tournament) {
        let remaining = tournament.progress.elimination_field_size_remaining;

        assert!(
            remaining % ELIMINATION_STEP == 0,
            "Expected tournament {} to have an even remaining elimination field, found {}",
            tournament.id,
            remaining
        );
        assert!(
            remaining <= tournament.config.elimination_field_size,
            "Expected tournament {} remaining elimination field {} to be at most {}",
            tournament.id,
            remaining,
            tournament.config.elimination_field_size
        );
        assert!(
            tournament.progress.started,
            "Expected tournament {} to be started before its games complete",
            tournament.id
        );
    }
}
