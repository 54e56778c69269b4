use rand::{seq::IndexedRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::LeagueConfig,
    database::{memory::MemoryStore, store::LeagueStore},
    league::League,
    model::{
        elo::expected_score,
        error::LadderError,
        leaderboard::LeaderboardEntry,
        structures::{
            game::{Match, MatchOutcome},
            ids::PlayerId,
            tournament::{Tournament, TournamentConfig}
        }
    },
    utils::progress_utils::progress_bar
};

const WINNING_SCORE: i32 = 11;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub players: usize,
    pub round_robin_rounds: u32,
    /// 0 disables the elimination phase
    pub elimination_field_size: u32,
    /// Casual games played before the tournament so ratings diverge
    pub warmup_games: usize,
    pub seed: u64
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            players: 8,
            round_robin_rounds: 7,
            elimination_field_size: 4,
            warmup_games: 32,
            seed: 42
        }
    }
}

impl SimulationConfig {
    fn tournament_config(&self) -> TournamentConfig {
        let name = format!("Simulated tournament #{}", self.seed);

        match (self.round_robin_rounds, self.elimination_field_size) {
            (0, field) => TournamentConfig::elimination(&name, field),
            (rounds, 0) => TournamentConfig::round_robin(&name, rounds),
            (rounds, field) => TournamentConfig::round_robin(&name, rounds).with_elimination(field)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub tournament: Tournament,
    pub standings: Vec<(PlayerId, u32)>,
    pub champion: Option<PlayerId>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub games_played: usize
}

/// Plays a game with the home player winning with their expected score.
fn play(rng: &mut ChaCha8Rng, home_rating: f64, away_rating: f64, game: &Match) -> MatchOutcome {
    let [home, away] = game.players;
    let losing_score = rng.random_range(0..WINNING_SCORE - 1);

    if rng.random_bool(expected_score(home_rating, away_rating)) {
        MatchOutcome::winner(home).with_scores(WINNING_SCORE, losing_score)
    } else {
        MatchOutcome::winner(away).with_scores(losing_score, WINNING_SCORE)
    }
}

fn play_out<S: LeagueStore>(league: &mut League<S>, rng: &mut ChaCha8Rng, game: &Match) -> Result<(), LadderError> {
    let home = league.player(game.players[0])?;
    let away = league.player(game.players[1])?;
    let outcome = play(rng, home.rating, away.rating, game);

    league.finish_match(game.id, outcome)?;
    Ok(())
}

/// Runs a complete tournament in a fresh in-memory league. The same seed
/// always produces the same tournament.
pub fn simulate(config: &SimulationConfig, league_config: LeagueConfig) -> Result<SimulationReport, LadderError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut league = League::new(MemoryStore::new(), league_config);

    let player_ids = (1..=config.players)
        .map(|i| league.register_player(&format!("player{}", i), None).map(|p| p.id))
        .collect::<Result<Vec<PlayerId>, LadderError>>()?;

    if player_ids.len() >= 2 {
        for _ in 0..config.warmup_games {
            let pair: Vec<PlayerId> = player_ids.choose_multiple(&mut rng, 2).copied().collect();
            let game = league.create_match(pair[0], pair[1])?;
            play_out(&mut league, &mut rng, &game)?;
        }
        debug!("Played {} warm-up games", config.warmup_games);
    }

    let tournament = league.create_tournament(config.tournament_config())?;
    for player_id in &player_ids {
        league.join_tournament(tournament.id, *player_id)?;
    }

    let mut tournament = league.start_tournament(tournament.id)?;
    let bar = progress_bar(tournament.games.len() as u64, "Simulating tournament".to_string());
    let mut games_played = 0;

    loop {
        let next = tournament.active_games().next().cloned();
        let Some(game) = next else { break };

        play_out(&mut league, &mut rng, &game)?;
        games_played += 1;

        tournament = league.tournament(tournament.id)?;
        bar.set_length(tournament.games.len() as u64);
        bar.inc(1);
    }
    bar.finish();

    let champion = tournament.champion();
    info!(
        tournament_id = tournament.id,
        "Simulation finished after {} games, champion: {:?}",
        games_played,
        champion
    );

    Ok(SimulationReport {
        standings: tournament.standings(),
        champion,
        leaderboard: league.leaderboard(),
        tournament,
        games_played
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structures::tournament::TournamentPhase;

    #[test]
    fn test_simulation_is_deterministic() {
        let config = SimulationConfig::default();

        let a = simulate(&config, LeagueConfig::default()).unwrap();
        let b = simulate(&config, LeagueConfig::default()).unwrap();

        assert_eq!(a.standings, b.standings);
        assert_eq!(a.champion, b.champion);
        let results = |r: &SimulationReport| {
            r.tournament
                .games
                .iter()
                .map(|g| (g.players, g.winner, g.home_score, g.away_score))
                .collect::<Vec<_>>()
        };
        assert_eq!(results(&a), results(&b));
    }

    #[test]
    fn test_round_robin_with_elimination() {
        let report = simulate(&SimulationConfig::default(), LeagueConfig::default()).unwrap();

        // 7 rounds of 4 games, then 2 semis and a final
        assert_eq!(report.games_played, 28 + 2 + 1);
        assert_eq!(report.tournament.phase(), TournamentPhase::Finished);

        let finalists = report.tournament.elimination_games().last().unwrap().players;
        assert!(finalists.contains(&report.champion.unwrap()));
        assert_eq!(report.leaderboard.len(), 8);
    }

    #[test]
    fn test_round_robin_only() {
        let config = SimulationConfig {
            players: 4,
            round_robin_rounds: 3,
            elimination_field_size: 0,
            warmup_games: 0,
            seed: 7
        };
        let report = simulate(&config, LeagueConfig::default()).unwrap();

        assert_eq!(report.games_played, 6);
        assert_eq!(report.champion, Some(report.standings[0].0));
    }

    #[test]
    fn test_elimination_only() {
        let config = SimulationConfig {
            players: 8,
            round_robin_rounds: 0,
            elimination_field_size: 8,
            warmup_games: 0,
            seed: 3
        };
        let report = simulate(&config, LeagueConfig::default()).unwrap();

        // Quarter finals, semi finals and the final
        assert_eq!(report.games_played, 4 + 2 + 1);
        assert_eq!(report.tournament.elimination_games().count(), 7);
        assert!(report.champion.is_some());
    }

    #[test]
    fn test_odd_player_count_fails() {
        let config = SimulationConfig {
            players: 5,
            ..SimulationConfig::default()
        };

        assert_eq!(
            simulate(&config, LeagueConfig::default()).unwrap_err(),
            LadderError::InvalidScheduleInput { participants: 5 }
        );
    }
}
