use std::sync::Once;

use pingpong_ladder::{
    config::LeagueConfig,
    database::memory::MemoryStore,
    league::League,
    model::structures::{game::MatchOutcome, ids::TournamentId, tournament::TournamentConfig}
};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Registers `player1..=playerN` and a tournament they have all joined.
pub fn league_with_tournament(
    n: usize,
    config: TournamentConfig,
    league_config: LeagueConfig
) -> (League<MemoryStore>, TournamentId) {
    let mut league = pingpong_ladder::utils::test_utils::league_with_players(n, league_config);
    let tournament = league.create_tournament(config).unwrap();

    for player_id in 1..=n as i32 {
        league.join_tournament(tournament.id, player_id).unwrap();
    }

    (league, tournament.id)
}

/// Completes every active game of the tournament, the lower id winning, until
/// nothing is left to play. Returns the number of games played.
pub fn play_out_lowest_id_wins(league: &mut League<MemoryStore>, tournament_id: TournamentId) -> usize {
    let mut played = 0;

    while let Some(game) = league.tournament(tournament_id).unwrap().active_games().next().cloned() {
        let winner = game.players.iter().copied().min().unwrap();
        league.finish_match(game.id, MatchOutcome::winner(winner)).unwrap();
        played += 1;
    }

    played
}
