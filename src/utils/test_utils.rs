use std::path::PathBuf;

use chrono::{Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{
    config::LeagueConfig,
    database::memory::MemoryStore,
    league::League,
    model::structures::{
        game::{Match, MatchOutcome},
        ids::{MatchId, PlayerId, TournamentId},
        match_kind::MatchKind,
        participant::Participant,
        tournament::{Tournament, TournamentConfig}
    }
};

/// A league file path under the system temp dir, unique per test name and process.
pub fn temp_league_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("pingpong_ladder_{}_{}.json", name, std::process::id()))
}

/// Participants `1..=n` with ratings spread around the default.
pub fn generate_participants(n: usize) -> Vec<Participant> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    (1..=n)
        .map(|i| {
            let mut participant = Participant::new(i as PlayerId, &format!("player{}", i), None);
            participant.rating = (participant.rating + rng.random_range(-300.0..=300.0)).round();
            participant
        })
        .collect()
}

/// A league with `n` registered players, ids `1..=n`, usernames `player{id}`.
pub fn league_with_players(n: usize, config: LeagueConfig) -> League<MemoryStore> {
    let mut league = League::new(MemoryStore::new(), config);

    for i in 1..=n {
        if let Err(e) = league.register_player(&format!("player{}", i), None) {
            panic!("Failed to register player{}: {}", i, e);
        }
    }

    league
}

/// A completed game. Completion times increase with the id so replays keep order.
pub fn generate_completed_match(id: MatchId, players: [PlayerId; 2], kind: MatchKind, winner: PlayerId) -> Match {
    let created_at = Utc::now() - Duration::hours(1);
    let mut game = Match::new(id, players, kind, created_at).unwrap();

    game.complete(
        &MatchOutcome::winner(winner),
        created_at + Duration::seconds(id as i64)
    )
    .unwrap();

    game
}

/// A tournament that has not started, with `players` already joined.
pub fn generate_tournament(id: TournamentId, config: TournamentConfig, players: &[PlayerId]) -> Tournament {
    let mut tournament = Tournament::new(id, config).unwrap();
    tournament.players = players.to_vec();

    tournament
}
