use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;

use crate::model::{
    constants::ELIMINATION_STEP,
    error::LadderError,
    schedule::generate_schedule,
    structures::{game::Match, ids::PlayerId}
};

/// Win tally in seeding order.
///
/// Players keep the position they were first seen at, which is what breaks
/// ties between equal win counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Standings {
    wins: IndexMap<PlayerId, u32>
}

impl Standings {
    pub fn new() -> Standings {
        Standings::default()
    }

    /// Starts every entrant on zero wins, in the given order.
    pub fn seeded(entrants: &[PlayerId]) -> Standings {
        Standings {
            wins: entrants.iter().map(|id| (*id, 0)).collect()
        }
    }

    /// Counts the winners of `games`. Players not seen yet are appended in the
    /// order they appear.
    pub fn record<'a>(mut self, games: impl IntoIterator<Item = &'a Match>) -> Standings {
        for game in games {
            for player_id in game.players {
                self.wins.entry(player_id).or_insert(0);
            }

            if let Some(winner) = game.winner {
                *self.wins.entry(winner).or_insert(0) += 1;
            }
        }

        self
    }

    /// Keeps only the players still alive in a knockout: at least one win and
    /// no loss in `games`.
    pub fn survivors<'a>(mut self, games: impl IntoIterator<Item = &'a Match>) -> Standings {
        let knocked_out: HashSet<PlayerId> = games.into_iter().filter_map(|g| g.loser()).collect();
        self.wins
            .retain(|id, wins| *wins > 0 && !knocked_out.contains(id));

        self
    }

    pub fn wins(&self, player_id: PlayerId) -> u32 {
        self.wins.get(&player_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.wins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }

    /// Most wins first. The sort is stable, so ties keep seeding order.
    pub fn ranked(&self) -> Vec<(PlayerId, u32)> {
        self.wins
            .iter()
            .map(|(id, wins)| (*id, *wins))
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }

    pub fn top(&self, n: usize) -> Vec<PlayerId> {
        self.ranked().into_iter().take(n).map(|(id, _)| id).collect()
    }
}

/// Pairs the best `field_size` players of `prior_matches` for one elimination
/// round. Ties go to whoever appears first in `prior_matches`.
pub fn next_elimination_round<'a>(
    prior_matches: impl IntoIterator<Item = &'a Match>,
    field_size: u32
) -> Result<Vec<(PlayerId, PlayerId)>, LadderError> {
    pair_field(&Standings::new().record(prior_matches), field_size)
}

/// Like [`next_elimination_round`], but ties go to entrant order and players
/// without a game are still ranked.
pub fn next_elimination_round_seeded<'a>(
    entrants: &[PlayerId],
    prior_matches: impl IntoIterator<Item = &'a Match>,
    field_size: u32
) -> Result<Vec<(PlayerId, PlayerId)>, LadderError> {
    pair_field(&Standings::seeded(entrants).record(prior_matches), field_size)
}

/// Pairs the players who have not been knocked out of `elimination_games`.
///
/// Only winners without an elimination loss go through, ties in entrant
/// order. When fewer than `field_size` survive, the field shrinks to the
/// largest even number of survivors.
pub fn next_knockout_round<'a>(
    entrants: &[PlayerId],
    elimination_games: impl IntoIterator<Item = &'a Match>,
    field_size: u32
) -> Result<Vec<(PlayerId, PlayerId)>, LadderError> {
    let games = elimination_games.into_iter().collect_vec();
    let survivors = Standings::seeded(entrants)
        .record(games.iter().copied())
        .survivors(games.iter().copied());

    pair_field(&survivors, knockout_field(&survivors, field_size))
}

/// Field size of the next knockout round, 0 once fewer than two players survive.
pub fn knockout_field(survivors: &Standings, field_size: u32) -> u32 {
    let alive = survivors.len() as u32 / ELIMINATION_STEP * ELIMINATION_STEP;
    field_size.min(alive)
}

pub(crate) fn pair_field(standings: &Standings, field_size: u32) -> Result<Vec<(PlayerId, PlayerId)>, LadderError> {
    if field_size < ELIMINATION_STEP || field_size % ELIMINATION_STEP != 0 {
        return Err(LadderError::InvalidScheduleInput {
            participants: field_size as usize
        });
    }

    if standings.len() < field_size as usize {
        return Err(LadderError::NotEnoughPlayers {
            field_size,
            players: standings.len()
        });
    }

    generate_schedule(&standings.top(field_size as usize), 1)
}
