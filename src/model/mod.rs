//! The tournament and ranking engine.
//!
//! Everything in here is pure: functions take in-memory entities and return
//! new ratings, pairings or progress values. Persisting them is up to the
//! caller (see [`crate::league`]).

pub mod bracket;
pub mod constants;
pub mod elo;
pub mod error;
pub mod leaderboard;
pub mod schedule;
pub mod state_machine;
pub mod structures;

pub use bracket::{next_elimination_round, next_elimination_round_seeded, next_knockout_round, Standings};
pub use elo::{apply_result, expected_score, RatingEngine};
pub use error::LadderError;
pub use schedule::generate_schedule;
pub use state_machine::{NewPairing, TournamentStateMachine, TournamentUpdate};
