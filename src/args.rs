use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{config::parse_weighting, model::structures::rating_policy::TournamentRatingPolicy};

#[derive(Parser, Clone, Debug)]
#[command(
    name = "pingpong-ladder",
    about = "Table tennis league ratings and tournaments",
    long_about = "Tracks ELO ratings of a table tennis league and runs round robin / elimination tournaments"
)]
pub struct Args {
    /// League file, created on first write
    #[arg(short = 'f', long, env = "LEAGUE_FILE", default_value = "league.json")]
    pub league_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String,

    /// Overrides ELO_WEIGHTING
    #[arg(short, long, value_parser = weighting)]
    pub weighting: Option<f64>,

    /// Overrides TOURNAMENT_RATING_POLICY
    #[arg(short, long, value_parser = policy)]
    pub tournament_ratings: Option<TournamentRatingPolicy>,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Registers a new player with the default rating
    Register {
        username: String,
        #[arg(long)]
        full_name: Option<String>
    },
    /// Creates a casual game between two players
    Match { player_a: i32, player_b: i32 },
    /// Records the result of a game
    Finish {
        match_id: i32,
        #[arg(long)]
        winner: i32,
        #[arg(long, requires = "away_score")]
        home_score: Option<i32>,
        #[arg(long, requires = "home_score")]
        away_score: Option<i32>
    },
    /// Prints every player by rating
    Leaderboard,
    #[command(subcommand)]
    Tournament(TournamentCommand),
    /// Replays all rated games from default ratings
    Recalculate,
    /// Plays a seeded tournament in memory, without touching the league file
    Simulate {
        #[arg(long, default_value_t = 8)]
        players: usize,
        #[arg(long, default_value_t = 7)]
        rounds: u32,
        /// Elimination field size, 0 for none
        #[arg(long, default_value_t = 4)]
        elimination: u32,
        #[arg(long, default_value_t = 32)]
        warmup: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum TournamentCommand {
    Create {
        name: String,
        /// Round robin rounds, 0 for none
        #[arg(long, default_value_t = 0)]
        rounds: u32,
        /// Elimination field size, 0 for none
        #[arg(long, default_value_t = 0)]
        elimination: u32
    },
    Join { tournament_id: i32, player_id: i32 },
    Start { tournament_id: i32 },
    Show { tournament_id: i32 }
}

fn weighting(raw: &str) -> Result<f64, String> {
    parse_weighting(raw).map_err(|e| e.to_string())
}

fn policy(raw: &str) -> Result<TournamentRatingPolicy, String> {
    raw.parse::<TournamentRatingPolicy>()
        .map_err(|_| format!("expected `exclude` or `include`, got {:?}", raw))
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_finish() {
        let args = Args::try_parse_from([
            "pingpong-ladder",
            "--league-file",
            "club.json",
            "finish",
            "3",
            "--winner",
            "2",
            "--home-score",
            "9",
            "--away-score",
            "11"
        ])
        .unwrap();

        assert_eq!(args.league_file, PathBuf::from("club.json"));
        assert!(matches!(
            args.command,
            Command::Finish {
                match_id: 3,
                winner: 2,
                home_score: Some(9),
                away_score: Some(11)
            }
        ));
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "pingpong-ladder",
            "--weighting",
            "16",
            "--tournament-ratings",
            "include",
            "leaderboard"
        ])
        .unwrap();

        assert_eq!(args.weighting, Some(16.0));
        assert_eq!(args.tournament_ratings, Some(TournamentRatingPolicy::Include));
    }

    #[test]
    fn test_rejects_bad_weighting() {
        assert!(Args::try_parse_from(["pingpong-ladder", "--weighting", "0", "leaderboard"]).is_err());
        assert!(Args::try_parse_from(["pingpong-ladder", "finish", "1", "--winner", "1", "--home-score", "3"]).is_err());
    }
}
