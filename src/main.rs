use clap::Parser;
use dotenv::dotenv;
use pingpong_ladder::{
    args::{Args, Command, TournamentCommand},
    config::{ConfigError, LeagueConfig},
    database::{memory::MemoryStore, store::StoreError},
    league::League,
    model::{
        error::LadderError,
        leaderboard::LeaderboardEntry,
        structures::{game::MatchOutcome, tournament::TournamentConfig}
    },
    simulation::{simulate, SimulationConfig}
};
use thiserror::Error;
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Ladder(#[from] LadderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to print result: {0}")]
    Output(#[from] serde_json::Error)
}

fn main() {
    dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log_level);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn league_config(args: &Args) -> Result<LeagueConfig, ConfigError> {
    let mut config = LeagueConfig::from_env()?;

    if let Some(weighting) = args.weighting {
        config.weighting = weighting;
    }
    if let Some(policy) = args.tournament_ratings {
        config.tournament_rating_policy = policy;
    }

    Ok(config)
}

fn print_leaderboard(entries: &[LeaderboardEntry]) {
    for entry in entries {
        println!(
            "{:>4}. {:<24} {:>8.2} ({:.1}%)",
            entry.rank, entry.name, entry.rating, entry.percentile
        );
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = league_config(&args)?;
    info!(
        "Weighting {}, tournament ratings: {}",
        config.weighting, config.tournament_rating_policy
    );

    if let Command::Simulate {
        players,
        rounds,
        elimination,
        warmup,
        seed
    } = args.command
    {
        let simulation = SimulationConfig {
            players,
            round_robin_rounds: rounds,
            elimination_field_size: elimination,
            warmup_games: warmup,
            seed
        };
        let report = simulate(&simulation, config)?;

        for (player_id, wins) in &report.standings {
            println!("player{:<4} {} wins", player_id, wins);
        }
        match report.champion {
            Some(champion) => println!("Champion: player{}", champion),
            None => println!("No champion")
        }
        print_leaderboard(&report.leaderboard);

        return Ok(());
    }

    let store = MemoryStore::load(&args.league_file)?;
    let mut league = League::new(store, config);

    match args.command {
        Command::Register { username, full_name } => {
            let participant = league.register_player(&username, full_name.as_deref())?;
            println!("Registered {} as player {}", participant, participant.id);
        }
        Command::Match { player_a, player_b } => {
            let game = league.create_match(player_a, player_b)?;
            println!("Created game {}", game.id);
        }
        Command::Finish {
            match_id,
            winner,
            home_score,
            away_score
        } => {
            let mut outcome = MatchOutcome::winner(winner);
            if let (Some(home), Some(away)) = (home_score, away_score) {
                outcome = outcome.with_scores(home, away);
            }

            let report = league.finish_match(match_id, outcome)?;
            println!("{}", report.game);
            for change in &report.rating_changes {
                println!("  player {}: {}", change.player_id, change);
            }
            for game in &report.new_games {
                println!("  scheduled game {}: {} vs {}", game.id, game.players[0], game.players[1]);
            }
        }
        Command::Leaderboard => print_leaderboard(&league.leaderboard()),
        Command::Tournament(command) => match command {
            TournamentCommand::Create {
                name,
                rounds,
                elimination
            } => {
                let config = TournamentConfig {
                    name,
                    has_round_robin: rounds > 0,
                    round_robin_rounds: rounds,
                    has_elimination: elimination > 0,
                    elimination_field_size: elimination
                };
                let tournament = league.create_tournament(config)?;
                println!("Created tournament {}", tournament.id);
            }
            TournamentCommand::Join {
                tournament_id,
                player_id
            } => league.join_tournament(tournament_id, player_id)?,
            TournamentCommand::Start { tournament_id } => {
                let tournament = league.start_tournament(tournament_id)?;
                println!("Scheduled {} games", tournament.games.len());
            }
            TournamentCommand::Show { tournament_id } => {
                let tournament = league.tournament(tournament_id)?;
                println!("{}", serde_json::to_string_pretty(&tournament)?);
                println!("Phase: {}", tournament.phase());
                if let Some(champion) = tournament.champion() {
                    println!("Champion: {}", league.player(champion)?);
                }
            }
        },
        Command::Recalculate => {
            let replayed = league.recalculate_ratings()?;
            println!("Replayed {} games", replayed);
        }
        Command::Simulate { .. } => unreachable!("handled above")
    }

    league.into_store().save(&args.league_file)?;
    Ok(())
}
