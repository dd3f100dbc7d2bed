use clap::Parser;
use env_logger::Env;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;

use rayon::prelude::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

use titanfisher::deck::{default_decklist, Decklist};
use titanfisher::search::meter::SearchLimits;
use titanfisher::search::{meter, simulate_with, Summary};

#[macro_use]
extern crate log;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of opening hands to simulate
    #[clap(short, long, value_parser, default_value_t = 10)]
    games: usize,

    /// Deepest turn to search before giving up on a hand
    #[clap(short, long, value_parser, default_value_t = 4)]
    max_turns: u32,

    /// Path to a custom decklist file
    #[clap(short, long)]
    decklist: Option<String>,

    /// Append one JSON result record per trial to this file
    #[clap(short, long)]
    output: Option<String>,

    /// Seed for reproducible shuffles
    #[clap(short, long)]
    seed: Option<u64>,

    /// States created before a search gives up as an overflow
    #[clap(long, value_parser, default_value_t = 200_000)]
    max_states: u64,

    /// Wall-clock seconds before a search gives up as an overflow
    #[clap(long, value_parser, default_value_t = 60)]
    max_seconds: u64,

    /// Print search debug output, including winning traces (slow)
    #[clap(short, long, action)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Args::parse();
    init_logger(cli.verbose);

    let decklist: Decklist = match &cli.decklist {
        Some(path) => fs::read_to_string(path)?.parse()?,
        None => default_decklist(),
    };
    decklist.apply_options();

    let deck_name = match &cli.decklist {
        Some(path) => path.clone(),
        None => "amulet-titan".to_string(),
    };
    let base_seed = cli.seed.unwrap_or_else(rand::random);
    let limits = SearchLimits {
        max_states: cli.max_states,
        max_millis: cli.max_seconds as u128 * 1000,
    };

    info!(
        "simulating {games} hands of {deck_name} to turn {turns} (seed {base_seed})",
        games = cli.games,
        turns = cli.max_turns,
    );

    let results: Vec<_> = (0..cli.games)
        .into_par_iter()
        .map(|trial| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(trial as u64));
            match simulate_with(&decklist, &mut rng, cli.max_turns, limits) {
                Ok(outcome) => {
                    info!(
                        "{trial:<5} {deck_name:<12} {headline} ({performance})",
                        headline = outcome.summary.headline(),
                        performance = meter::performance(),
                    );
                    if let Some(trace) = outcome.trace() {
                        debug!("winning line:{trace}");
                    }
                    Ok(outcome.summary)
                }
                Err(err) => {
                    error!("{trial:<5} {deck_name:<12} aborted: {err}");
                    Err(err.to_string())
                }
            }
        })
        .collect();

    report(&results, cli.games);

    if let Some(path) = &cli.output {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut saved = 0;
        for summary in results.iter().flatten() {
            writeln!(file, "{}", serde_json::to_string(summary)?)?;
            saved += 1;
        }
        info!("appended {saved} records to {path}");
    }

    Ok(())
}

fn report(results: &[Result<Summary, String>], simulated_games: usize) {
    let mut win_statistics: HashMap<u32, usize> = HashMap::new();
    let mut overflows = 0;
    let mut failures = 0;
    let mut aborted = 0;

    for result in results {
        match result {
            Ok(summary) => match summary.win_turn() {
                Some(turn) => *win_statistics.entry(turn).or_insert(0) += 1,
                None if summary.overflowed() => overflows += 1,
                None => failures += 1,
            },
            Err(_) => aborted += 1,
        }
    }

    let mut wins_by_turn = win_statistics.iter().collect::<Vec<_>>();
    wins_by_turn.sort();

    info!("=======================[ RESULTS ]==========================");
    info!("         Goal reached per turn after {simulated_games} hands:");
    info!("============================================================");

    let mut cumulative = 0.0;
    for (turn, wins) in wins_by_turn {
        let win_percentage = 100.0 * *wins as f32 / simulated_games as f32;
        cumulative += win_percentage;
        info!("Turn {turn:002}: {wins} wins ({win_percentage:.1}%) - cumulative {cumulative:.1}%");
    }
    info!("No solution: {failures}, overflows: {overflows}, aborted: {aborted}");
}

fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(
        Env::default()
            .filter_or("LOG_LEVEL", default_level)
            .write_style_or("LOG_STYLE", "always"),
    )
    .format_timestamp(None)
    .format_module_path(false)
    .init();
}
