//! Command-line front end: loads a table, runs the search and prints the best expression.
//!
//! Run with: `cargo run --release -- --input table.txt`

use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sr_fol::operators::Operators;
use sr_fol::search::{search, SearchConfig};
use sr_fol::table::Assignment;

#[derive(Parser)]
#[command(name = "sr-fol")]
#[command(about = "Symbolic regression of propositional logic expressions")]
struct Args {
    /// Table file: one row per variable, the last row is the outcome
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Number of populations
    #[arg(long, default_value = "31")]
    populations: usize,

    /// Target size of every population
    #[arg(long, default_value = "27")]
    population_size: usize,

    /// Depth bound for generated expressions
    #[arg(long, default_value = "10")]
    max_depth: usize,

    /// Generation budget
    #[arg(long, default_value = "100")]
    generations: usize,

    /// Binary operators, comma or space separated, or `all`
    #[arg(long, default_value = "or,and")]
    binary_operators: String,

    /// Unary operators, comma or space separated, or `all`
    #[arg(long, default_value = "not")]
    unary_operators: String,

    /// Random seed (random if omitted)
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Log every population operation
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let table = Assignment::parse(File::open(&args.input)?)?;
    info!(
        "Loaded {:?}: {} variables, {} examples",
        args.input,
        table.variable_count(),
        table.len()
    );

    let operators = Operators::parse_lists(&args.binary_operators, &args.unary_operators)?;
    let config = SearchConfig::new(operators)
        .with_population_count(args.populations)
        .with_population_size(args.population_size)
        .with_max_depth(args.max_depth)
        .with_max_generations(args.generations);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Seed: {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let outcome = search(&table, &config, &mut rng)?;
    info!(
        "Score {:.2} after {} generations (size {}, depth {})",
        outcome.score,
        outcome.generations,
        outcome.expr.size(),
        outcome.expr.depth()
    );
    println!("{}", outcome.expr);

    Ok(())
}
