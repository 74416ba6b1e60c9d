use std::time::Instant;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::bail;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sopp_rs::function::FunctionPlus;
use sopp_rs::sopp::Sopp;
use sopp_rs::synthesis::{Strategy, SynthesisConfig, Synthesizer};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Kind {
    /// Synthesize a sop-plus form of one random function and print it.
    Sopp,
    /// Time sop-plus synthesis over many random functions.
    SoppTime,
    /// Synthesize a disjoint sop-plus form of one random function and print it.
    Dsopp,
    /// Time disjoint synthesis over many random functions.
    DsoppTime,
}

impl Kind {
    fn is_disjoint(self) -> bool {
        matches!(self, Kind::Dsopp | Kind::DsoppTime)
    }
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// What to run.
    #[arg(value_enum, default_value = "sopp")]
    kind: Kind,

    /// Number of variables.
    #[arg(short = 'n', long, value_name = "INT", default_value = "4")]
    variables: usize,

    /// Largest output value.
    #[arg(short, long, value_name = "INT", default_value = "10")]
    max_value: u32,

    /// Chance (in percent) of a point being non-zero.
    #[arg(short, long, value_name = "PERCENT", default_value = "50")]
    chance: u32,

    /// Chance (in percent) of a zero point becoming don't-care.
    #[arg(long, value_name = "PERCENT", default_value = "0")]
    dont_care: u32,

    /// Number of functions for the timing kinds.
    #[arg(long, value_name = "INT", default_value = "100")]
    runs: usize,

    /// Random seed.
    #[arg(long, value_name = "INT", default_value = "42")]
    seed: u64,

    /// Compute prime implicants once instead of after every round.
    #[arg(long)]
    experimental: bool,
}

fn synthesize(synthesizer: &Synthesizer, f: &FunctionPlus, disjoint: bool) -> color_eyre::Result<Sopp> {
    let s = if disjoint {
        synthesizer.dsopp(f)?
    } else {
        synthesizer.sopp(f)?
    };
    let valid = if disjoint {
        s.is_valid_exact_form_of(f)
    } else {
        s.is_valid_upper_bound_form_of(f)
    };
    if !valid {
        bail!("synthesized form {} is not valid for\n{}", s, f);
    }
    Ok(s)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let strategy = if args.experimental {
        Strategy::Experimental
    } else {
        Strategy::Canonical
    };
    let synthesizer = Synthesizer::new(SynthesisConfig::default().with_strategy(strategy));
    println!("config = {:?}", synthesizer.config());

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut random = || {
        FunctionPlus::random_with_dont_cares(args.variables, args.max_value, args.chance, args.dont_care, &mut rng)
    };
    let disjoint = args.kind.is_disjoint();

    match args.kind {
        Kind::Sopp | Kind::Dsopp => {
            let f = random()?;
            println!("f =\n{}", f);
            let s = synthesize(&synthesizer, &f, disjoint)?;
            println!("{} products, weight sum {}", s.len(), s.weight_sum());
            println!("s = {}", s);
        }
        Kind::SoppTime | Kind::DsoppTime => {
            let mut products = 0usize;
            let mut weight = 0u64;
            let mut elapsed = 0.0;
            for _ in 0..args.runs {
                let f = random()?;
                let start = Instant::now();
                let s = synthesize(&synthesizer, &f, disjoint)?;
                elapsed += start.elapsed().as_secs_f64();
                products += s.len();
                weight += s.weight_sum();
            }
            let runs = args.runs.max(1) as f64;
            println!(
                "{} runs: {:.3} ms per function, {:.2} products, {:.2} weight sum on average",
                args.runs,
                elapsed * 1000.0 / runs,
                products as f64 / runs,
                weight as f64 / runs
            );
        }
    }

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
