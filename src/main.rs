use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tennis_markets::request_stats::{RequestLog, RequestStat, StatsSummary};
use tennis_markets::settings::Settings;
use tennis_markets::{BestOf, Markets, derive_markets, simulate_with, validate_point_rates};

#[derive(Debug, Parser)]
#[command(name = "tennis_markets", about = "Monte Carlo match, handicap and totals prices for tennis")]
struct Cli {
    /// Pretty-print the JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    /// Fixed seed for reproducible runs (overrides TENNIS_SEED).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a single match.
    Price(PriceArgs),
    /// Price every request in a JSON file and report request stats.
    Batch { path: PathBuf },
}

#[derive(Debug, Clone, Args, Deserialize)]
struct PriceArgs {
    /// A's point-win rate on serve.
    #[arg(long)]
    p1: f64,
    /// B's point-win rate on serve.
    #[arg(long)]
    p2: f64,
    #[arg(long = "best-of", default_value_t = 3)]
    #[serde(alias = "bestof")]
    best_of: u32,
    /// Matches to simulate; non-positive or missing uses TENNIS_SIMULATIONS.
    #[arg(long)]
    #[serde(default)]
    simulations: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BatchEntry {
    Priced(Box<Markets>),
    Failed { error: String },
}

#[derive(Debug, Serialize)]
struct BatchReport {
    results: Vec<BatchEntry>,
    stats: StatsSummary,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let settings = Settings::from_env();
    let pool = settings.build_pool();
    let log = RequestLog::with_capacity(settings.stats_capacity);

    let output = match &cli.command {
        Command::Price(args) => {
            let markets = with_pool(&pool, || price(args, cli.seed, &settings, &log))?;
            to_json(&markets, cli.pretty)?
        }
        Command::Batch { path } => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading batch file {}", path.display()))?;
            let requests: Vec<PriceArgs> =
                serde_json::from_str(&raw).context("parsing batch requests")?;

            let results = requests
                .iter()
                .map(|req| match with_pool(&pool, || price(req, cli.seed, &settings, &log)) {
                    Ok(markets) => BatchEntry::Priced(Box::new(markets)),
                    Err(err) => {
                        warn!(p1 = req.p1, p2 = req.p2, best_of = req.best_of, "request failed: {err:#}");
                        BatchEntry::Failed {
                            error: format!("{err:#}"),
                        }
                    }
                })
                .collect();
            let report = BatchReport {
                results,
                stats: log.summary(),
            };
            to_json(&report, cli.pretty)?
        }
    };

    println!("{output}");
    Ok(())
}

fn price(args: &PriceArgs, seed: Option<u64>, settings: &Settings, log: &RequestLog) -> Result<Markets> {
    let started = Instant::now();
    let config = settings.sim_config(args.simulations, seed);
    info!(
        p1 = args.p1,
        p2 = args.p2,
        best_of = args.best_of,
        simulations = config.samples,
        "received request"
    );

    let fail = |sim_ms: u64| {
        log.record(RequestStat::now(config.samples, sim_ms, elapsed_ms(started), false));
    };

    if let Err(err) = validate_point_rates(args.p1, args.p2) {
        fail(0);
        return Err(err.into());
    }
    let best_of = match BestOf::try_from(args.best_of) {
        Ok(best_of) => best_of,
        Err(err) => {
            fail(0);
            return Err(err.into());
        }
    };

    let sim_started = Instant::now();
    let matches = match simulate_with(args.p1, args.p2, args.best_of, &config) {
        Ok(matches) => matches,
        Err(err) => {
            fail(elapsed_ms(sim_started));
            return Err(err).context("simulation failed");
        }
    };
    let sim_ms = elapsed_ms(sim_started);

    let markets = derive_markets(&matches, best_of);
    info!(
        p1 = args.p1,
        p2 = args.p2,
        best_of = args.best_of,
        ml_a = markets.moneyline.prob_a,
        ml_b = markets.moneyline.prob_b,
        sim_ms,
        "priced match"
    );
    log.record(RequestStat::now(config.samples, sim_ms, elapsed_ms(started), true));
    Ok(markets)
}

fn with_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.context("encoding output")
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tennis_markets=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
