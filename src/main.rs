use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sortfit::config::Config;
use sortfit::engine::EstimationResult;
use sortfit::event::{EstimationEvent, EstimationWorker};
use sortfit::generator::SortAlgorithm;
use sortfit::report;

#[derive(Parser)]
#[command(
    name = "sortfit",
    version,
    about = "Benchmark shell sort, fit T(n) = a*n^1.5 + b*n + c and extrapolate"
)]
struct Cli {
    #[arg(short, long, help = "Config file (default: <config dir>/sortfit/config.toml)")]
    config: Option<PathBuf>,

    #[arg(short = 'k', long, help = "Number of size buckets")]
    buckets: Option<usize>,

    #[arg(short = 'l', long, help = "Timed trials per bucket")]
    trials: Option<usize>,

    #[arg(long, help = "Input size of the first bucket")]
    initial_size: Option<usize>,

    #[arg(long, help = "Size increment between buckets")]
    step: Option<usize>,

    #[arg(long, help = "Points sampled along the fitted curve")]
    curve_points: Option<usize>,

    #[arg(long, help = "Seed for reproducible inputs")]
    seed: Option<u64>,

    #[arg(long, help = "Sort algorithm (shell, hibbard)")]
    sort: Option<SortAlgorithm>,

    #[arg(long, help = "Print the result as JSON")]
    json: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(buckets) = self.buckets {
            config.bucket_count = buckets;
        }
        if let Some(trials) = self.trials {
            config.trials_per_bucket = trials;
        }
        if let Some(size) = self.initial_size {
            config.initial_size = size;
        }
        if let Some(step) = self.step {
            config.size_step = step;
        }
        if let Some(points) = self.curve_points {
            config.curve_points = points;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate().context("refusing to start estimation")?;

    info!(
        buckets = config.bucket_count,
        trials = config.trials_per_bucket,
        sort = config.sort.as_str(),
        "starting estimation"
    );

    let worker = EstimationWorker::spawn(config);
    let result = follow_progress(&worker, cli.json)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }

    Ok(())
}

fn follow_progress(worker: &EstimationWorker, quiet: bool) -> Result<EstimationResult> {
    while let Some(event) = worker.next() {
        match event {
            EstimationEvent::StateChanged(state) => {
                if !quiet {
                    eprintln!("[{}]", state.as_str());
                }
            }
            EstimationEvent::BucketMeasured(m) => {
                if !quiet {
                    eprintln!(
                        "  bucket {:>3}: n = {:>8}, avg = {:.3} ms",
                        m.index(),
                        m.elements_count(),
                        m.average_time().unwrap_or(f64::NAN)
                    );
                }
            }
            EstimationEvent::Finished(outcome) => {
                return outcome.context("estimation failed");
            }
        }
    }
    bail!("estimation worker exited without a result")
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "sortfit=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
