//! nn-sweep — run the full nearest-neighbour scaling sweep and write the
//! comparison chart.
//!
//! ```bash
//! cargo run --release -- --sizes 100,500,1000 --output static/benchmarks.png
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use nn_sweep::{
    config_from_path, default_registry, render, standard_entry, BenchConfig, BenchConfigBuilder,
    ChartOptions, Strategy, Sweep, SweepReport,
};

#[derive(Parser, Debug)]
#[command(name = "nn-sweep")]
#[command(about = "Benchmark 2D nearest-neighbor matching strategies across problem sizes")]
struct Args {
    /// Round sizes (each drives both the reference and the query set).
    #[arg(short, long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Timed repetitions per (strategy, size).
    #[arg(short, long, env = "NN_SWEEP_REPETITIONS")]
    repetitions: Option<usize>,

    /// Largest size the naive scan runs at; 0 removes the cutoff.
    #[arg(long)]
    naive_cutoff: Option<usize>,

    /// Chart destination.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Random seed for reproducible point sets.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON config file; explicit flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run these strategies (e.g. `--only naive,vectorized`).
    #[arg(long, value_delimiter = ',')]
    only: Vec<String>,

    /// Exit with an error if any cell failed.
    #[arg(long)]
    strict: bool,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let config = build_config(&args)?;
    let registry = if args.only.is_empty() {
        default_registry(&config)
    } else {
        let mut picked = Vec::with_capacity(args.only.len());
        for name in &args.only {
            let s = Strategy::from_name(name).ok_or_else(|| {
                let known: Vec<_> = Strategy::ALL.iter().map(|s| s.name()).collect();
                format!("unknown strategy '{name}' (known: {})", known.join(", "))
            })?;
            picked.push(standard_entry(s, config.naive_cutoff));
        }
        picked
    };

    info!(
        sizes = ?config.schedule.sizes(),
        repetitions = config.repetitions,
        naive_cutoff = ?config.naive_cutoff,
        "configuration"
    );

    let output = config.output.clone();
    let options = ChartOptions::from_config(&config);
    let report = Sweep::new(config, registry).run();

    // Logged before rendering: an all-failed report renders nothing.
    let failed = log_failures(&report);
    render(&report, &output, &options)?;

    if args.strict && failed > 0 {
        return Err(format!("{failed} cell(s) failed").into());
    }
    Ok(())
}

fn log_failures(report: &SweepReport) -> usize {
    let failures = report.failures();
    for f in &failures {
        error!(strategy = f.strategy, x = f.x, "{}", f.message);
    }
    failures.len()
}

fn build_config(args: &Args) -> nn_sweep::Result<BenchConfig> {
    let mut b = match &args.config {
        Some(path) => BenchConfigBuilder::from_config(config_from_path(path)?),
        None => BenchConfig::builder(),
    };
    if let Some(sizes) = &args.sizes {
        b = b.sizes(sizes.clone());
    }
    if let Some(r) = args.repetitions {
        b = b.repetitions(r);
    }
    if let Some(c) = args.naive_cutoff {
        b = b.naive_cutoff(if c == 0 { None } else { Some(c) });
    }
    if let Some(out) = &args.output {
        b = b.output(out.clone());
    }
    if let Some(seed) = args.seed {
        b = b.seed(seed);
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nn_sweep::{BenchError, MatchResult, PointSet, StrategyEntry};

    #[test]
    fn failures_are_counted_when_nothing_renders() {
        let failing = |_: &PointSet, _: &PointSet| -> nn_sweep::Result<MatchResult> {
            Err(BenchError::EmptyReference)
        };
        let cfg = BenchConfig::builder()
            .sizes(vec![2, 3])
            .repetitions(1)
            .seed(9)
            .build()
            .unwrap();
        let options = ChartOptions::from_config(&cfg);
        let report = Sweep::new(cfg, vec![StrategyEntry::new("failing", failing)]).run();

        assert_eq!(log_failures(&report), 2);
        let dir = tempfile::tempdir().unwrap();
        let err = render(&report, &dir.path().join("chart.png"), &options).unwrap_err();
        assert!(matches!(err, BenchError::NothingToRender));
    }
}
