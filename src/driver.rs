//! driver.rs — the size sweep.
//!
//! For every round size the driver generates a fresh `(lines, cloud)` pair,
//! times each registered strategy on it and records one [`Cell`] per
//! (strategy, size). A failing or panicking strategy only fails its own
//! cell; the sweep always runs to completion and leaves the abort decision
//! to the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::{
    dataset::DatasetGenerator,
    matcher::{Matcher, Strategy},
    params::BenchConfig,
    point::PointSet,
    render::{CurveStyle, Dash, Rgb},
    timing::measure,
};

/// One strategy as seen by the sweep.
pub struct StrategyEntry {
    pub name: String,
    pub matcher: Box<dyn Matcher>,
    /// Largest round size this strategy still runs at.
    pub cutoff: Option<usize>,
    pub style: CurveStyle,
}

impl StrategyEntry {
    pub fn new(name: impl Into<String>, matcher: impl Matcher + 'static) -> Self {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            cutoff: None,
            style: CurveStyle::default(),
        }
    }

    pub fn with_cutoff(mut self, cutoff: Option<usize>) -> Self {
        self.cutoff = cutoff;
        self
    }

    pub fn with_style(mut self, style: CurveStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    pub fn admits(&self, size: usize) -> bool {
        self.cutoff.map_or(true, |c| size <= c)
    }
}

/// Style of each standard strategy: brute families red, trees blue,
/// line pattern by implementation.
pub fn standard_style(s: Strategy) -> CurveStyle {
    const BLACK: Rgb = [0, 0, 0];
    const RED: Rgb = [214, 39, 40];
    const BLUE: Rgb = [31, 119, 180];
    match s {
        Strategy::Naive => CurveStyle::new(BLACK, Dash::Solid),
        Strategy::Vectorized => CurveStyle::new(RED, Dash::DashDot),
        Strategy::ReferenceBrute => CurveStyle::new(RED, Dash::Solid),
        Strategy::ReferenceTree => CurveStyle::new(BLUE, Dash::Solid),
        Strategy::NativeBruteSerial => CurveStyle::new(RED, Dash::Dotted),
        Strategy::NativeTreeSerial => CurveStyle::new(BLUE, Dash::Dotted),
        Strategy::NativeBruteParallel => CurveStyle::new(RED, Dash::Dashed),
        Strategy::NativeTreeParallel => CurveStyle::new(BLUE, Dash::Dashed),
    }
}

/// Registry entry for a standard strategy; the naive scan takes
/// `naive_cutoff`.
pub fn standard_entry(s: Strategy, naive_cutoff: Option<usize>) -> StrategyEntry {
    let cutoff = if s == Strategy::Naive { naive_cutoff } else { None };
    StrategyEntry::new(s.name(), s)
        .with_cutoff(cutoff)
        .with_style(standard_style(s))
}

/// All eight standard strategies in legend order.
pub fn default_registry(config: &BenchConfig) -> Vec<StrategyEntry> {
    Strategy::ALL
        .iter()
        .map(|&s| standard_entry(s, config.naive_cutoff))
        .collect()
}

/// Outcome of timing one strategy at one size.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Mean(Duration),
    Failed(String),
}

/// Everything recorded for one strategy.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub style: CurveStyle,
    /// `(L x C, outcome)` for every round the strategy was admitted to.
    pub cells: Vec<(u64, Cell)>,
}

impl Series {
    pub fn xs(&self) -> impl Iterator<Item = u64> + '_ {
        self.cells.iter().map(|(x, _)| *x)
    }

    /// Successful cells as `(x, mean seconds)`.
    pub fn means(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.cells.iter().filter_map(|(x, c)| match c {
            Cell::Mean(d) => Some((*x, d.as_secs_f64())),
            Cell::Failed(_) => None,
        })
    }
}

/// A failed cell, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<'a> {
    pub strategy: &'a str,
    pub x: u64,
    pub message: &'a str,
}

/// Result of a full sweep.
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub seed: u64,
    /// Shared x-axis: one entry per round, in schedule order.
    pub xs: Vec<u64>,
    pub series: Vec<Series>,
}

impl SweepReport {
    pub fn failures(&self) -> Vec<Failure<'_>> {
        self.series
            .iter()
            .flat_map(|s| {
                s.cells.iter().filter_map(move |(x, c)| match c {
                    Cell::Failed(m) => Some(Failure { strategy: &s.name, x: *x, message: m }),
                    Cell::Mean(_) => None,
                })
            })
            .collect()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Sweep state: config, registry and the seeded point source.
pub struct Sweep {
    config: BenchConfig,
    registry: Vec<StrategyEntry>,
    generator: DatasetGenerator,
}

impl Sweep {
    pub fn new(config: BenchConfig, registry: Vec<StrategyEntry>) -> Self {
        let generator = match config.seed {
            Some(seed) => DatasetGenerator::from_seed(seed),
            None => DatasetGenerator::from_entropy(),
        };
        Self { config, registry, generator }
    }

    #[inline]
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    #[inline]
    pub fn registry(&self) -> &[StrategyEntry] {
        &self.registry
    }

    /// Run every round of the schedule.
    pub fn run(&mut self) -> SweepReport {
        let seed = self.generator.seed();
        info!(
            seed,
            rounds = self.config.schedule.len(),
            strategies = self.registry.len(),
            "starting sweep"
        );

        let init = SweepReport {
            seed,
            xs: Vec::with_capacity(self.config.schedule.len()),
            series: self
                .registry
                .iter()
                .map(|e| Series { name: e.name.clone(), style: e.style, cells: Vec::new() })
                .collect(),
        };

        let rounds: Vec<_> = self.config.schedule.rounds().collect();
        rounds.into_iter().fold(init, |mut report, round| {
            let (lines, cloud) = self.generator.generate_pair(round.lines, round.cloud);
            let x = round.product();
            report.xs.push(x);

            for (entry, series) in self.registry.iter().zip(report.series.iter_mut()) {
                if !entry.admits(round.lines) {
                    debug!(strategy = %entry.name, size = round.lines, "above cutoff, skipped");
                    continue;
                }
                let cell = time_cell(entry, &lines, &cloud, self.config.repetitions);
                series.cells.push((x, cell));
            }

            info!("finished size {} | {}", round.lines, round.cloud);
            report
        })
    }
}

fn time_cell(
    entry: &StrategyEntry,
    lines: &PointSet,
    cloud: &PointSet,
    repetitions: usize,
) -> Cell {
    let timed = panic::catch_unwind(AssertUnwindSafe(|| {
        measure(|| entry.matcher.match_points(lines, cloud), repetitions)
    }));
    match timed {
        Ok(Ok(mean)) => {
            debug!(
                strategy = %entry.name,
                size = lines.len(),
                mean_s = mean.as_secs_f64(),
                "mean runtime"
            );
            Cell::Mean(mean)
        }
        Ok(Err(e)) => {
            warn!(strategy = %entry.name, size = lines.len(), error = %e, "strategy failed");
            Cell::Failed(e.to_string())
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            warn!(
                strategy = %entry.name,
                size = lines.len(),
                reason = message,
                "strategy panicked"
            );
            Cell::Failed(format!("panicked: {message}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BenchError, Result};
    use crate::matcher::MatchResult;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn small_config(sizes: Vec<usize>) -> BenchConfig {
        BenchConfig::builder()
            .sizes(sizes)
            .repetitions(2)
            .naive_cutoff(Some(20))
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn xs_follow_schedule() {
        let cfg = small_config(vec![5, 10, 20, 40]);
        let registry = default_registry(&cfg);
        let report = Sweep::new(cfg, registry).run();

        assert_eq!(report.seed, 42);
        assert_eq!(report.xs, vec![25, 100, 400, 1_600]);
        assert!(report.xs.windows(2).all(|w| w[0] < w[1]));
        assert!(report.failures().is_empty());
        assert_eq!(report.series.len(), 8);
    }

    #[test]
    fn cutoff_shortens_series() {
        let cfg = small_config(vec![5, 10, 20, 40]);
        let registry = default_registry(&cfg);
        let report = Sweep::new(cfg, registry).run();

        let naive = report.series("naive").unwrap();
        assert_eq!(naive.xs().collect::<Vec<_>>(), vec![25, 100, 400]);
        assert!(naive.cells.len() < report.xs.len());

        let vec = report.series("vectorized").unwrap();
        assert_eq!(vec.xs().collect::<Vec<_>>(), report.xs);
    }

    #[test]
    fn failures_are_recorded_and_sweep_continues() {
        let cfg = small_config(vec![4, 8, 16]);
        let failing = |_: &PointSet, c: &PointSet| -> Result<MatchResult> {
            if c.len() >= 8 {
                Err(BenchError::InvalidConfig("boom".into()))
            } else {
                Ok(vec![0; c.len()])
            }
        };
        let registry = vec![
            StrategyEntry::new("flaky", failing),
            standard_entry(Strategy::NativeBruteSerial, None),
        ];
        let report = Sweep::new(cfg, registry).run();

        let failures = report.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.strategy == "flaky"));
        assert_eq!(failures[0].x, 64);

        let flaky = report.series("flaky").unwrap();
        assert!(matches!(flaky.cells[0].1, Cell::Mean(_)));
        assert_eq!(flaky.means().count(), 1);
        assert_eq!(report.series("native-brute-serial").unwrap().means().count(), 3);
    }

    #[test]
    fn panicking_strategy_fails_its_cells_only() {
        let cfg = small_config(vec![2, 4]);
        let exploding = |_: &PointSet, _: &PointSet| -> Result<MatchResult> {
            panic!("too many items with the same position")
        };
        let registry = vec![
            StrategyEntry::new("exploding", exploding),
            standard_entry(Strategy::Naive, None),
        ];
        let report = Sweep::new(cfg, registry).run();

        assert_eq!(report.xs, vec![4, 16]);
        let failures = report.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.strategy == "exploding"));
        assert!(failures[0].message.contains("too many items with the same position"));
        assert_eq!(report.series("naive").unwrap().means().count(), 2);
    }

    #[test]
    fn panic_payloads_become_messages() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*owned), "owned");
        assert_eq!(panic_message(&*borrowed), "borrowed");
        assert_eq!(panic_message(&*other), "non-string panic payload");
    }

    #[test]
    fn each_admitted_cell_runs_repetitions_times() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let counting = move |_: &PointSet, c: &PointSet| -> Result<MatchResult> {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(vec![0; c.len()])
        };
        let cfg = BenchConfig::builder()
            .sizes(vec![1, 2, 3])
            .repetitions(4)
            .seed(1)
            .build()
            .unwrap();
        let registry = vec![StrategyEntry::new("count", counting).with_cutoff(Some(2))];
        let report = Sweep::new(cfg, registry).run();

        assert_eq!(calls.load(Ordering::Relaxed), 2 * 4);
        assert_eq!(report.series[0].cells.len(), 2);
    }

    #[test]
    fn same_seed_same_data() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let record = move |l: &PointSet, c: &PointSet| -> Result<MatchResult> {
            sink.lock().unwrap().push(l.points()[0]);
            Ok(vec![0; c.len()])
        };
        let cfg = BenchConfig::builder().sizes(vec![3]).repetitions(1).seed(77).build().unwrap();
        Sweep::new(cfg.clone(), vec![StrategyEntry::new("a", record.clone())]).run();
        Sweep::new(cfg, vec![StrategyEntry::new("b", record)]).run();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], seen[1]);
    }
}
