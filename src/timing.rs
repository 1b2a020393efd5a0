//! timing.rs — repeat-and-average wall-clock harness.
//!
//! No warm-up discard and no outlier trimming: every repetition counts and
//! the reported figure is the plain arithmetic mean.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::errors::{BenchError, Result};

/// Per-repetition durations of one harness call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    samples: Vec<Duration>,
}

impl Measurement {
    #[inline]
    pub fn samples(&self) -> &[Duration] {
        &self.samples
    }

    /// Arithmetic mean, `Duration::ZERO` for no samples.
    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.samples.iter().sum();
        total / self.samples.len() as u32
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }
}

/// Run `unit` exactly `repetitions` times and keep every sample.
///
/// The first `Err` returned by `unit` ends the measurement and is passed
/// through unchanged.
pub fn measure_samples<F, T>(mut unit: F, repetitions: usize) -> Result<Measurement>
where
    F: FnMut() -> Result<T>,
{
    if repetitions == 0 {
        return Err(BenchError::InvalidConfig("repetitions must be >= 1".into()));
    }
    if u32::try_from(repetitions).is_err() {
        return Err(BenchError::InvalidConfig(format!("{repetitions} repetitions is too many")));
    }

    let mut samples = Vec::with_capacity(repetitions);
    for _ in 0..repetitions {
        let start = Instant::now();
        let out = unit()?;
        samples.push(start.elapsed());
        black_box(out);
    }
    Ok(Measurement { samples })
}

/// Mean wall-clock duration of `repetitions` runs of `unit`.
pub fn measure<F, T>(unit: F, repetitions: usize) -> Result<Duration>
where
    F: FnMut() -> Result<T>,
{
    measure_samples(unit, repetitions).map(|m| m.mean())
}
