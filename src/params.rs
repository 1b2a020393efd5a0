//! params.rs — sweep configuration and its builder.

use std::path::PathBuf;

use crate::errors::{BenchError, Result};

/// Sizes swept by default (each drives both L and C).
pub const DEF_SIZES: [usize; 8] = [100, 500, 1_000, 5_000, 10_000, 15_000, 20_000, 30_000];
/// Largest size the naive scan still runs at.
pub const DEF_NAIVE_CUTOFF: usize = 10_000;
pub const DEF_REPETITIONS: usize = 10;
pub const DEF_OUTPUT: &str = "./static/benchmarks.png";
/// 8 x 6 inches at 300 dpi.
pub const DEF_CHART_WIDTH: u32 = 2_400;
pub const DEF_CHART_HEIGHT: u32 = 1_800;

/// Reference and cloud sizes of one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSize {
    pub lines: usize,
    pub cloud: usize,
}

impl RoundSize {
    /// Paired sizes: the same count for both sets.
    #[inline]
    pub fn paired(n: usize) -> Self {
        Self { lines: n, cloud: n }
    }

    /// `L x C`, the x-axis key of every series.
    #[inline]
    pub fn product(&self) -> u64 {
        self.lines as u64 * self.cloud as u64
    }
}

/// Strictly increasing list of positive round sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<usize>", into = "Vec<usize>"))]
pub struct SizeSchedule(Vec<usize>);

impl SizeSchedule {
    pub fn new(sizes: Vec<usize>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(BenchError::InvalidSchedule("no sizes given".into()));
        }
        if let Some(pos) = sizes.iter().position(|&n| n == 0) {
            return Err(BenchError::InvalidSchedule(format!("size at position {pos} is zero")));
        }
        if let Some(w) = sizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(BenchError::InvalidSchedule(format!(
                "sizes must strictly increase, found {} then {}",
                w[0], w[1]
            )));
        }
        Ok(Self(sizes))
    }

    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest size in the schedule.
    #[inline]
    pub fn max(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }

    /// Per-round sizes; every round pairs L = C.
    pub fn rounds(&self) -> impl Iterator<Item = RoundSize> + '_ {
        self.0.iter().map(|&n| RoundSize::paired(n))
    }
}

impl Default for SizeSchedule {
    fn default() -> Self {
        Self(DEF_SIZES.to_vec())
    }
}

impl TryFrom<Vec<usize>> for SizeSchedule {
    type Error = BenchError;

    fn try_from(v: Vec<usize>) -> Result<Self> {
        Self::new(v)
    }
}

impl From<SizeSchedule> for Vec<usize> {
    fn from(s: SizeSchedule) -> Self {
        s.0
    }
}

/// Everything a sweep and its chart need.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BenchConfig {
    pub schedule: SizeSchedule,
    pub repetitions: usize,
    /// `None` lets the naive scan run at every size.
    pub naive_cutoff: Option<usize>,
    pub output: PathBuf,
    /// `None` draws a seed from entropy (logged at sweep start).
    pub seed: Option<u64>,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            schedule: SizeSchedule::default(),
            repetitions: DEF_REPETITIONS,
            naive_cutoff: Some(DEF_NAIVE_CUTOFF),
            output: PathBuf::from(DEF_OUTPUT),
            seed: None,
            chart_width: DEF_CHART_WIDTH,
            chart_height: DEF_CHART_HEIGHT,
        }
    }
}

impl BenchConfig {
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }

    /// Check invariants that deserialization or direct field edits may break.
    pub fn validate(&self) -> Result<()> {
        SizeSchedule::new(self.schedule.sizes().to_vec())?;
        if self.repetitions == 0 {
            return Err(BenchError::InvalidConfig("repetitions must be >= 1".into()));
        }
        if self.chart_width < 200 || self.chart_height < 150 {
            return Err(BenchError::InvalidConfig(format!(
                "chart {}x{} is too small (min 200x150)",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }
}

/// Builder pattern for [`BenchConfig`].
#[derive(Debug, Clone, Default)]
pub struct BenchConfigBuilder {
    sizes: Option<Vec<usize>>,
    inner: BenchConfig,
}

impl BenchConfigBuilder {
    /// Start from an existing config (e.g. one loaded from a file).
    pub fn from_config(config: BenchConfig) -> Self {
        Self { sizes: None, inner: config }
    }

    /// Round sizes; validated in [`Self::build`].
    pub fn sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn repetitions(mut self, r: usize) -> Self {
        self.inner.repetitions = r;
        self
    }

    pub fn naive_cutoff(mut self, cutoff: Option<usize>) -> Self {
        self.inner.naive_cutoff = cutoff;
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.output = path.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.inner.seed = Some(seed);
        self
    }

    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.inner.chart_width = width;
        self.inner.chart_height = height;
        self
    }

    /// Finish and validate.
    pub fn build(self) -> Result<BenchConfig> {
        let mut cfg = self.inner;
        if let Some(sizes) = self.sizes {
            cfg.schedule = SizeSchedule::new(sizes)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = BenchConfig::builder().build().unwrap();
        assert_eq!(cfg.schedule.sizes(), &DEF_SIZES);
        assert_eq!(cfg.repetitions, 10);
        assert_eq!(cfg.naive_cutoff, Some(10_000));
        assert_eq!(cfg.output, PathBuf::from("./static/benchmarks.png"));
    }

    #[test]
    fn schedule_must_strictly_increase() {
        assert!(SizeSchedule::new(vec![]).is_err());
        assert!(SizeSchedule::new(vec![0, 10]).is_err());
        assert!(SizeSchedule::new(vec![10, 10]).is_err());
        assert!(SizeSchedule::new(vec![10, 5]).is_err());
        let s = SizeSchedule::new(vec![1, 2, 30]).unwrap();
        assert_eq!(s.max(), 30);
        assert_eq!(s.rounds().map(|r| r.product()).collect::<Vec<_>>(), vec![1, 4, 900]);
    }

    #[test]
    fn builder_overrides_and_validates() {
        let cfg = BenchConfig::builder()
            .sizes(vec![10, 20])
            .repetitions(3)
            .naive_cutoff(None)
            .output("out/chart.png")
            .seed(9)
            .build()
            .unwrap();
        assert_eq!(cfg.schedule.len(), 2);
        assert_eq!(cfg.repetitions, 3);
        assert_eq!(cfg.naive_cutoff, None);
        assert_eq!(cfg.seed, Some(9));

        assert!(matches!(
            BenchConfig::builder().repetitions(0).build(),
            Err(BenchError::InvalidConfig(_))
        ));
        assert!(matches!(
            BenchConfig::builder().sizes(vec![5, 1]).build(),
            Err(BenchError::InvalidSchedule(_))
        ));
        assert!(BenchConfig::builder().chart_size(10, 10).build().is_err());
    }

    #[test]
    fn round_product_does_not_overflow_usize_math() {
        let r = RoundSize::paired(5_000_000);
        assert_eq!(r.product(), 25_000_000_000_000);
    }
}
