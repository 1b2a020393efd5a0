//! errors.rs — error type shared by every stage of a sweep.
//!
//! * Strategy errors and panics are caught per cell by the driver.
//! * Render and config errors surface to the caller.

use thiserror::Error;

/// Result alias used across crate.
pub type Result<T, E = BenchError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// Nearest neighbour is undefined without reference points.
    #[error("reference set is empty")]
    EmptyReference,

    /// A point set contains NaN or an infinity.
    #[error("non-finite coordinate at point {index}")]
    NonFinite { index: usize },

    /// Size schedule is empty, non-positive or not strictly increasing.
    #[error("invalid size schedule: {0}")]
    InvalidSchedule(String),

    /// Any other rejected setting (repetitions, chart size, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Too many reference points share one coordinate for the reference tree.
    #[error("reference tree cannot split {count} points sharing {value} on axis {axis}")]
    DegenerateReference { axis: usize, value: f64, count: usize },

    /// No series had a single plottable point.
    #[error("nothing to render: every series is empty or failed")]
    NothingToRender,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("chart drawing failed: {0}")]
    Plot(String),

    /// Config (de)serialization failed (serde feature).
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serialize(String),
}
