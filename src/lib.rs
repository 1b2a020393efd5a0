//! nn-sweep — scaling benchmark for 2D nearest-neighbour matching.
//!
//! * Every strategy maps `(lines, cloud)` to the index of the closest
//!   reference point for each query, under squared Euclidean distance.
//! * The sweep times each strategy over a schedule of paired sizes and
//!   renders one log-log chart.
//! * Optional JSON config via the `serde` feature; the `nn-sweep` binary
//!   lives behind `cli`.
//!
//! ## Quick-start
//! ```rust
//! use nn_sweep::{Matcher, NaiveScan, PointSet, VectorizedScan};
//!
//! let lines = PointSet::from_coords([(0.0, 0.0), (10.0, 10.0)]).unwrap();
//! let cloud = PointSet::from_coords([(1.0, 1.0), (9.0, 9.0)]).unwrap();
//!
//! assert_eq!(NaiveScan.match_points(&lines, &cloud).unwrap(), vec![0, 1]);
//! assert_eq!(VectorizedScan.match_points(&lines, &cloud).unwrap(), vec![0, 1]);
//! ```
//!
//! A full (small) sweep:
//! ```rust
//! use nn_sweep::{default_registry, BenchConfig, Sweep};
//!
//! let cfg = BenchConfig::builder()
//!     .sizes(vec![10, 20])
//!     .repetitions(1)
//!     .seed(1)
//!     .build()
//!     .unwrap();
//! let registry = default_registry(&cfg);
//! let report = Sweep::new(cfg, registry).run();
//! assert_eq!(report.xs, vec![100, 400]);
//! ```

mod dataset;
mod driver;
mod errors;
mod matcher;
mod math;
mod params;
mod point;
mod reference;
mod render;
mod timing;

pub mod native;

#[cfg(feature = "serde")]
mod serialize;

#[cfg(feature = "serde")]
pub use serialize::{config_from_path, config_from_slice, config_to_bytes};

pub use dataset::{generate, DatasetGenerator};
pub use driver::{
    default_registry, standard_entry, standard_style, Cell, Failure, Series, StrategyEntry, Sweep,
    SweepReport,
};
pub use errors::{BenchError, Result};
pub use matcher::{IndexAndDistance, MatchResult, Matcher, NaiveScan, Strategy, VectorizedScan};
pub use math::sq_dist;
pub use params::{BenchConfig, BenchConfigBuilder, RoundSize, SizeSchedule};
pub use point::{Point2, PointSet};
pub use reference::{Algorithm, NearestNeighbors, CHUNK_ROWS, TREE_BUCKET};
pub use render::{draw_chart, render, render_series, ChartOptions, CurveStyle, Dash, Rgb};
pub use timing::{measure, measure_samples, Measurement};
