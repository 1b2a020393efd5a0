//! matcher.rs — the nearest-neighbour matching contract and its built-in
//! implementations.
//!
//! A [`Matcher`] maps `(lines, cloud)` to one reference index per query
//! point. All built-ins reject an empty reference set with
//! [`BenchError::EmptyReference`] and return an empty result for an empty
//! cloud.

use std::fmt;

use crate::{
    errors::{BenchError, Result},
    math::{first_min, sq_dist},
    native,
    point::{Point2, PointSet},
    reference::{Algorithm, NearestNeighbors},
};

/// One index into `lines` per query point.
pub type MatchResult = Vec<usize>;

/// Shared capability of every benchmarked strategy.
pub trait Matcher: Send + Sync {
    fn match_points(&self, lines: &PointSet, cloud: &PointSet) -> Result<MatchResult>;
}

impl<F> Matcher for F
where
    F: Fn(&PointSet, &PointSet) -> Result<MatchResult> + Send + Sync,
{
    fn match_points(&self, lines: &PointSet, cloud: &PointSet) -> Result<MatchResult> {
        self(lines, cloud)
    }
}

#[inline]
pub(crate) fn ensure_reference(lines: &PointSet) -> Result<()> {
    if lines.is_empty() {
        return Err(BenchError::EmptyReference);
    }
    Ok(())
}

/// Per-query index plus distance, as returned by the native and reference
/// families.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexAndDistance {
    pub index: Vec<usize>,
    pub distance: Vec<f64>,
}

impl IndexAndDistance {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self { index: Vec::with_capacity(n), distance: Vec::with_capacity(n) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Coordinates of each matched reference point.
    pub fn locations(&self, lines: &PointSet) -> Vec<Point2> {
        self.index.iter().map(|&i| lines.points()[i]).collect()
    }
}

impl FromIterator<(usize, f64)> for IndexAndDistance {
    fn from_iter<T: IntoIterator<Item = (usize, f64)>>(iter: T) -> Self {
        let (index, distance) = iter.into_iter().unzip();
        Self { index, distance }
    }
}

impl From<IndexAndDistance> for MatchResult {
    fn from(v: IndexAndDistance) -> Self {
        v.index
    }
}

// ----------------------------------------------------------------------
// Naive scan
// ----------------------------------------------------------------------

/// Scalar double loop, one squared distance at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveScan;

impl Matcher for NaiveScan {
    fn match_points(&self, lines: &PointSet, cloud: &PointSet) -> Result<MatchResult> {
        ensure_reference(lines)?;
        let refs = lines.points();
        let mut out = Vec::with_capacity(cloud.len());

        for q in cloud {
            let mut minimum = f64::INFINITY;
            let mut minimum_idx = 0usize;
            for (i, l) in refs.iter().enumerate() {
                let candidate = sq_dist(l, q);
                if candidate < minimum {
                    minimum = candidate;
                    minimum_idx = i;
                }
            }
            out.push(minimum_idx);
        }
        Ok(out)
    }
}

// ----------------------------------------------------------------------
// Vectorized scan
// ----------------------------------------------------------------------

/// Whole-array distance evaluation per query via `ndarray`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorizedScan;

impl Matcher for VectorizedScan {
    fn match_points(&self, lines: &PointSet, cloud: &PointSet) -> Result<MatchResult> {
        ensure_reference(lines)?;
        let view = lines.view();
        let xs = view.column(0);
        let ys = view.column(1);

        let mut out = Vec::with_capacity(cloud.len());
        for q in cloud {
            let dx = &xs - q.x;
            let dy = &ys - q.y;
            let d = &dx * &dx + &dy * &dy;
            out.push(first_min(d.iter().copied()));
        }
        Ok(out)
    }
}

// ----------------------------------------------------------------------
// Registry variants
// ----------------------------------------------------------------------

/// The standard strategies a sweep knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Naive,
    Vectorized,
    ReferenceBrute,
    ReferenceTree,
    NativeBruteSerial,
    NativeBruteParallel,
    NativeTreeSerial,
    NativeTreeParallel,
}

impl Strategy {
    pub const ALL: [Strategy; 8] = [
        Strategy::Naive,
        Strategy::Vectorized,
        Strategy::ReferenceBrute,
        Strategy::ReferenceTree,
        Strategy::NativeBruteSerial,
        Strategy::NativeTreeSerial,
        Strategy::NativeBruteParallel,
        Strategy::NativeTreeParallel,
    ];

    /// Stable kebab-case name used in logs, legends and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Naive => "naive",
            Strategy::Vectorized => "vectorized",
            Strategy::ReferenceBrute => "reference-brute",
            Strategy::ReferenceTree => "reference-tree",
            Strategy::NativeBruteSerial => "native-brute-serial",
            Strategy::NativeBruteParallel => "native-brute-parallel",
            Strategy::NativeTreeSerial => "native-tree-serial",
            Strategy::NativeTreeParallel => "native-tree-parallel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Matcher for Strategy {
    fn match_points(&self, lines: &PointSet, cloud: &PointSet) -> Result<MatchResult> {
        match self {
            Strategy::Naive => NaiveScan.match_points(lines, cloud),
            Strategy::Vectorized => VectorizedScan.match_points(lines, cloud),
            Strategy::ReferenceBrute => {
                Ok(NearestNeighbors::fit(lines, Algorithm::Brute)?.kneighbors(cloud).into())
            }
            Strategy::ReferenceTree => {
                Ok(NearestNeighbors::fit(lines, Algorithm::KdTree)?.kneighbors(cloud).into())
            }
            Strategy::NativeBruteSerial => Ok(native::brute_force_index(lines, cloud)?.into()),
            Strategy::NativeBruteParallel => {
                Ok(native::brute_force_index_par(lines, cloud)?.into())
            }
            Strategy::NativeTreeSerial => Ok(native::kd_tree_index(lines, cloud)?.into()),
            Strategy::NativeTreeParallel => Ok(native::kd_tree_index_par(lines, cloud)?.into()),
        }
    }
}
