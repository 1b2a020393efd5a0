//! reference.rs — fit-then-query nearest-neighbour estimator.
//!
//! Mirrors the shape of a general-purpose ML library: the reference set is
//! fitted once, then `kneighbors` answers a batch of queries with Euclidean
//! (not squared) distances.
//!
//! * [`Algorithm::Brute`] evaluates dense distance blocks of
//!   [`CHUNK_ROWS`] queries with `ndarray`, using
//!   `|q|² + |l|² − 2·q·l` (clamped at zero).
//! * [`Algorithm::KdTree`] delegates to the `kiddo` k-d tree. Exact
//!   duplicates are stored once under their lowest index, and a fit where
//!   [`TREE_BUCKET`] or more points share one coordinate on an axis is
//!   rejected with [`BenchError::DegenerateReference`].
//!
//! Tie order is whatever the backing algorithm yields; only the linear scans
//! promise lowest-index ties.

use std::collections::{HashMap, HashSet};
use std::fmt;

use kiddo::{KdTree as KiddoTree, SquaredEuclidean};
use ndarray::{Array1, Array2, Axis};
use ordered_float::OrderedFloat;

use crate::{
    errors::{BenchError, Result},
    matcher::{ensure_reference, IndexAndDistance},
    math::first_min,
    point::PointSet,
};

/// Query rows per distance-matrix block.
pub const CHUNK_ROWS: usize = 256;

/// Leaf capacity of the `kiddo` tree. A full leaf whose points all share
/// the split coordinate cannot be divided.
pub const TREE_BUCKET: usize = 32;

/// Search mode of the reference estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Brute,
    KdTree,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Brute => f.write_str("brute"),
            Algorithm::KdTree => f.write_str("kd_tree"),
        }
    }
}

#[derive(Debug)]
enum Fitted {
    Brute { lines: Array2<f64>, sq_norms: Array1<f64> },
    Tree(KiddoTree<f64, 2>),
}

/// A fitted single-neighbour estimator.
#[derive(Debug)]
pub struct NearestNeighbors {
    algorithm: Algorithm,
    fitted: Fitted,
    n_fit: usize,
}

impl NearestNeighbors {
    /// Index `lines` for later queries. Fails on an empty reference set.
    pub fn fit(lines: &PointSet, algorithm: Algorithm) -> Result<Self> {
        ensure_reference(lines)?;
        let fitted = match algorithm {
            Algorithm::Brute => {
                let lines = lines.view().to_owned();
                let sq_norms = lines.map_axis(Axis(1), |r| r.dot(&r));
                Fitted::Brute { lines, sq_norms }
            }
            Algorithm::KdTree => Fitted::Tree(build_tree(lines)?),
        };
        Ok(Self { algorithm, fitted, n_fit: lines.len() })
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of reference points seen by `fit`.
    #[inline]
    pub fn n_samples_fit(&self) -> usize {
        self.n_fit
    }

    /// Nearest fitted point for every row of `cloud`.
    pub fn kneighbors(&self, cloud: &PointSet) -> IndexAndDistance {
        match &self.fitted {
            Fitted::Brute { lines, sq_norms } => brute_blocks(lines, sq_norms, cloud),
            Fitted::Tree(tree) => cloud
                .iter()
                .map(|q| {
                    let nn = tree.nearest_one::<SquaredEuclidean>(&q.to_array());
                    (nn.item as usize, nn.distance.sqrt())
                })
                .collect(),
        }
    }
}

/// Distinct points in first-seen order, paired with their lowest index.
fn distinct_points(lines: &PointSet) -> Vec<(usize, [f64; 2])> {
    let mut seen = HashSet::with_capacity(lines.len());
    lines
        .iter()
        .enumerate()
        .filter(|(_, p)| seen.insert([OrderedFloat(p.x), OrderedFloat(p.y)]))
        .map(|(i, p)| (i, p.to_array()))
        .collect()
}

fn build_tree(lines: &PointSet) -> Result<KiddoTree<f64, 2>> {
    let points = distinct_points(lines);

    for axis in 0..2 {
        let mut counts: HashMap<OrderedFloat<f64>, usize> = HashMap::new();
        for (_, p) in &points {
            *counts.entry(OrderedFloat(p[axis])).or_default() += 1;
        }
        if let Some((value, count)) = counts.into_iter().max_by_key(|&(_, n)| n) {
            if count >= TREE_BUCKET {
                return Err(BenchError::DegenerateReference { axis, value: value.0, count });
            }
        }
    }

    let mut tree: KiddoTree<f64, 2> = KiddoTree::with_capacity(points.len());
    for (i, p) in &points {
        tree.add(p, *i as u64);
    }
    Ok(tree)
}

fn brute_blocks(
    lines: &Array2<f64>,
    sq_norms: &Array1<f64>,
    cloud: &PointSet,
) -> IndexAndDistance {
    let mut out = IndexAndDistance::with_capacity(cloud.len());
    let queries = cloud.view();

    for block in queries.axis_chunks_iter(Axis(0), CHUNK_ROWS) {
        let q_norms = block.map_axis(Axis(1), |r| r.dot(&r));

        // (rows, L) block of squared distances.
        let mut d = block.dot(&lines.t());
        d *= -2.0;
        d += &q_norms.view().insert_axis(Axis(1));
        d += sq_norms;

        for row in d.rows() {
            let i = first_min(row.iter().copied());
            out.index.push(i);
            out.distance.push(row[i].max(0.0).sqrt());
        }
    }
    out
}
