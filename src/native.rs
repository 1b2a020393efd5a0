//! native.rs — compiled brute-force and k-d tree matchers, serial and
//! `rayon`-parallel.
//!
//! Distances returned here are **squared** Euclidean. Serial and parallel
//! variants of the same family always produce identical output. Brute force
//! resolves ties to the lowest reference index; the tree returns a point at
//! the minimum distance but picks freely among equidistant ones.

use kd_tree::KdIndexTree;
use rayon::prelude::*;

use crate::{
    errors::Result,
    matcher::{ensure_reference, IndexAndDistance},
    math::{minimize, sq_dist, Nearest},
    point::{Point2, PointSet},
};

/// Brute force every query against every reference point, serially.
pub fn brute_force_index(lines: &PointSet, cloud: &PointSet) -> Result<IndexAndDistance> {
    ensure_reference(lines)?;
    let refs = lines.points();
    Ok(cloud
        .iter()
        .map(|q| {
            let n = nearest_linear(refs, q);
            (n.index, n.distance)
        })
        .collect())
}

/// Same as [`brute_force_index`] with queries spread over the rayon pool.
pub fn brute_force_index_par(lines: &PointSet, cloud: &PointSet) -> Result<IndexAndDistance> {
    ensure_reference(lines)?;
    let refs = lines.points();
    let pairs: Vec<(usize, f64)> = cloud
        .points()
        .par_iter()
        .map(|q| {
            let n = nearest_linear(refs, q);
            (n.index, n.distance)
        })
        .collect();
    Ok(pairs.into_iter().collect())
}

/// Build a tree over `lines` and answer every query serially.
pub fn kd_tree_index(lines: &PointSet, cloud: &PointSet) -> Result<IndexAndDistance> {
    ensure_reference(lines)?;
    let tree = KdIndexTree::build_by_ordered_float(lines.as_arrays());
    Ok(cloud
        .iter()
        .map(|q| {
            tree.nearest(&q.to_array())
                .map_or((0, f64::INFINITY), |found| (*found.item, found.squared_distance))
        })
        .collect())
}

/// Build a tree over `lines` and answer queries on the rayon pool.
pub fn kd_tree_index_par(lines: &PointSet, cloud: &PointSet) -> Result<IndexAndDistance> {
    ensure_reference(lines)?;
    let tree = KdIndexTree::build_by_ordered_float(lines.as_arrays());
    let pairs: Vec<(usize, f64)> = cloud
        .points()
        .par_iter()
        .map(|q| {
            tree.nearest(&q.to_array())
                .map_or((0, f64::INFINITY), |found| (*found.item, found.squared_distance))
        })
        .collect();
    Ok(pairs.into_iter().collect())
}

/// Linear reduction over `refs`; `refs` must be non-empty.
fn nearest_linear(refs: &[Point2], q: &Point2) -> Nearest {
    refs.iter()
        .enumerate()
        .map(|(index, l)| Nearest { index, distance: sq_dist(l, q) })
        .reduce(minimize)
        .unwrap_or(Nearest { index: 0, distance: f64::INFINITY })
}
