//! point.rs — 2D point and point-set definitions for nn-sweep.

use bytemuck::{Pod, Zeroable};
use ndarray::{Array1, ArrayView2};

use crate::errors::{BenchError, Result};

/// A single `(x, y)` location.
///
/// `repr(C)` + `Pod` lets a `&[Point2]` be viewed as a flat `&[f64]`
/// (`x0, y0, x1, y1, ...`) without copying.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<(f64, f64)> for Point2 {
    fn from(p: (f64, f64)) -> Self {
        Self::new(p.0, p.1)
    }
}

/// Ordered, finite, read-only collection of points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    points: Vec<Point2>,
}

impl PointSet {
    /// Wrap `points`, rejecting the first non-finite coordinate.
    pub fn new(points: Vec<Point2>) -> Result<Self> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(BenchError::NonFinite { index });
        }
        Ok(Self { points })
    }

    /// Build from anything convertible into [`Point2`] (arrays, tuples).
    pub fn from_coords<P, I>(coords: I) -> Result<Self>
    where
        P: Into<Point2>,
        I: IntoIterator<Item = P>,
    {
        Self::new(coords.into_iter().map(Into::into).collect())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point2> {
        self.points.iter()
    }

    /// Flat `[x0, y0, x1, y1, ...]` view over the same memory.
    #[inline]
    pub fn as_flat(&self) -> &[f64] {
        bytemuck::cast_slice(&self.points)
    }

    /// Zero-copy view as coordinate pairs.
    pub fn as_arrays(&self) -> &[[f64; 2]] {
        bytemuck::cast_slice(&self.points)
    }

    /// Zero-copy `(len, 2)` matrix view.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        // The flat slice always holds exactly 2 * len elements.
        ArrayView2::from_shape((self.len(), 2), self.as_flat())
            .expect("point slice is len x 2")
    }

    /// Structure-of-arrays copy: one column per axis.
    pub fn columns(&self) -> (Array1<f64>, Array1<f64>) {
        let xs = self.points.iter().map(|p| p.x).collect();
        let ys = self.points.iter().map(|p| p.y).collect();
        (xs, ys)
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point2;
    type IntoIter = std::slice::Iter<'a, Point2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
