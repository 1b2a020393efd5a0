//! math.rs — distance and minimum selection shared by all strategies.
//!
//! Every strategy compares **squared** Euclidean distance; the square root
//! is monotonic and only applied where a caller asks for real distances.

use crate::point::Point2;

/// `dx*dx + dy*dy`.
#[inline(always)]
pub fn sq_dist(a: &Point2, b: &Point2) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Candidate reference index together with its distance to a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Nearest {
    pub index: usize,
    pub distance: f64,
}

/// NaN-aware reducer: smaller distance wins, ties keep `left`, and a NaN
/// loses to any number.
#[inline]
pub(crate) fn minimize(left: Nearest, right: Nearest) -> Nearest {
    if left.distance < right.distance {
        left
    } else if right.distance < left.distance {
        right
    } else if left.distance.is_nan() && !right.distance.is_nan() {
        right
    } else {
        left
    }
}

/// Position of the first minimum under strict `<`, starting from `+inf`
/// at index 0. Returns 0 for an input with no value below infinity.
#[inline]
pub(crate) fn first_min<I>(values: I) -> usize
where
    I: IntoIterator<Item = f64>,
{
    let mut best = f64::INFINITY;
    let mut best_idx = 0usize;
    for (i, v) in values.into_iter().enumerate() {
        if v < best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(index: usize, distance: f64) -> Nearest {
        Nearest { index, distance }
    }

    #[test]
    fn minimize_picks_smaller() {
        assert_eq!(minimize(n(0, 0.0), n(1, 1.0)).index, 0);
        assert_eq!(minimize(n(0, 1.0), n(1, 0.0)).index, 1);
    }

    #[test]
    fn minimize_tie_keeps_left() {
        assert_eq!(minimize(n(3, 2.0), n(7, 2.0)).index, 3);
    }

    #[test]
    fn minimize_nan_loses() {
        assert_eq!(minimize(n(0, f64::NAN), n(1, 0.0)).index, 1);
        assert_eq!(minimize(n(0, 20.0), n(1, f64::NAN)).index, 0);
        assert_eq!(minimize(n(0, f64::NAN), n(1, f64::NAN)).index, 0);
    }

    #[test]
    fn first_min_lowest_index_on_tie() {
        assert_eq!(first_min([3.0, 1.0, 1.0, 2.0]), 1);
        assert_eq!(first_min([f64::INFINITY, f64::INFINITY]), 0);
        assert_eq!(first_min(std::iter::empty()), 0);
    }

    #[test]
    fn squared_distance() {
        assert_eq!(sq_dist(&Point2::new(0.0, 0.0), &Point2::new(3.0, 4.0)), 25.0);
    }
}
