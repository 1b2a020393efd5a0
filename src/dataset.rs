//! dataset.rs — uniform random point sets for benchmark rounds.
//!
//! Coordinates are drawn independently from `[0, 1)`. The RNG is always
//! seeded from a recorded `u64` so a sweep can be replayed exactly:
//!
//! ```rust
//! use nn_sweep::DatasetGenerator;
//!
//! let mut a = DatasetGenerator::from_seed(7);
//! let mut b = DatasetGenerator::from_seed(7);
//! assert_eq!(a.generate(32), b.generate(32));
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::point::{Point2, PointSet};

/// Draw `count` points with both coordinates uniform in `[0, 1)`.
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R) -> PointSet {
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(Point2::new(rng.gen::<f64>(), rng.gen::<f64>()));
    }
    // `gen::<f64>()` is always finite.
    PointSet::new(points).expect("uniform samples are finite")
}

/// Seeded point-set source owned by the driver.
#[derive(Debug, Clone)]
pub struct DatasetGenerator {
    seed: u64,
    rng: StdRng,
}

impl DatasetGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self { seed, rng: StdRng::seed_from_u64(seed) }
    }

    /// Pick a fresh seed from OS entropy; read it back with [`Self::seed`].
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::thread_rng().gen())
    }

    /// Seed this generator was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn generate(&mut self, count: usize) -> PointSet {
        generate(count, &mut self.rng)
    }

    /// Two independent sets: `(lines, cloud)`.
    pub fn generate_pair(&mut self, lines: usize, cloud: usize) -> (PointSet, PointSet) {
        let l = self.generate(lines);
        let c = self.generate(cloud);
        (l, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_and_range() {
        let mut g = DatasetGenerator::from_seed(1);
        let set = g.generate(1_000);
        assert_eq!(set.len(), 1_000);
        assert!(set.iter().all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)));
    }

    #[test]
    fn pair_is_independent() {
        let mut g = DatasetGenerator::from_seed(2);
        let (lines, cloud) = g.generate_pair(64, 16);
        assert_eq!(lines.len(), 64);
        assert_eq!(cloud.len(), 16);
        assert_ne!(&lines.points()[..16], cloud.points());
    }

    #[test]
    fn zero_count_is_empty() {
        let mut g = DatasetGenerator::from_entropy();
        assert!(g.generate(0).is_empty());
        let seed = g.seed();
        assert_eq!(DatasetGenerator::from_seed(seed).seed(), seed);
    }
}
