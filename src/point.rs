use crate::bounds::BoundingBox;
use crate::error::KdError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Index;

/// A point in k-dimensional space.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    coords: Vec<f64>,
}

impl Point {
    pub fn new(coords: Vec<f64>) -> Self {
        Self { coords }
    }

    /// Number of coordinates.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Squared Euclidean distance to `other`. Both points must share a dimensionality.
    #[inline]
    pub fn squared_distance(&self, other: &Point) -> f64 {
        debug_assert_eq!(self.dim(), other.dim());
        let mut sum = 0.0;
        for (a, b) in self.coords.iter().zip(&other.coords) {
            let d = a - b;
            sum += d * d;
        }
        sum
    }

    /// Checks that the point has `expected` finite coordinates.
    pub(crate) fn validate(&self, expected: usize) -> Result<(), KdError> {
        if self.dim() != expected {
            return Err(KdError::DimensionMismatch { expected, found: self.dim() });
        }
        match self.coords.iter().position(|c| !c.is_finite()) {
            Some(axis) => Err(KdError::NonFiniteCoordinate { axis }),
            None => Ok(()),
        }
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        &self.coords[axis]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

impl<const D: usize> From<[f64; D]> for Point {
    fn from(coords: [f64; D]) -> Self {
        Self::new(coords.to_vec())
    }
}

/// Generates `count` points uniformly distributed inside `bounds`.
pub fn random_points(count: usize, bounds: &BoundingBox) -> Vec<Point> {
    random_points_with_seed(count, bounds, get_seed())
}

/// Like [`random_points`], but reproducible for a given `seed`.
pub fn random_points_with_seed(count: usize, bounds: &BoundingBox, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let coords = bounds
                .min
                .iter()
                .zip(&bounds.max)
                .map(|(lo, hi)| lo + rng.r#gen::<f64>() * (hi - lo))
                .collect();
            Point::new(coords)
        })
        .collect()
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789 // Fixed seed for tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_distance_3d() {
        let a = Point::from([1.0, 2.0, 3.0]);
        let b = Point::from([0.0, 0.0, 0.0]);
        assert!((a.squared_distance(&b) - 14.0).abs() < 1e-12);
        assert_eq!(a.squared_distance(&a), 0.0);
    }

    #[test]
    fn validate_rejects_bad_points() {
        let p = Point::from([1.0, f64::NAN]);
        assert_eq!(p.validate(2), Err(KdError::NonFiniteCoordinate { axis: 1 }));
        assert_eq!(p.validate(3), Err(KdError::DimensionMismatch { expected: 3, found: 2 }));
        assert!(Point::from([1.0, 2.0]).validate(2).is_ok());
    }

    #[test]
    fn random_points_stay_in_bounds() {
        let bounds = BoundingBox::new(vec![-1.0, 0.0, 10.0], vec![1.0, 5.0, 20.0]).unwrap();
        let points = random_points_with_seed(200, &bounds, 7);
        assert_eq!(points.len(), 200);
        for p in &points {
            assert_eq!(p.dim(), 3);
            assert!(bounds.contains(p));
        }
        assert_eq!(points, random_points_with_seed(200, &bounds, 7));
    }
}
