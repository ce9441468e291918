use crate::error::KdError;
use crate::point::Point;

/// Axis-aligned bounding box in k-dimensional space.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl BoundingBox {
    /// Box spanned by the `min` and `max` corners, which must share a dimensionality.
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Result<Self, KdError> {
        if min.len() != max.len() {
            return Err(KdError::DimensionMismatch { expected: min.len(), found: max.len() });
        }
        Ok(Self { min, max })
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    /// All points are expected to share the first point's dimensionality.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut min = first.coords().to_vec();
        let mut max = first.coords().to_vec();
        for p in &points[1..] {
            for (axis, &v) in p.coords().iter().enumerate() {
                min[axis] = min[axis].min(v);
                max[axis] = max[axis].max(v);
            }
        }
        Some(Self { min, max })
    }

    pub fn dim(&self) -> usize {
        self.min.len()
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.dim() == self.dim()
            && point
                .coords()
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Squared distance from `point` to the closest point of the box, zero inside.
    pub fn dist_sq_to(&self, point: &Point) -> f64 {
        let mut d2 = 0.0;
        for (axis, &v) in point.coords().iter().enumerate() {
            if v < self.min[axis] {
                d2 += (self.min[axis] - v).powi(2);
            } else if v > self.max[axis] {
                d2 += (v - self.max[axis]).powi(2);
            }
        }
        d2
    }

    /// Squared length of the diagonal, an upper bound on the squared distance
    /// between any two points inside the box.
    pub fn diagonal_sq(&self) -> f64 {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(lo, hi)| (hi - lo).powi(2))
            .sum()
    }
}
