//! Error types for building and querying a [`KdTree`](crate::KdTree).

use std::fmt;

/// Errors that can occur while building or querying a k-d tree.
///
/// An empty tree is not an error: queries against it simply find nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum KdError {
    /// A point has a different number of coordinates than the tree.
    DimensionMismatch { expected: usize, found: usize },

    /// A point without any coordinates was supplied to `build`.
    ZeroDimension,

    /// A coordinate is NaN or infinite, which has no place in the split ordering.
    NonFiniteCoordinate { axis: usize },

    /// `build` was called on a tree that already holds points.
    InvalidRebuild { size: usize },

    /// Coordinates are so far apart that squared distances overflow `f64`.
    DistanceOverflow,

    /// More points than node links can address.
    TooManyPoints { count: usize },
}

impl fmt::Display for KdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KdError::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {} coordinates, got {}", expected, found)
            }
            KdError::ZeroDimension => write!(f, "points must have at least one coordinate"),
            KdError::NonFiniteCoordinate { axis } => {
                write!(f, "non-finite coordinate on axis {}", axis)
            }
            KdError::InvalidRebuild { size } => {
                write!(f, "tree already holds {} points, clear it before rebuilding", size)
            }
            KdError::DistanceOverflow => {
                write!(f, "coordinates too far apart, squared distances overflow")
            }
            KdError::TooManyPoints { count } => {
                write!(f, "cannot index {} points, at most {} are supported", count, u32::MAX - 1)
            }
        }
    }
}

impl std::error::Error for KdError {}
