//! # kdsearch
//!
//! `kdsearch` is a Rust library for exact nearest-neighbor search over k-dimensional points,
//! designed to be used in Rust as well as compiled to WebAssembly (WASM).
//!
//! ## Features
//!
//! - **Balanced build**: Recursive median split with the splitting axis rotating per tree level.
//! - **Exact search**: Branch-and-bound nearest-neighbor query that prunes subtrees beyond the
//!   splitting plane.
//! - **Thread-safe queries**: Queries keep their state on the stack, so a built tree can be shared
//!   across threads; batch queries run on `rayon`.
//! - **WASM-first**: `KdTreeJs` exposes the tree to JavaScript and TypeScript through
//!   `wasm-bindgen`.
//!
//! ## Example
//!
//! ```
//! use kdsearch::{KdTree, Point};
//!
//! let points = vec![
//!     Point::from([2.0, 3.0]), Point::from([5.0, 4.0]), Point::from([9.0, 6.0]),
//!     Point::from([4.0, 7.0]), Point::from([8.0, 1.0]), Point::from([7.0, 2.0]),
//! ];
//! let tree = KdTree::from_points(points).unwrap();
//! let nearest = tree.nearest(&Point::from([9.0, 2.0])).unwrap().unwrap();
//! assert_eq!(nearest.point, &Point::from([8.0, 1.0]));
//! assert_eq!(nearest.dist_sq, 2.0);
//! ```
//!
//! ## Main Interface
//!
//! The primary entry point is the [`KdTree`] struct, built once from a point set and queried
//! many times.

mod bounds;
mod config;
mod error;
mod kdtree;
mod point;
pub mod wasm;

pub use bounds::BoundingBox;
pub use config::BuildConfig;
pub use config::PartitionStrategy;
pub use error::KdError;
pub use kdtree::InorderIter;
pub use kdtree::KdTree;
pub use kdtree::Neighbor;
pub use point::Point;
pub use point::random_points;
pub use point::random_points_with_seed;
