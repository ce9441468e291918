//! Median-split k-d tree with exact nearest-neighbor search.
//!
//! Nodes live in a flat arena and link to their children by index. Each node
//! holds one point; the splitting axis is not stored but follows from the
//! depth (`depth % dim`), so it is threaded through every recursive call.

use crate::bounds::BoundingBox;
use crate::config::{BuildConfig, PartitionStrategy};
use crate::error::KdError;
use crate::point::Point;
use rayon::prelude::*;
use std::cmp::Ordering;

/// Marks an absent child.
const NIL: u32 = u32::MAX;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    // Index into `KdTree::points`
    point: u32,
    left: u32,
    right: u32,
}

/// Result of a nearest-neighbor query: the stored point and its squared distance to the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor<'a> {
    pub point: &'a Point,
    pub dist_sq: f64,
}

/// Running state of a single query.
struct Best {
    point: u32,
    dist_sq: f64,
    visited: usize,
}

/// A k-d tree over a fixed set of points, built once and queried many times.
#[derive(Clone, Debug)]
pub struct KdTree {
    config: BuildConfig,
    nodes: Vec<KdNode>,
    points: Vec<Point>,
    dim: Option<usize>,
    bounds: Option<BoundingBox>,
    height: i32,
}

impl Default for KdTree {
    fn default() -> Self {
        Self::new()
    }
}

impl KdTree {
    /// An empty tree using the default (stable sort) partitioning.
    pub fn new() -> Self {
        Self::with_config(BuildConfig::default())
    }

    pub fn with_config(config: BuildConfig) -> Self {
        KdTree {
            config,
            nodes: Vec::new(),
            points: Vec::new(),
            dim: None,
            bounds: None,
            height: -1,
        }
    }

    /// Builds a tree from `points` with the default configuration.
    pub fn from_points(points: Vec<Point>) -> Result<Self, KdError> {
        let mut tree = Self::new();
        tree.build(points)?;
        Ok(tree)
    }

    /// Builds the tree from a complete point set.
    ///
    /// An empty set leaves the tree empty. All points must share the first
    /// point's dimensionality and have finite coordinates, close enough
    /// together that their squared distances fit in an `f64`. Building a tree
    /// that already holds points fails with [`KdError::InvalidRebuild`].
    #[tracing::instrument(skip_all, fields(count = points.len()))]
    pub fn build(&mut self, points: Vec<Point>) -> Result<(), KdError> {
        if !self.nodes.is_empty() {
            return Err(KdError::InvalidRebuild { size: self.nodes.len() });
        }
        let Some(first) = points.first() else {
            return Ok(());
        };
        check_capacity(points.len())?;

        let dim = first.dim();
        if dim == 0 {
            return Err(KdError::ZeroDimension);
        }
        for p in &points {
            p.validate(dim)?;
        }

        let bounds = BoundingBox::from_points(&points);
        if bounds.as_ref().is_some_and(|b| !b.diagonal_sq().is_finite()) {
            return Err(KdError::DistanceOverflow);
        }

        self.bounds = bounds;
        self.dim = Some(dim);
        self.points = points;
        self.nodes.reserve(self.points.len());

        let count = self.points.len();
        self.build_recursive(0, count, 0, 0);

        tracing::debug!(size = self.nodes.len(), height = self.height, dim, "built k-d tree");
        Ok(())
    }

    /// Builds the subtree over `points[start..end]` and returns its root,
    /// or `NIL` if the range is empty.
    fn build_recursive(&mut self, start: usize, end: usize, axis: usize, depth: i32) -> u32 {
        if start >= end {
            return NIL;
        }

        // Lower median, matching floor((first + last) / 2) over the inclusive range
        let mid = start + (end - start - 1) / 2;
        let compare = |a: &Point, b: &Point| {
            a[axis].partial_cmp(&b[axis]).unwrap_or(Ordering::Equal)
        };
        match self.config.strategy {
            PartitionStrategy::Sort => self.points[start..end].sort_by(compare),
            PartitionStrategy::Select => {
                self.points[start..end].select_nth_unstable_by(mid - start, compare);
            }
        }

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            point: mid as u32,
            left: NIL,
            right: NIL,
        });
        self.height = self.height.max(depth);

        let next_axis = (axis + 1) % self.points[mid].dim();
        let left = self.build_recursive(start, mid, next_axis, depth + 1);
        let right = self.build_recursive(mid + 1, end, next_axis, depth + 1);

        let node = &mut self.nodes[node_idx as usize];
        node.left = left;
        node.right = right;
        node_idx
    }

    /// Finds the stored point closest to `query` in Euclidean distance.
    ///
    /// Returns `Ok(None)` for an empty tree, whatever the query's dimensionality.
    /// Which of several equidistant points is returned is unspecified.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn nearest(&self, query: &Point) -> Result<Option<Neighbor<'_>>, KdError> {
        let Some(dim) = self.dim else {
            return Ok(None);
        };
        query.validate(dim)?;
        if let Some(bounds) = &self.bounds {
            // (a + b)^2 <= 2(a^2 + b^2) bounds the distance to the farthest stored point.
            let reach_sq = 2.0 * (bounds.dist_sq_to(query) + bounds.diagonal_sq());
            if !reach_sq.is_finite() {
                return Err(KdError::DistanceOverflow);
            }
        }

        let mut best = Best {
            point: NIL,
            dist_sq: f64::INFINITY,
            visited: 0,
        };
        self.nearest_recursive(0, query, 0, &mut best);

        tracing::trace!(visited = best.visited, dist_sq = best.dist_sq, "nearest neighbor");
        Ok(Some(Neighbor {
            point: &self.points[best.point as usize],
            dist_sq: best.dist_sq,
        }))
    }

    fn nearest_recursive(&self, node_idx: u32, query: &Point, axis: usize, best: &mut Best) {
        let node = &self.nodes[node_idx as usize];
        let point = &self.points[node.point as usize];
        best.visited += 1;

        let dsq = point.squared_distance(query);
        if dsq < best.dist_sq || best.point == NIL {
            best.dist_sq = dsq;
            best.point = node.point;
        }

        let diff = query[axis] - point[axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };
        let next_axis = (axis + 1) % query.dim();

        if near != NIL {
            self.nearest_recursive(near, query, next_axis, best);
        }

        // Nothing beyond the splitting plane can be closer than the plane itself.
        if far != NIL && diff * diff <= best.dist_sq {
            self.nearest_recursive(far, query, next_axis, best);
        }
    }

    /// Runs [`nearest`](Self::nearest) for every query in parallel, preserving order.
    ///
    /// Fails if any query is invalid.
    pub fn nearest_batch(&self, queries: &[Point]) -> Result<Vec<Option<Neighbor<'_>>>, KdError> {
        queries.par_iter().map(|q| self.nearest(q)).collect()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges on the longest root-to-leaf path, `-1` when empty.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Dimensionality fixed by the first built point.
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Smallest box containing every stored point.
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    pub fn config(&self) -> BuildConfig {
        self.config
    }

    /// Stored points in left-root-right order. A structural dump for debugging,
    /// not sorted along any axis.
    pub fn inorder(&self) -> InorderIter<'_> {
        InorderIter {
            tree: self,
            stack: Vec::with_capacity((self.height + 1).max(0) as usize),
            current: if self.nodes.is_empty() { NIL } else { 0 },
        }
    }

    /// Drops every point and node, leaving an empty tree that can be built again.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.points.clear();
        self.dim = None;
        self.bounds = None;
        self.height = -1;
    }

    /// Checks the split ordering at every node: left descendants are `<=` and
    /// right descendants `>=` the node on its splitting axis.
    pub fn is_partitioned(&self) -> bool {
        let Some(dim) = self.dim else {
            return true;
        };
        self.is_partitioned_recursive(0, 0, dim)
    }

    fn is_partitioned_recursive(&self, node_idx: u32, axis: usize, dim: usize) -> bool {
        let node = &self.nodes[node_idx as usize];
        let split = self.points[node.point as usize][axis];
        let next_axis = (axis + 1) % dim;

        let mut subtree = Vec::new();
        self.collect_subtree(node.left, &mut subtree);
        if subtree.iter().any(|&i| self.points[i as usize][axis] > split) {
            return false;
        }
        subtree.clear();
        self.collect_subtree(node.right, &mut subtree);
        if subtree.iter().any(|&i| self.points[i as usize][axis] < split) {
            return false;
        }

        [node.left, node.right]
            .into_iter()
            .filter(|&child| child != NIL)
            .all(|child| self.is_partitioned_recursive(child, next_axis, dim))
    }

    fn collect_subtree(&self, node_idx: u32, out: &mut Vec<u32>) {
        if node_idx == NIL {
            return;
        }
        let node = &self.nodes[node_idx as usize];
        out.push(node.point);
        self.collect_subtree(node.left, out);
        self.collect_subtree(node.right, out);
    }
}

/// Node links are `u32` with `NIL` reserved, so `NIL` points or more cannot be addressed.
fn check_capacity(count: usize) -> Result<(), KdError> {
    if count >= NIL as usize {
        return Err(KdError::TooManyPoints { count });
    }
    Ok(())
}

/// Iterative in-order traversal over a [`KdTree`], see [`KdTree::inorder`].
pub struct InorderIter<'a> {
    tree: &'a KdTree,
    stack: Vec<u32>,
    current: u32,
}

impl<'a> Iterator for InorderIter<'a> {
    type Item = &'a Point;

    fn next(&mut self) -> Option<&'a Point> {
        let tree = self.tree;
        while self.current != NIL {
            self.stack.push(self.current);
            self.current = tree.nodes[self.current as usize].left;
        }
        let node = &tree.nodes[self.stack.pop()? as usize];
        self.current = node.right;
        Some(&tree.points[node.point as usize])
    }
}
