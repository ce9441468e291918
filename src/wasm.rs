use crate::bounds::BoundingBox;
use crate::config::{BuildConfig, PartitionStrategy};
use crate::error::KdError;
use crate::kdtree::KdTree;
use crate::point::{random_points, Point};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initThreads)]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

/// WASM wrapper around a [`KdTree`]. Points cross the boundary as flat coordinate arrays.
#[wasm_bindgen]
pub struct KdTreeJs {
    inner: KdTree,
    dim: usize,
}

#[wasm_bindgen]
impl KdTreeJs {
    /// Creates an empty tree for `dim`-dimensional points.
    /// `select` switches the median split from a stable sort to linear-time selection.
    #[wasm_bindgen(constructor)]
    pub fn new(dim: usize, select: bool) -> KdTreeJs {
        let strategy = if select {
            PartitionStrategy::Select
        } else {
            PartitionStrategy::Sort
        };
        KdTreeJs {
            inner: KdTree::with_config(BuildConfig::new(strategy)),
            dim,
        }
    }

    /// Builds the tree from `[x0, y0, ..., x1, y1, ...]`.
    pub fn build(&mut self, coords: &[f64]) -> Result<(), JsError> {
        let points = unflatten(coords, self.dim)?;
        self.inner.build(points)?;
        Ok(())
    }

    /// Builds the tree from `count` random points inside the box `[min, max]`.
    #[wasm_bindgen(js_name = buildRandom)]
    pub fn build_random(&mut self, count: usize, min: &[f64], max: &[f64]) -> Result<(), JsError> {
        if min.len() != self.dim {
            let err = KdError::DimensionMismatch {
                expected: self.dim,
                found: min.len(),
            };
            return Err(err.into());
        }
        let bounds = BoundingBox::new(min.to_vec(), max.to_vec())?;
        self.inner.build(random_points(count, &bounds))?;
        Ok(())
    }

    /// Nearest stored point as `[coords..., dist_sq]`, or `undefined` for an empty tree.
    pub fn nearest(&self, query: &[f64]) -> Result<Option<Box<[f64]>>, JsError> {
        let query = Point::new(query.to_vec());
        let result = self.inner.nearest(&query)?.map(|n| {
            let mut out = n.point.coords().to_vec();
            out.push(n.dist_sq);
            out.into_boxed_slice()
        });
        Ok(result)
    }

    /// Nearest neighbors of a flat list of queries, in parallel.
    /// Returns `dim + 1` values per query (`[coords..., dist_sq]`), empty for an empty tree.
    #[wasm_bindgen(js_name = nearestBatch)]
    pub fn nearest_batch(&self, queries: &[f64]) -> Result<Box<[f64]>, JsError> {
        let queries = unflatten(queries, self.dim)?;
        let results = self.inner.nearest_batch(&queries)?;
        let mut out = Vec::with_capacity(results.len() * (self.dim + 1));
        for n in results.into_iter().flatten() {
            out.extend_from_slice(n.point.coords());
            out.push(n.dist_sq);
        }
        Ok(out.into_boxed_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> i32 {
        self.inner.height()
    }

    /// Stored coordinates, flattened, in left-root-right node order.
    pub fn inorder(&self) -> Box<[f64]> {
        self.inner
            .inorder()
            .flat_map(|p| p.coords().iter().copied())
            .collect()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

/// Splits a flat coordinate array into `dim`-dimensional points.
fn unflatten(coords: &[f64], dim: usize) -> Result<Vec<Point>, KdError> {
    if dim == 0 {
        return Err(KdError::ZeroDimension);
    }
    let rest = coords.len() % dim;
    if rest != 0 {
        return Err(KdError::DimensionMismatch { expected: dim, found: rest });
    }
    Ok(coords.chunks_exact(dim).map(|c| Point::new(c.to_vec())).collect())
}
