/// How the median is brought into place on each recursive split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PartitionStrategy {
    /// Stable sort of the whole range on the split axis. Equal coordinates keep input order.
    #[default]
    Sort,
    /// Linear-time selection (`select_nth_unstable_by`). Faster, tie order is unspecified.
    Select,
}

/// Construction options for a [`KdTree`](crate::KdTree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildConfig {
    pub strategy: PartitionStrategy,
}

impl BuildConfig {
    pub fn new(strategy: PartitionStrategy) -> Self {
        Self { strategy }
    }
}
