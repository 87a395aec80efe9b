// Clusterer trait: swap-ready abstraction.
//
// The labeling pipeline only needs "vectors in, assignments out". The
// default implementation is the fixed-pass cosine k-means in `kmeans`, but
// another strategy can be dropped in without touching the pipeline.

use anyhow::Result;

use super::vocabulary::DocumentVector;

/// Trait for grouping document vectors into topics.
pub trait TopicClusterer {
    /// Number of clusters this clusterer produces.
    fn num_topics(&self) -> usize;

    /// Assign each vector a 0-based cluster id in `[0, num_topics)`.
    /// The result has one entry per input vector, in input order.
    fn cluster(&self, vectors: &[DocumentVector]) -> Result<Vec<usize>>;
}
