// Cosine k-means with deterministic seeding and a fixed number of passes.
//
// Centroids start as the first k document vectors in corpus order. Each
// pass re-assigns every document to its most similar centroid, then
// rebuilds the centroid set as the mean of each cluster's members. There
// is no convergence test: the loop always runs `max_iterations` passes, so
// the same corpus and parameters always give the same labels.

use anyhow::Result;
use tracing::debug;

use super::similarity::cosine_similarity;
use super::traits::TopicClusterer;
use super::vocabulary::DocumentVector;

/// Fixed-pass cosine k-means.
#[derive(Debug, Clone)]
pub struct KMeans {
    /// Number of clusters (must be between 1 and the document count)
    pub k: usize,
    /// Exact number of assign/update passes to run
    pub max_iterations: usize,
}

impl KMeans {
    pub fn new(k: usize, max_iterations: usize) -> Self {
        Self { k, max_iterations }
    }

    /// Reject parameters that can't produce k seeded clusters.
    fn check(&self, n: usize) -> Result<()> {
        if self.k == 0 {
            anyhow::bail!("Number of topics must be at least 1");
        }
        if self.k > n {
            anyhow::bail!(
                "Cannot form {} topics from {} documents; lower the topic count or \
                 relax the minimum text length",
                self.k,
                n
            );
        }
        if self.max_iterations == 0 {
            anyhow::bail!("max_iterations must be at least 1");
        }
        Ok(())
    }
}

impl TopicClusterer for KMeans {
    fn num_topics(&self) -> usize {
        self.k
    }

    fn cluster(&self, vectors: &[DocumentVector]) -> Result<Vec<usize>> {
        self.check(vectors.len())?;

        let mut centroids: Vec<DocumentVector> = vectors[..self.k].to_vec();
        let mut assignments = vec![0; vectors.len()];

        for iteration in 0..self.max_iterations {
            let next = assign(vectors, &centroids);
            let moved = next
                .iter()
                .zip(assignments.iter())
                .filter(|(a, b)| a != b)
                .count();
            assignments = next;
            centroids = update_centroids(vectors, &assignments, &centroids);

            debug!(iteration, moved, "k-means pass complete");
        }

        Ok(assignments)
    }
}

/// Index of the most similar centroid.
///
/// Starts at 0 and only moves on a strictly greater similarity, so ties
/// (including all-zero similarity) resolve to the lowest index.
pub fn nearest_centroid(vector: &[f64], centroids: &[DocumentVector]) -> usize {
    let mut best = 0;
    let mut best_sim = f64::NEG_INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let sim = cosine_similarity(vector, centroid);
        if sim > best_sim {
            best = i;
            best_sim = sim;
        }
    }
    best
}

/// Assignment step: every vector to its nearest centroid.
pub fn assign(vectors: &[DocumentVector], centroids: &[DocumentVector]) -> Vec<usize> {
    vectors
        .iter()
        .map(|v| nearest_centroid(v, centroids))
        .collect()
}

/// Update step: a new centroid set from the previous one and the current
/// assignments. A cluster with members becomes their component-wise mean;
/// an empty cluster keeps its previous centroid.
pub fn update_centroids(
    vectors: &[DocumentVector],
    assignments: &[usize],
    previous: &[DocumentVector],
) -> Vec<DocumentVector> {
    previous
        .iter()
        .enumerate()
        .map(|(c, old)| {
            let members: Vec<&DocumentVector> = vectors
                .iter()
                .zip(assignments.iter())
                .filter(|(_, &a)| a == c)
                .map(|(v, _)| v)
                .collect();

            if members.is_empty() {
                return old.clone();
            }

            let mut mean = vec![0.0; old.len()];
            for member in &members {
                for (m, x) in mean.iter_mut().zip(member.iter()) {
                    *m += x;
                }
            }
            let count = members.len() as f64;
            for m in &mut mean {
                *m /= count;
            }
            mean
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_centroid_tie_goes_to_lowest_index() {
        let centroids = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        assert_eq!(nearest_centroid(&[1.0, 0.0], &centroids), 0);
        // Zero vector: every similarity is 0, so index 0 wins
        assert_eq!(nearest_centroid(&[0.0, 0.0], &centroids), 0);
    }

    #[test]
    fn test_nearest_centroid_strictly_greater_moves() {
        let centroids = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];
        assert_eq!(nearest_centroid(&[0.0, 1.0], &centroids), 1);
    }

    #[test]
    fn test_update_keeps_empty_cluster_centroid() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let previous = vec![vec![1.0, 0.0], vec![0.5, 0.5]];
        let updated = update_centroids(&vectors, &[0, 0], &previous);
        assert_eq!(updated[0], vec![0.5, 0.5]);
        assert_eq!(updated[1], vec![0.5, 0.5]);
    }

    #[test]
    fn test_k_one_assigns_everything_to_zero() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]];
        let labels = KMeans::new(1, 5).cluster(&vectors).unwrap();
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn test_k_greater_than_n_rejected() {
        let vectors = vec![vec![1.0]];
        let err = KMeans::new(2, 5).cluster(&vectors).unwrap_err();
        assert!(err.to_string().contains("2 topics from 1 documents"));
    }

    #[test]
    fn test_zero_k_and_zero_iterations_rejected() {
        let vectors = vec![vec![1.0], vec![0.0]];
        assert!(KMeans::new(0, 5).cluster(&vectors).is_err());
        assert!(KMeans::new(1, 0).cluster(&vectors).is_err());
    }

    #[test]
    fn test_worked_example() {
        let vectors = vec![
            vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
        ];

        let first = assign(&vectors, &vectors[..2]);
        assert_eq!(first, vec![0, 1, 0]);

        let centroids = update_centroids(&vectors, &first, &vectors[..2]);
        assert_eq!(centroids[0], vec![0.5, 0.5, 0.5, 0.0, 0.0, 0.5, 0.5, 0.5]);
        assert_eq!(centroids[1], vectors[1]);

        for passes in [1, 2, 20] {
            let labels = KMeans::new(2, passes).cluster(&vectors).unwrap();
            assert_eq!(labels, vec![0, 1, 0], "after {passes} passes");
        }
    }
}
