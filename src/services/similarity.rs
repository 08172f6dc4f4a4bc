use tracing::instrument;

use super::vectorizer::TermMatrix;

/// Compute the magnitude (L2 norm) of a count vector.
pub fn compute_magnitude(counts: &[u32]) -> f64 {
    counts
        .iter()
        .map(|&c| {
            let c = c as f64;
            c * c
        })
        .sum::<f64>()
        .sqrt()
}

/// Turns a dot product into a cosine similarity.
///
/// Returns 0.0 when either magnitude is zero. Counts are non-negative, so the
/// result is clamped to [0.0, 1.0].
fn cosine_from_dot(dot: f64, mag_a: f64, mag_b: f64) -> f64 {
    let denom = mag_a * mag_b;
    if denom == 0.0 {
        return 0.0;
    }

    let result = dot / denom;
    if !result.is_finite() {
        return 0.0;
    }
    result.clamp(0.0, 1.0)
}

/// Cosine similarity of two count vectors with pre-computed magnitudes.
pub fn cosine_similarity_with_magnitude(a: &[u32], b: &[u32], mag_a: f64, mag_b: f64) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum();
    cosine_from_dot(dot, mag_a, mag_b)
}

/// Non-zero `(column, count)` entries of a dense count row.
fn nonzero_entries(row: &[u32]) -> Vec<(usize, u32)> {
    row.iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(column, &count)| (column, count))
        .collect()
}

/// Dot product of a sparse row against a dense one.
fn sparse_dot(sparse: &[(usize, u32)], dense: &[u32]) -> f64 {
    sparse
        .iter()
        .map(|&(column, count)| count as f64 * dense[column] as f64)
        .sum()
}

/// Cosine similarity of two count vectors.
pub fn cosine_similarity(a: &[u32], b: &[u32]) -> f64 {
    cosine_similarity_with_magnitude(a, b, compute_magnitude(a), compute_magnitude(b))
}

/// Dense, symmetric all-pairs similarity matrix
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Computes cosine similarity between every pair of rows
    ///
    /// Only the upper triangle is computed; the lower one is mirrored so that
    /// `get(i, j) == get(j, i)` holds exactly.
    #[instrument(skip_all, fields(rows = terms.rows()))]
    pub fn from_terms(terms: &TermMatrix) -> Self {
        let size = terms.rows();
        let nonzero: Vec<Vec<(usize, u32)>> =
            (0..size).map(|i| nonzero_entries(terms.row(i))).collect();
        let magnitudes: Vec<f64> = nonzero
            .iter()
            .map(|entries| {
                entries
                    .iter()
                    .map(|&(_, c)| c as f64 * c as f64)
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();
        let mut values = vec![0.0; size * size];

        // Each dot product walks the non-zero columns of row i only
        for i in 0..size {
            if magnitudes[i] == 0.0 {
                continue;
            }
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                if magnitudes[j] == 0.0 {
                    continue;
                }
                let dot = sparse_dot(&nonzero[i], terms.row(j));
                let sim = cosine_from_dot(dot, magnitudes[i], magnitudes[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }

        let empty_rows = magnitudes.iter().filter(|&&m| m == 0.0).count();
        if empty_rows > 0 {
            tracing::warn!(empty_rows, "Some movies share no vocabulary and match nothing");
        }

        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Similarities of one movie to every movie, in catalog order
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vectorizer::{Vectorizer, VectorizerSettings};

    fn matrix_for(docs: &[&str]) -> SimilarityMatrix {
        let vectorizer = Vectorizer::new(VectorizerSettings::default()).unwrap();
        let (_, terms) = vectorizer.fit_transform(docs);
        SimilarityMatrix::from_terms(&terms)
    }

    #[test]
    fn test_identical_vectors() {
        let v = vec![1u32, 2, 3];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_orthogonal_vectors() {
        assert!(cosine_similarity(&[1, 0], &[0, 1]).abs() < 1e-10);
    }

    #[test]
    fn test_zero_magnitude() {
        assert_eq!(cosine_similarity(&[0, 0], &[1, 2]), 0.0);
        assert_eq!(cosine_similarity(&[0, 0], &[0, 0]), 0.0);
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1], &[1, 2]), 0.0);
    }

    #[test]
    fn test_magnitude_basic() {
        assert!((compute_magnitude(&[3, 4]) - 5.0).abs() < 1e-10);
        assert_eq!(compute_magnitude(&[]), 0.0);
    }

    #[test]
    fn test_matrix_shared_terms() {
        let m = matrix_for(&["space war robots", "love drama family", "space battle robots"]);
        assert_eq!(m.size(), 3);
        assert!((m.get(0, 2) - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(m.get(0, 1), 0.0);
        assert!(m.get(0, 2) > m.get(0, 1));
    }

    #[test]
    fn test_sparse_dot_skips_zero_columns() {
        let dense = [0u32, 3, 0, 2];
        let entries = nonzero_entries(&[1, 0, 0, 4]);
        assert_eq!(entries, vec![(0, 1), (3, 4)]);
        assert_eq!(sparse_dot(&entries, &dense), 8.0);
    }

    #[test]
    fn test_matrix_matches_dense_cosine() {
        let docs = [
            "space war robots space",
            "love drama family love love",
            "space battle robots drama",
            "family space comedy",
            "the",
        ];
        let vectorizer = Vectorizer::new(VectorizerSettings::default()).unwrap();
        let (_, terms) = vectorizer.fit_transform(&docs);
        let m = SimilarityMatrix::from_terms(&terms);

        for i in 0..docs.len() {
            for j in 0..docs.len() {
                if i == j {
                    continue;
                }
                let dense = cosine_similarity(terms.row(i), terms.row(j));
                assert!((m.get(i, j) - dense).abs() < 1e-12, "({i}, {j})");
            }
        }
    }

    #[test]
    fn test_matrix_invariants() {
        let m = matrix_for(&[
            "a heist inside dreams thriller",
            "dreams of a family drama",
            "robots at war in space",
            "the",
            "space family comedy",
        ]);
        for i in 0..m.size() {
            for j in 0..m.size() {
                let v = m.get(i, j);
                assert!((0.0..=1.0).contains(&v), "({i}, {j}) = {v}");
                assert_eq!(v, m.get(j, i));
            }
        }
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(4, 4), 1.0);
        // "the" is a stop word, so that row has no terms at all
        assert_eq!(m.get(3, 3), 0.0);
        assert_eq!(m.row(3), &[0.0; 5]);
    }
}
