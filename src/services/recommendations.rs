use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};

use crate::{models::ScoredMovie, services::index::SimilarityIndex};

/// Default number of titles returned per query
pub const DEFAULT_LIMIT: usize = 5;

/// Answers title and genre queries against a shared, read-only index
#[derive(Debug, Clone)]
pub struct Recommender {
    index: Arc<SimilarityIndex>,
    limit: usize,
}

impl Recommender {
    pub fn new(index: SimilarityIndex) -> Self {
        Self::with_limit(Arc::new(index), DEFAULT_LIMIT)
    }

    pub fn with_limit(index: Arc<SimilarityIndex>, limit: usize) -> Self {
        Self { index, limit }
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Movies most similar to the one titled `query`, best first
    ///
    /// The title must match exactly, ignoring case. Equal scores keep catalog
    /// order and the queried movie is never part of the result.
    pub fn similar_movies(&self, query: &str) -> Vec<ScoredMovie> {
        if query.is_empty() {
            return Vec::new();
        }
        let Some(row) = self.index.find_title(query) else {
            tracing::debug!(query, "No exact title match");
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = self
            .index
            .similarity()
            .row(row)
            .iter()
            .copied()
            .enumerate()
            .filter(|&(other, _)| other != row)
            .collect();
        // sort_by is stable, so ties stay in catalog order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .take(self.limit)
            .filter_map(|(other, score)| {
                self.index.movie(other).map(|movie| ScoredMovie {
                    id: movie.id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Titles of the movies most similar to `query`
    pub fn recommend_by_title(&self, query: &str) -> Vec<String> {
        self.similar_movies(query)
            .into_iter()
            .map(|movie| movie.title)
            .collect()
    }

    /// A random sample of titles whose tag text contains `query`
    ///
    /// Only the empty string is refused; any other substring, whitespace
    /// included, is matched as-is.
    pub fn recommend_by_genre(&self, query: &str) -> Vec<String> {
        self.recommend_by_genre_with_rng(query, &mut rand::thread_rng())
    }

    /// Same as [`Self::recommend_by_genre`] with a caller-supplied random source
    pub fn recommend_by_genre_with_rng<R: Rng + ?Sized>(
        &self,
        query: &str,
        rng: &mut R,
    ) -> Vec<String> {
        if query.is_empty() {
            return Vec::new();
        }

        let mut rows = self.index.rows_matching(&query.to_lowercase());
        tracing::debug!(query, candidates = rows.len(), "Genre search");
        rows.shuffle(rng);

        rows.into_iter()
            .take(self.limit)
            .filter_map(|row| self.index.movie(row).map(|movie| movie.title.clone()))
            .collect()
    }
}
