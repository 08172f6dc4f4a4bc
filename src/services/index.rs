use std::collections::HashMap;
use std::time::Instant;

use tracing::instrument;

use crate::{
    error::AppResult,
    models::Movie,
    services::{
        catalog::Catalog,
        similarity::SimilarityMatrix,
        vectorizer::{Vectorizer, VectorizerSettings, Vocabulary},
    },
};

/// Immutable recommendation index built once from a catalog
///
/// Row `i` of the catalog is row and column `i` of the similarity matrix.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    catalog: Catalog,
    vocabulary: Vocabulary,
    similarity: SimilarityMatrix,
    /// Lowercased title -> first row carrying it
    title_rows: HashMap<String, usize>,
    /// Lowercased tags, parallel to the catalog
    search_tags: Vec<String>,
}

impl SimilarityIndex {
    /// Vectorizes every tag and computes the all-pairs similarity matrix
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn build(catalog: Catalog, settings: VectorizerSettings) -> AppResult<Self> {
        let started = Instant::now();
        let vectorizer = Vectorizer::new(settings)?;

        let tags: Vec<&str> = catalog.iter().map(|m| m.tag.as_str()).collect();
        let (vocabulary, terms) = vectorizer.fit_transform(&tags);
        let similarity = SimilarityMatrix::from_terms(&terms);

        let mut title_rows = HashMap::new();
        for (row, movie) in catalog.iter().enumerate() {
            title_rows.entry(movie.title.to_lowercase()).or_insert(row);
        }
        let search_tags = catalog.iter().map(|m| m.tag.to_lowercase()).collect();

        tracing::info!(
            movies = catalog.len(),
            vocabulary = vocabulary.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Built similarity index"
        );

        Ok(Self {
            catalog,
            vocabulary,
            similarity,
            title_rows,
            search_tags,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn movie(&self, row: usize) -> Option<&Movie> {
        self.catalog.get(row)
    }

    /// Case-insensitive exact title lookup
    pub fn find_title(&self, title: &str) -> Option<usize> {
        self.title_rows.get(&title.to_lowercase()).copied()
    }

    /// Rows whose tag contains `needle`, which must already be lowercase
    pub(crate) fn rows_matching(&self, needle: &str) -> Vec<usize> {
        self.search_tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| tag.contains(needle))
            .map(|(row, _)| row)
            .collect()
    }
}
