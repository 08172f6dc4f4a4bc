use std::collections::HashMap;

use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, AppResult};

use super::stop_words::StopWords;

/// Which stop words to drop while building the vocabulary
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StopWordMode {
    #[default]
    English,
    None,
}

impl StopWordMode {
    fn stop_words(self) -> StopWords {
        match self {
            StopWordMode::English => StopWords::english(),
            StopWordMode::None => StopWords::none(),
        }
    }
}

/// Tuning knobs for the bag-of-words vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorizerSettings {
    /// Keep at most this many tokens, ranked by corpus frequency
    pub max_features: usize,
    pub stop_words: StopWordMode,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self {
            max_features: 10_000,
            stop_words: StopWordMode::English,
        }
    }
}

/// Lowercases text, then splits it into tokens of two or more word characters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Token to column mapping, fixed once built
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    tokens: Vec<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Column assigned to a token, if it was retained
    pub fn column(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    /// Retained tokens in column order
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// Dense term counts, one row per document
#[derive(Debug, Clone)]
pub struct TermMatrix {
    rows: usize,
    cols: usize,
    counts: Vec<u32>,
}

impl TermMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, index: usize) -> &[u32] {
        &self.counts[index * self.cols..(index + 1) * self.cols]
    }
}

/// Bag-of-words vectorizer over a bounded vocabulary
#[derive(Debug, Clone)]
pub struct Vectorizer {
    max_features: usize,
    stop_words: StopWords,
}

impl Vectorizer {
    pub fn new(settings: VectorizerSettings) -> AppResult<Self> {
        if settings.max_features == 0 {
            return Err(AppError::InvalidInput(
                "max_features must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            max_features: settings.max_features,
            stop_words: settings.stop_words.stop_words(),
        })
    }

    fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        tokenize(text)
            .into_iter()
            .filter(move |token| !self.stop_words.contains(token))
    }

    /// Builds the vocabulary from a corpus
    ///
    /// Tokens are ranked by total count; equal counts keep first-seen order.
    pub fn fit<'a, I>(&self, documents: I) -> Vocabulary
    where
        I: IntoIterator<Item = &'a str>,
    {
        // token -> (count, first seen position)
        let mut frequencies: HashMap<String, (u64, usize)> = HashMap::new();
        for document in documents {
            for token in self.tokens(document) {
                let next = frequencies.len();
                frequencies.entry(token).or_insert((0, next)).0 += 1;
            }
        }

        let mut ranked: Vec<(String, u64, usize)> = frequencies
            .into_iter()
            .map(|(token, (count, first_seen))| (token, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(self.max_features);

        let tokens: Vec<String> = ranked.into_iter().map(|(token, _, _)| token).collect();
        let index = tokens
            .iter()
            .enumerate()
            .map(|(column, token)| (token.clone(), column))
            .collect();

        Vocabulary { index, tokens }
    }

    /// Counts vocabulary tokens in each document
    pub fn transform<'a, I>(&self, vocabulary: &Vocabulary, documents: I) -> TermMatrix
    where
        I: IntoIterator<Item = &'a str>,
    {
        let cols = vocabulary.len();
        let mut counts = Vec::new();
        let mut rows = 0;
        for document in documents {
            let mut row = vec![0u32; cols];
            for token in self.tokens(document) {
                if let Some(column) = vocabulary.column(&token) {
                    row[column] += 1;
                }
            }
            counts.extend(row);
            rows += 1;
        }
        TermMatrix { rows, cols, counts }
    }

    #[instrument(skip_all)]
    pub fn fit_transform(&self, documents: &[&str]) -> (Vocabulary, TermMatrix) {
        let vocabulary = self.fit(documents.iter().copied());
        let matrix = self.transform(&vocabulary, documents.iter().copied());
        tracing::debug!(
            documents = matrix.rows(),
            vocabulary = vocabulary.len(),
            "Vectorized corpus"
        );
        (vocabulary, matrix)
    }
}
