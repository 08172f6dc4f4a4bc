use std::{fs::File, io::Read, path::Path};

use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogRow, Movie},
};

/// Columns every catalog source must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "title", "overview", "genre"];

/// Ordered, immutable list of movies
///
/// The position of a movie in the catalog is its row in the similarity matrix.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Loads a catalog from a CSV file on disk
    #[instrument]
    pub fn from_path(path: impl AsRef<Path> + std::fmt::Debug) -> AppResult<Self> {
        let file = File::open(path.as_ref())?;
        let catalog = Self::from_reader(file)?;
        tracing::info!(
            path = %path.as_ref().display(),
            movies = catalog.len(),
            "Loaded movie catalog"
        );
        Ok(catalog)
    }

    /// Loads a catalog from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| AppError::malformed("unreadable header row", e))?
            .clone();

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MalformedSource(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut movies = Vec::new();
        for (row, record) in reader.deserialize::<CatalogRow>().enumerate() {
            let record = record.map_err(|e| AppError::malformed(&format!("row {}", row + 1), e))?;
            if record.overview.is_none() || record.genre.is_none() {
                tracing::debug!(id = record.id, "Movie has missing overview or genre text");
            }
            movies.push(Movie::from(record));
        }

        Ok(Self { movies })
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id,title,overview,genre,popularity
1,Inception,A thief who steals secrets through dreams,Action,83.1
2,Up,An old man ties balloons to his house,Animation,41.0
3,Heat,,Crime,20.5
";

    #[test]
    fn test_load_preserves_order_and_builds_tags() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 3);

        let titles: Vec<&str> = catalog.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Inception", "Up", "Heat"]);
        assert_eq!(
            catalog.get(0).unwrap().tag,
            "A thief who steals secrets through dreams Action"
        );
        assert_eq!(catalog.get(1).unwrap().id, 2);
    }

    #[test]
    fn test_empty_overview_is_tolerated() {
        let catalog = Catalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.get(2).unwrap().tag, " Crime");
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let source = "id,title,overview\n1,Inception,Dreams\n";
        let err = Catalog::from_reader(source.as_bytes()).unwrap_err();
        match err {
            AppError::MalformedSource(msg) => assert!(msg.contains("genre")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_id_is_malformed() {
        let source = "id,title,overview,genre\nabc,Inception,Dreams,Action\n";
        let err = Catalog::from_reader(source.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MalformedSource(_)));
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let source = "id,title,overview,genre\n1,Inception,Dreams\n";
        let err = Catalog::from_reader(source.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MalformedSource(_)));
    }

    #[test]
    fn test_header_only_source_is_empty() {
        let catalog = Catalog::from_reader("id,title,overview,genre\n".as_bytes()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Catalog::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
