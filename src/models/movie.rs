use serde::{Deserialize, Serialize};

/// A movie as held by the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// Identifier carried over from the source table
    pub id: i64,
    /// Display title
    pub title: String,
    /// Overview and genre text joined by a single space
    pub tag: String,
}

impl Movie {
    /// Creates a movie, deriving the tag from overview and genre
    pub fn new(id: i64, title: String, overview: &str, genre: &str) -> Self {
        Self {
            id,
            title,
            tag: format!("{} {}", overview, genre),
        }
    }
}

/// One row of the source table as it appears on disk
///
/// Columns other than these four are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRow {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl From<CatalogRow> for Movie {
    fn from(row: CatalogRow) -> Self {
        // Missing text degrades to an empty string rather than rejecting the row
        let overview = row.overview.unwrap_or_default();
        let genre = row.genre.unwrap_or_default();
        Movie::new(row.id, row.title, &overview, &genre)
    }
}

/// A recommended movie together with its similarity to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredMovie {
    pub id: i64,
    pub title: String,
    pub score: f64,
}
