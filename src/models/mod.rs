pub mod movie;

pub use movie::{CatalogRow, Movie, ScoredMovie};
