pub mod catalog;
pub mod index;
pub mod recommendations;
pub mod similarity;
pub mod stop_words;
pub mod vectorizer;

pub use catalog::Catalog;
pub use index::SimilarityIndex;
pub use recommendations::Recommender;
pub use vectorizer::{StopWordMode, VectorizerSettings};
