use serde::Deserialize;

use crate::services::vectorizer::{StopWordMode, VectorizerSettings};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the movie catalog CSV
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Upper bound on vocabulary size
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    /// Stop-word filtering applied while building the vocabulary
    #[serde(default)]
    pub stop_words: StopWordMode,

    /// Maximum number of titles returned per query
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_catalog_path() -> String {
    "Movies_dataset.csv".to_string()
}

fn default_max_features() -> usize {
    10_000
}

fn default_max_recommendations() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn vectorizer_settings(&self) -> VectorizerSettings {
        VectorizerSettings {
            max_features: self.max_features,
            stop_words: self.stop_words,
        }
    }
}
