use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use movie_recs::{models::ScoredMovie, AppError, Catalog, Config, Recommender, SimilarityIndex};

const HEADER: &str = "Recommendations for You:";
const RULE: &str = "------------------------------";

#[derive(Debug, Parser)]
#[command(name = "movie-recs", about = "Recommend movies by title or genre")]
struct Cli {
    #[command(subcommand)]
    search: Search,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Search {
    /// Movies similar to the given title
    Title { query: String },
    /// A random pick of movies mentioning the given genre
    Genre { query: String },
}

#[derive(Debug, Serialize)]
struct Output<'a> {
    mode: &'static str,
    query: &'a str,
    titles: &'a [String],
    /// Similarity scores, present for title searches
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<&'a [ScoredMovie]>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let (mode, query) = match &cli.search {
        Search::Title { query } => ("title", query.as_str()),
        Search::Genre { query } => ("genre", query.as_str()),
    };
    if query.trim().is_empty() {
        let what = if mode == "title" { "a movie title" } else { "a genre" };
        return Err(AppError::InvalidInput(format!("Please enter {}.", what)).into());
    }

    let catalog = Catalog::from_path(&config.catalog_path)?;
    let index = SimilarityIndex::build(catalog, config.vectorizer_settings())?;
    let recommender = Recommender::with_limit(Arc::new(index), config.max_recommendations);

    let (titles, scores) = match &cli.search {
        Search::Title { query } => {
            let scored = recommender.similar_movies(query);
            let titles: Vec<String> = scored.iter().map(|m| m.title.clone()).collect();
            (titles, Some(scored))
        }
        Search::Genre { query } => (recommender.recommend_by_genre(query), None),
    };

    if cli.json {
        let output = Output {
            mode,
            query,
            titles: &titles,
            scores: scores.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if titles.is_empty() {
        match mode {
            "title" => println!("Movie not found in the dataset."),
            _ => println!("No movies found in the selected genre."),
        }
    } else {
        println!("{}\n{}\n{}", HEADER, RULE, titles.join("\n"));
    }

    Ok(())
}
