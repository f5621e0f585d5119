use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::Catalog;
use pipeline::{FeatureSet, OptionalFeature};
use server::{
    format_votes, CatalogSession, QueryResult, RecommendError, RecommendationOrchestrator,
    RecommenderConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelMatch - find movies similar to one you like
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Case-based movie recommender using feature similarity", long_about = None)]
struct Cli {
    /// Path to the catalog CSV file
    #[arg(short, long, default_value = "imdb-top-rated-movies-user-rated.csv")]
    catalog: PathBuf,

    /// Leave an optional feature out of the comparison (repeatable)
    #[arg(long, value_enum, global = true)]
    ignore: Vec<FeatureArg>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FeatureArg {
    Director,
    Cast,
    Genre,
    Tags,
}

impl From<FeatureArg> for OptionalFeature {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Director => OptionalFeature::Director,
            FeatureArg::Cast => OptionalFeature::Cast,
            FeatureArg::Genre => OptionalFeature::Genre,
            FeatureArg::Tags => OptionalFeature::Tags,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Get movies similar to a title
    Recommend {
        /// Title to search for (case-insensitive substring, first match wins)
        #[arg(long)]
        title: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Show why each movie was recommended
        #[arg(long)]
        explain: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Browse the best-rated movies of a genre, or list genres
    Genre {
        /// Genre name; omit to list all genres
        #[arg(long)]
        name: Option<String>,

        /// Number of movies to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Show catalog statistics
    Stats,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading catalog from {}...", cli.catalog.display());
    let start = Instant::now();
    let catalog = Catalog::load_from_file(&cli.catalog).context("Failed to load movie catalog")?;

    let features = cli
        .ignore
        .iter()
        .fold(FeatureSet::for_catalog(&catalog), |set, f| set.without((*f).into()));
    let config = RecommenderConfig::default().with_features(features);
    let orchestrator = RecommendationOrchestrator::with_config(catalog, config)
        .context("Failed to build feature space")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        orchestrator.session().catalog().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            title,
            limit,
            explain,
            json,
        } => handle_recommend(&orchestrator, &title, limit, explain, json)?,
        Commands::Search { title } => handle_search(&orchestrator.session(), &title),
        Commands::Genre { name, limit } => handle_genre(&orchestrator.session(), name, limit),
        Commands::Stats => handle_stats(&orchestrator.session()),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    orchestrator: &RecommendationOrchestrator,
    title: &str,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    match orchestrator.recommend(title, limit) {
        Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
        Ok(result) => print_recommendations(&result, explain),
        Err(RecommendError::EmptyCatalog) => {
            println!(
                "{} The catalog is empty. Load a valid CSV to get recommendations.",
                "⚠".yellow()
            );
        }
        Err(err @ RecommendError::TitleNotFound { .. }) => {
            println!("{} {}", "✗".red(), err);
        }
        Err(err) => return Err(err).context("Recommendation failed"),
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(session: &CatalogSession, title: &str) {
    let catalog = session.catalog();
    let matches = catalog.search(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for idx in matches.into_iter().take(20) {
        if let Some(summary) = session.summary(idx) {
            println!(
                "  {} ({}) [{}] {}",
                summary.title,
                format_year(summary.year),
                summary.genres.as_deref().unwrap_or("-"),
                format_rating(summary.rating)
            );
        }
    }
}

/// Handle the 'genre' command
fn handle_genre(session: &CatalogSession, name: Option<String>, limit: usize) {
    let catalog = session.catalog();
    let Some(genre) = name else {
        println!("{}", "Available genres:".bold().blue());
        for genre in catalog.genres() {
            println!("  {} {}", "•".green(), genre);
        }
        return;
    };

    println!("{}", format!("Top {} {}:", limit, genre).bold().blue());
    for idx in catalog.top_in_genre(&genre, limit) {
        if let Some(summary) = session.summary(idx) {
            println!(
                "  {} {} ({})",
                "•".green(),
                summary.title,
                format_rating(summary.rating)
            );
        }
    }
}

/// Handle the 'stats' command
fn handle_stats(session: &CatalogSession) {
    let stats = session.stats();
    let space = session.feature_space();

    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Total movies: {}", "• ".cyan(), stats.total);
    match stats.mean_rating {
        Some(mean) => println!("{}Mean rating: {:.1}", "• ".cyan(), mean),
        None => println!("{}Mean rating: N/A", "• ".cyan()),
    }
    println!("{}Most voted: {}", "• ".cyan(), format_votes(stats.max_votes));
    println!(
        "{}Features: {} ({} directors, {} cast members, {} genres)",
        "• ".cyan(),
        space.dimension(),
        space.vocabularies.directors.len(),
        space.vocabularies.cast.len(),
        space.vocabularies.genres.len()
    );
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    let session = orchestrator.session();
    let catalog_len = session.catalog().len();
    if catalog_len == 0 {
        bail!("Cannot benchmark an empty catalog");
    }

    // Pick random catalog titles to query
    let titles: Vec<String> = (0..requests)
        .filter_map(|_| {
            let idx = rand::random::<u32>() as usize % catalog_len;
            session.catalog().get(idx).map(|m| m.title.clone())
        })
        .collect();

    info!("Running {} requests with concurrency {}", titles.len(), concurrent);
    let limiter = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall = Instant::now();

    let mut handles = vec![];
    for title in titles {
        let orchestrator = orchestrator.clone();
        let permit = limiter.clone().acquire_owned().await?;
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let start = Instant::now();
            orchestrator.recommend(&title, 10)?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = vec![];
    for handle in handles {
        timings.push(handle.await??);
    }
    let total_time = wall.elapsed();

    if timings.is_empty() {
        bail!("No requests were made");
    }
    timings.sort();
    let last = timings.len() - 1;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(last)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} requests/second",
        timings.len() as f64 / total_time.as_secs_f64()
    );

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(result: &QueryResult, explain: bool) {
    let base = &result.base;
    println!(
        "{} {} ({})",
        "Base movie:".bold().blue(),
        base.title.bold(),
        format_year(base.year)
    );
    println!(
        "  {} | Genre: {}",
        format_rating(base.rating),
        base.genres.as_deref().unwrap_or("-")
    );
    if let Some(url) = &base.poster_url {
        println!("  Poster: {}", url);
    }
    if result.genre_relaxed {
        println!(
            "{}",
            "No movie shares a genre with this one; showing the closest matches overall.".yellow()
        );
    }

    println!("{}", "Recommended movies:".bold().blue());
    if result.recommendations.is_empty() {
        println!("  (no other movies in the catalog)");
    }
    for (rank, rec) in result.recommendations.iter().enumerate() {
        let movie = &rec.movie;
        println!(
            "{}. {} ({}) [{}] - {} - Similarity: {:.3}",
            (rank + 1).to_string().green(),
            movie.title,
            format_year(movie.year),
            movie.genres.as_deref().unwrap_or("-"),
            format_rating(movie.rating),
            rec.score
        );
        if explain {
            println!("   Why: {}", rec.explanation);
        }
    }
}

fn format_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string())
}

fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(r) => format!("Rating: {:.1}", r),
        None => "Rating: N/A".to_string(),
    }
}
