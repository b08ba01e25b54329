use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nd_core::{ArticleSource, Error, Result};
use nd_data::{CacheConfig, FileSource, ObjectStoreSource, SqliteSource, TableCache};
use nd_web::{create_app, AppState};

/// Duration flag syntax: `90s`, `30m`, `1h30m`, `1d`. A bare number means
/// seconds.
#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut digits = String::new();
        let mut has_value = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
                continue;
            }
            if c.is_whitespace() && digits.is_empty() {
                continue;
            }
            let value: u64 = digits
                .parse()
                .map_err(|_| format!("expected a number before '{}'", c))?;
            let unit = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("invalid duration unit: {}", c)),
            };
            total_seconds += value * unit;
            digits.clear();
            has_value = true;
        }

        if !digits.is_empty() {
            total_seconds += digits
                .parse::<u64>()
                .map_err(|_| "invalid number in duration".to_string())?;
            has_value = true;
        }

        if !has_value {
            return Err("duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(name = "nd", author, version, about = "News article dashboard server", long_about = None)]
struct Cli {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Backing store for the dataset: object-store, file, or sqlite
    #[arg(long, default_value = "object-store")]
    source: String,

    /// URL of the dataset JSON (object-store source)
    #[arg(long, env = "NEWSDASH_DATA_URL")]
    data_url: Option<String>,

    /// Local path to the dataset JSON (file source)
    #[arg(long, env = "NEWSDASH_DATA_PATH")]
    data_path: Option<PathBuf>,

    /// SQLite database path (sqlite source)
    #[arg(long, env = "NEWSDASH_DB")]
    db: Option<PathBuf>,

    /// Word-cloud corpus JSON URL; the corpus shares the main dataset when
    /// no corpus location is given
    #[arg(long, env = "NEWSDASH_CORPUS_URL")]
    corpus_url: Option<String>,

    /// Local path to the corpus JSON
    #[arg(long, env = "NEWSDASH_CORPUS_PATH")]
    corpus_path: Option<PathBuf>,

    /// Corpus table name (sqlite source)
    #[arg(long)]
    corpus_table: Option<String>,

    #[arg(long, default_value = "1h")]
    cache_ttl: HumanDuration,

    #[arg(long, default_value = "30s")]
    load_timeout: HumanDuration,

    /// Articles returned per page
    #[arg(long, default_value_t = 21)]
    page_size: usize,

    /// Load both tables at startup instead of on first request
    #[arg(long)]
    eager: bool,
}

async fn build_main_source(cli: &Cli) -> Result<Arc<dyn ArticleSource>> {
    match cli.source.as_str() {
        "object-store" => {
            let url = cli.data_url.as_deref().ok_or_else(|| {
                Error::Source("--data-url or NEWSDASH_DATA_URL is required".to_string())
            })?;
            Ok(Arc::new(ObjectStoreSource::new(url)?))
        }
        "file" => {
            let path = cli.data_path.as_ref().ok_or_else(|| {
                Error::Source("--data-path or NEWSDASH_DATA_PATH is required".to_string())
            })?;
            Ok(Arc::new(FileSource::new(path)))
        }
        "sqlite" => {
            let db = cli
                .db
                .as_ref()
                .ok_or_else(|| Error::Source("--db or NEWSDASH_DB is required".to_string()))?;
            Ok(Arc::new(SqliteSource::new(db).await?))
        }
        other => Err(Error::Source(format!(
            "unknown source '{}': expected object-store, file, or sqlite",
            other
        ))),
    }
}

async fn build_corpus_source(
    cli: &Cli,
    main: &Arc<dyn ArticleSource>,
) -> Result<Arc<dyn ArticleSource>> {
    if let Some(url) = &cli.corpus_url {
        return Ok(Arc::new(ObjectStoreSource::new(url)?));
    }
    if let Some(path) = &cli.corpus_path {
        return Ok(Arc::new(FileSource::new(path)));
    }
    if let Some(table) = &cli.corpus_table {
        let db = cli
            .db
            .as_ref()
            .ok_or_else(|| Error::Source("--corpus-table requires --db".to_string()))?;
        return Ok(Arc::new(SqliteSource::with_table(db, table.clone()).await?));
    }
    Ok(Arc::clone(main))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = CacheConfig {
        ttl: cli.cache_ttl.0,
        load_timeout: cli.load_timeout.0,
    };

    let main_source = build_main_source(&cli).await?;
    let corpus_source = build_corpus_source(&cli, &main_source).await?;

    let articles = Arc::new(TableCache::new(main_source, config.clone()));
    let corpus = Arc::new(TableCache::new(corpus_source, config));

    if cli.eager {
        match articles.refresh().await {
            Ok(table) => info!("eagerly loaded {} articles", table.len()),
            Err(e) => warn!("eager article load failed, retrying on first request: {}", e),
        }
        if let Err(e) = corpus.refresh().await {
            warn!("eager corpus load failed, retrying on first request: {}", e);
        }
    }

    let app = create_app(AppState::new(articles, corpus, cli.page_size)).await;

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("dashboard server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_parse_with_units() {
        assert_eq!(HumanDuration::from_str("90s").unwrap().0.as_secs(), 90);
        assert_eq!(HumanDuration::from_str("30m").unwrap().0.as_secs(), 1800);
        assert_eq!(HumanDuration::from_str("1h30m").unwrap().0.as_secs(), 5400);
        assert_eq!(HumanDuration::from_str("1d").unwrap().0.as_secs(), 86400);
    }

    #[test]
    fn bare_numbers_are_seconds() {
        assert_eq!(HumanDuration::from_str("45").unwrap().0.as_secs(), 45);
    }

    #[test]
    fn malformed_durations_are_rejected() {
        assert!(HumanDuration::from_str("").is_err());
        assert!(HumanDuration::from_str("h").is_err());
        assert!(HumanDuration::from_str("10x").is_err());
    }
}
