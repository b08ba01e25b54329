use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use nd_core::{Article, ArticleSource, Error, Result};

use super::parse_publish_date;

/// Relational variant of the dataset: one SELECT over the articles table.
pub struct SqliteSource {
    pool: SqlitePool,
    table: String,
    db_path: PathBuf,
}

impl SqliteSource {
    /// Connect against the main articles table.
    pub async fn new(db_path: &Path) -> Result<Self> {
        Self::with_table(db_path, "articles").await
    }

    /// Connect against an alternate table, e.g. the word-cloud corpus.
    pub async fn with_table(db_path: &Path, table: impl Into<String>) -> Result<Self> {
        let pool = SqlitePool::connect(&format!("sqlite:{}", db_path.display()))
            .await
            .map_err(|e| Error::Source(format!("failed to connect to database: {}", e)))?;
        Ok(Self {
            pool,
            table: table.into(),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }
}

#[async_trait]
impl ArticleSource for SqliteSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self) -> Result<Vec<Article>> {
        let query = format!(
            "SELECT title, summary, link, image, source, topic1, topic2, publish_date \
             FROM {} ORDER BY publish_date DESC",
            self.table
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Source(format!("failed to query {}: {}", self.table, e)))?;

        rows.into_iter()
            .map(|row| {
                let raw_date: String = row.get("publish_date");
                Ok(Article {
                    title: row.get("title"),
                    summary: row.get::<Option<String>, _>("summary").unwrap_or_default(),
                    link: row.get::<Option<String>, _>("link").unwrap_or_default(),
                    image: row.get::<Option<String>, _>("image").unwrap_or_default(),
                    source: row.get("source"),
                    topic1: row.get::<Option<String>, _>("topic1").unwrap_or_default(),
                    topic2: row.get::<Option<String>, _>("topic2").unwrap_or_default(),
                    publish_date: parse_publish_date(&raw_date)?,
                })
            })
            .collect()
    }
}
