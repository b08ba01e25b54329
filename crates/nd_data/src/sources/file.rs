use std::path::PathBuf;

use async_trait::async_trait;

use nd_core::{Article, ArticleSource, Result};

use super::{rows_into_articles, ArticleRow};

/// Local-file variant of the object-store source: the same JSON array of
/// rows, read from disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl ArticleSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn load(&self) -> Result<Vec<Article>> {
        let raw = tokio::fs::read(&self.path).await?;
        let rows: Vec<ArticleRow> = serde_json::from_slice(&raw)?;
        rows_into_articles(rows)
    }
}
