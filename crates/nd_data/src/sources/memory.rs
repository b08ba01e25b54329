use async_trait::async_trait;

use nd_core::{Article, ArticleSource, Result};

/// Fixed in-memory dataset. Used by tests and local demos; rows are served
/// in the order given.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    articles: Vec<Article>,
}

impl StaticSource {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl ArticleSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<Vec<Article>> {
        Ok(self.articles.clone())
    }
}
