use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// An upstream store that can produce the full article dataset in one call.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Fetch every row from the upstream store.
    async fn load(&self) -> Result<Vec<Article>>;
}
