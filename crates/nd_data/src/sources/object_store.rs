use async_trait::async_trait;
use url::Url;

use nd_core::{Article, ArticleSource, Error, Result};

use super::{rows_into_articles, ArticleRow};

/// Bulk GET of the dataset from an object store, as a JSON array of rows.
pub struct ObjectStoreSource {
    client: reqwest::Client,
    url: Url,
}

impl ObjectStoreSource {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::Source(format!("invalid data URL '{}': {}", url, e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ArticleSource for ObjectStoreSource {
    fn name(&self) -> &str {
        "object-store"
    }

    async fn load(&self) -> Result<Vec<Article>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let rows: Vec<ArticleRow> = response.json().await?;
        rows_into_articles(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_urls() {
        assert!(matches!(
            ObjectStoreSource::new("not a url"),
            Err(Error::Source(_))
        ));
        assert!(ObjectStoreSource::new("https://bucket.example.com/final_data.json").is_ok());
    }
}
