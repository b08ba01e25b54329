use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use nd_core::{Article, Error, Result};

pub mod file;
pub mod memory;
pub mod object_store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileSource;
pub use memory::StaticSource;
pub use object_store::ObjectStoreSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;

/// One raw dataset row as shipped by the upstream store. The publish date
/// arrives as an ISO-like string and is normalized to UTC here.
#[derive(Debug, Clone, Deserialize)]
pub struct ArticleRow {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: String,
    pub source: String,
    #[serde(default)]
    pub topic1: String,
    #[serde(default)]
    pub topic2: String,
    pub publish_date: String,
}

impl ArticleRow {
    pub fn into_article(self) -> Result<Article> {
        let publish_date = parse_publish_date(&self.publish_date)?;
        Ok(Article {
            title: self.title,
            summary: self.summary,
            link: self.link,
            image: self.image,
            source: self.source,
            topic1: self.topic1,
            topic2: self.topic2,
            publish_date,
        })
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD`
/// (interpreted as midnight UTC).
pub fn parse_publish_date(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)));
    }
    Err(Error::InvalidDate(raw.to_string()))
}

pub(crate) fn rows_into_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>> {
    let mut articles = rows
        .into_iter()
        .map(ArticleRow::into_article)
        .collect::<Result<Vec<_>>>()?;
    // Newest first; the query engine preserves whatever order the source set.
    articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    Ok(articles)
}
