use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub image: String,
    pub source: String,
    pub topic1: String,
    pub topic2: String,
    pub publish_date: DateTime<Utc>,
}

/// An immutable snapshot of the article dataset.
///
/// Replaced wholesale on refresh; filtering always produces derived
/// sequences and never mutates the table in place.
#[derive(Debug, Clone, Default)]
pub struct ArticleTable {
    articles: Vec<Article>,
}

impl ArticleTable {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Distinct source labels in first-encountered casing, sorted.
    pub fn distinct_sources(&self) -> Vec<String> {
        distinct(self.articles.iter().map(|a| a.source.as_str()))
    }

    /// Distinct topic labels across both topic fields, sorted.
    pub fn distinct_topics(&self) -> Vec<String> {
        distinct(
            self.articles
                .iter()
                .flat_map(|a| [a.topic1.as_str(), a.topic2.as_str()]),
        )
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out: Vec<String> = values
        .filter(|v| !v.trim().is_empty())
        .filter(|v| seen.insert(v.to_lowercase()))
        .map(|v| v.to_string())
        .collect();
    out.sort();
    out
}
