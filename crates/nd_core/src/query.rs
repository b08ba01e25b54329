use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::types::{Article, ArticleTable};
use crate::{Error, Result};

/// Sentinel value meaning "no constraint" for topic and source parameters.
const ALL: &str = "all";

/// Inclusive calendar-date range. Time-of-day is ignored on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    pub fn contains(&self, when: DateTime<Utc>) -> bool {
        let day = when.date_naive();
        self.start <= day && day <= self.end
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Optional filter predicates over the article table. All criteria are
/// normalized to lowercase on construction so matching stays allocation-light.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    topic: Option<String>,
    source: Option<String>,
    keyword: Option<String>,
    range: Option<DateRange>,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absent, empty, or `"all"` means no topic constraint.
    pub fn with_topic(mut self, topic: Option<&str>) -> Self {
        self.topic = normalize(topic);
        self
    }

    /// Absent, empty, or `"all"` means no source constraint.
    pub fn with_source(mut self, source: Option<&str>) -> Self {
        self.source = normalize(source);
        self
    }

    /// Empty keyword means no keyword constraint.
    pub fn with_keyword(mut self, keyword: Option<&str>) -> Self {
        self.keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_lowercase);
        self
    }

    pub fn with_date_range(mut self, range: Option<DateRange>) -> Self {
        self.range = range;
        self
    }

    /// Build a filter from raw request parameters.
    ///
    /// Date bounds must be supplied together; a malformed bound rejects the
    /// whole request rather than silently dropping the range.
    pub fn from_params(
        topic: Option<&str>,
        source: Option<&str>,
        keyword: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self> {
        let start = start_date.map(str::trim).filter(|s| !s.is_empty());
        let end = end_date.map(str::trim).filter(|s| !s.is_empty());
        let range = match (start, end) {
            (Some(start), Some(end)) => Some(DateRange::parse(start, end)?),
            (None, None) => None,
            _ => return Err(Error::IncompleteDateRange),
        };

        Ok(Self::new()
            .with_topic(topic)
            .with_source(source)
            .with_keyword(keyword)
            .with_date_range(range))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.topic.is_none()
            && self.source.is_none()
            && self.keyword.is_none()
            && self.range.is_none()
    }

    pub fn matches(&self, article: &Article) -> bool {
        if let Some(topic) = &self.topic {
            if article.topic1.to_lowercase() != *topic && article.topic2.to_lowercase() != *topic {
                return false;
            }
        }

        if let Some(source) = &self.source {
            if article.source.to_lowercase() != *source {
                return false;
            }
        }

        if let Some(keyword) = &self.keyword {
            if !article.title.to_lowercase().contains(keyword.as_str())
                && !article.summary.to_lowercase().contains(keyword.as_str())
            {
                return false;
            }
        }

        if let Some(range) = &self.range {
            if !range.contains(article.publish_date) {
                return false;
            }
        }

        true
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
        .map(str::to_lowercase)
}

/// One page of query results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub articles: Vec<Article>,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Filter the table and slice out one page, preserving table order.
///
/// `page` is 1-based; values below 1 are clamped to 1. An out-of-range page
/// yields an empty item list but still reports the correct `total_pages`.
pub fn query(table: &ArticleTable, filter: &ArticleFilter, page: usize, page_size: usize) -> Page {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let matching: Vec<&Article> = table
        .articles()
        .iter()
        .filter(|a| filter.matches(a))
        .collect();

    let total_pages = matching.len().div_ceil(page_size);
    let articles = matching
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    Page {
        articles,
        total_pages,
        current_page: page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, summary: &str, source: &str, topics: (&str, &str), day: u32) -> Article {
        Article {
            title: title.to_string(),
            summary: summary.to_string(),
            link: "https://example.org/a".to_string(),
            image: String::new(),
            source: source.to_string(),
            topic1: topics.0.to_string(),
            topic2: topics.1.to_string(),
            publish_date: Utc.with_ymd_and_hms(2024, 9, day, 12, 30, 0).unwrap(),
        }
    }

    fn sample_table() -> ArticleTable {
        ArticleTable::new(vec![
            article(
                "Climate Crisis deepens",
                "Coverage of emissions",
                "BBC News",
                ("Climate Change", "Politics & Law"),
                3,
            ),
            article(
                "Desalination at scale",
                "New plants announced",
                "Grist",
                ("Energy", "Water"),
                2,
            ),
            article(
                "Wind farms expand",
                "Offshore build-out continues",
                "Grist",
                ("Energy", "Technology & Science"),
                1,
            ),
        ])
    }

    #[test]
    fn unconstrained_filter_matches_everything() {
        let table = sample_table();
        let filter = ArticleFilter::new();
        assert!(filter.is_unconstrained());
        let page = query(&table, &filter, 1, 21);
        assert_eq!(page.articles.len(), 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn topic_matches_either_field_case_insensitively() {
        let table = ArticleTable::new(vec![article(
            "t",
            "s",
            "Grist",
            ("Energy", "Water"),
            1,
        )]);
        let filter = ArticleFilter::new().with_topic(Some("water"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 1);

        let filter = ArticleFilter::new().with_topic(Some("ENERGY"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 1);

        let filter = ArticleFilter::new().with_topic(Some("wildlife"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 0);
    }

    #[test]
    fn all_sentinel_and_empty_disable_the_filter() {
        let table = sample_table();
        for value in [Some("all"), Some("All"), Some(""), None] {
            let filter = ArticleFilter::new().with_topic(value).with_source(value);
            assert_eq!(query(&table, &filter, 1, 21).articles.len(), 3);
        }
    }

    #[test]
    fn source_is_exact_case_insensitive_match() {
        let table = sample_table();
        let filter = ArticleFilter::new().with_source(Some("grist"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 2);

        // Substrings of a source label are not matches.
        let filter = ArticleFilter::new().with_source(Some("gris"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 0);
    }

    #[test]
    fn keyword_is_case_insensitive_substring_over_title_and_summary() {
        let table = sample_table();
        let filter = ArticleFilter::new().with_keyword(Some("crisis"));
        let page = query(&table, &filter, 1, 21);
        assert_eq!(page.articles.len(), 1);
        assert_eq!(page.articles[0].title, "Climate Crisis deepens");

        // Summary text is searched too.
        let filter = ArticleFilter::new().with_keyword(Some("OFFSHORE"));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 1);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let table = ArticleTable::new(vec![article("t", "s", "Grist", ("Energy", ""), 1)]);
        let range = DateRange::parse("2024-09-01", "2024-09-01").unwrap();
        let filter = ArticleFilter::new().with_date_range(Some(range));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 1);

        let range = DateRange::parse("2024-09-02", "2024-09-03").unwrap();
        let filter = ArticleFilter::new().with_date_range(Some(range));
        assert_eq!(query(&table, &filter, 1, 21).articles.len(), 0);
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = ArticleFilter::from_params(None, None, None, Some("not-a-date"), Some("2024-09-01"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate(_)));
    }

    #[test]
    fn lone_date_bound_is_rejected() {
        let err =
            ArticleFilter::from_params(None, None, None, Some("2024-09-01"), None).unwrap_err();
        assert!(matches!(err, Error::IncompleteDateRange));

        let err = ArticleFilter::from_params(None, None, None, None, Some("2024-09-01")).unwrap_err();
        assert!(matches!(err, Error::IncompleteDateRange));
    }

    #[test]
    fn blank_date_bounds_mean_no_range() {
        let filter = ArticleFilter::from_params(None, None, None, Some(""), Some("")).unwrap();
        assert!(filter.is_unconstrained());
    }

    #[test]
    fn pagination_slices_and_counts_pages() {
        let articles: Vec<Article> = (0..45)
            .map(|i| article(&format!("article {i}"), "s", "Grist", ("Energy", ""), 1))
            .collect();
        let table = ArticleTable::new(articles);
        let filter = ArticleFilter::new();

        let page = query(&table, &filter, 1, 21);
        assert_eq!(page.articles.len(), 21);
        assert_eq!(page.total_pages, 3);

        let page = query(&table, &filter, 3, 21);
        assert_eq!(page.articles.len(), 3);
        assert_eq!(page.total_pages, 3);

        // Out of range still reports metadata correctly.
        let page = query(&table, &filter, 4, 21);
        assert!(page.articles.is_empty());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 4);
    }

    #[test]
    fn empty_result_reports_zero_pages() {
        let table = sample_table();
        let filter = ArticleFilter::new().with_keyword(Some("no-such-word"));
        let page = query(&table, &filter, 1, 21);
        assert!(page.articles.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn page_below_one_is_clamped() {
        let table = sample_table();
        let page = query(&table, &ArticleFilter::new(), 0, 21);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.articles.len(), 3);
    }

    #[test]
    fn filtering_is_idempotent_and_preserves_table_order() {
        let table = sample_table();
        let filter = ArticleFilter::new().with_source(Some("Grist"));
        let first = query(&table, &filter, 1, 21);
        let second = query(&table, &filter, 1, 21);
        let titles: Vec<_> = first.articles.iter().map(|a| a.title.clone()).collect();
        let again: Vec<_> = second.articles.iter().map(|a| a.title.clone()).collect();
        assert_eq!(titles, again);
        assert_eq!(titles, vec!["Desalination at scale", "Wind farms expand"]);
    }
}
