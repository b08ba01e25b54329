use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use nd_core::{query, wordcloud, ArticleFilter, Page, Result, WordCount};

use crate::error::ApiError;
use crate::render;
use crate::AppState;

/// Filter values shown on the landing page. These mirror the deployed
/// dataset's label set rather than being derived per request.
pub const TOPICS: &[&str] = &[
    "Agriculture & Food",
    "Business & Innovation",
    "Climate Change",
    "Crisis & Disasters",
    "Energy",
    "Fossil Fuels",
    "Pollution",
    "Politics & Law",
    "Public Health & Environment",
    "Society & Culture",
    "Sustainability",
    "Technology & Science",
    "Urban & Infrastructure",
    "Water & Oceans",
    "Wildlife & Conservation",
];

pub const SOURCES: &[&str] = &[
    "BBC News",
    "Columbia Climate School",
    "Earth911",
    "Greenpeace",
    "Grist",
    "The Guardian",
    "The Independent",
    "Yale Environment 360",
];

#[derive(Debug, Default, Deserialize)]
pub struct ArticlesParams {
    pub topic: Option<String>,
    pub source: Option<String>,
    pub keyword: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
}

impl ArticlesParams {
    fn filter(&self) -> Result<ArticleFilter> {
        ArticleFilter::from_params(
            self.topic.as_deref(),
            self.source.as_deref(),
            self.keyword.as_deref(),
            self.start_date.as_deref(),
            self.end_date.as_deref(),
        )
    }

    /// 1-based page index, clamped to >= 1.
    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1) as usize
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WordCloudParams {
    pub source: Option<String>,
    pub topic: Option<String>,
}

impl WordCloudParams {
    fn filter(&self) -> ArticleFilter {
        ArticleFilter::new()
            .with_topic(self.topic.as_deref())
            .with_source(self.source.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WordParams {
    pub word: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub sources: Vec<String>,
    pub topics: Vec<String>,
}

pub async fn index() -> Html<String> {
    Html(render::index_page(TOPICS, SOURCES))
}

pub async fn get_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArticlesParams>,
) -> std::result::Result<Json<Page>, ApiError> {
    let filter = params.filter()?;
    let table = state.articles.get().await?;
    Ok(Json(query(
        &table,
        &filter,
        params.page(),
        state.articles_per_page,
    )))
}

pub async fn refresh_data(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<&'static str, ApiError> {
    state.articles.invalidate().await;
    state.corpus.invalidate().await;
    state.articles.refresh().await?;
    state.corpus.refresh().await?;
    info!("article and corpus tables refreshed on request");
    Ok("Data refreshed")
}

pub async fn word_data(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordCloudParams>,
) -> std::result::Result<Json<Vec<WordCount>>, ApiError> {
    let corpus = state.corpus.get().await?;
    Ok(Json(wordcloud::word_frequencies(&corpus, &params.filter())))
}

pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<FilterOptions>, ApiError> {
    let corpus = state.corpus.get().await?;
    Ok(Json(FilterOptions {
        sources: corpus.distinct_sources(),
        topics: corpus.distinct_topics(),
    }))
}

pub async fn articles_by_word(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordParams>,
) -> std::result::Result<Html<String>, ApiError> {
    let word = params.word.unwrap_or_default();
    let corpus = state.corpus.get().await?;
    let matching: Vec<_> = corpus
        .articles()
        .iter()
        .filter(|a| wordcloud::contains_word(&a.summary, &word))
        .cloned()
        .collect();
    Ok(Html(render::articles_page(&word, &matching)))
}
