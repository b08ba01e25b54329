use std::sync::Arc;

use nd_data::TableCache;

pub struct AppState {
    /// Main article table behind the browsing endpoints.
    pub articles: Arc<TableCache>,
    /// Independently-loaded corpus behind the word-cloud endpoints.
    pub corpus: Arc<TableCache>,
    /// Deployment constant; never caller-configurable.
    pub articles_per_page: usize,
}

impl AppState {
    pub fn new(articles: Arc<TableCache>, corpus: Arc<TableCache>, articles_per_page: usize) -> Self {
        Self {
            articles,
            corpus,
            articles_per_page,
        }
    }
}
