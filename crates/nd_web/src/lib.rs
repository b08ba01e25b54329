use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod render;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::index))
        .route("/get_articles", get(handlers::get_articles))
        .route("/refresh_data", get(handlers::refresh_data))
        .route("/data", get(handlers::word_data))
        .route("/filter-options", get(handlers::filter_options))
        .route("/articles", get(handlers::articles_by_word))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use crate::{AppState, create_app};
    pub use nd_core::{Article, Error, Result};
}
