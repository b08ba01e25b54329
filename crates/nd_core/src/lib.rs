pub mod error;
pub mod query;
pub mod source;
pub mod types;
pub mod wordcloud;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use query::{query, ArticleFilter, DateRange, Page};
pub use source::ArticleSource;
pub use types::{Article, ArticleTable};
pub use wordcloud::WordCount;
