pub mod cache;
pub mod sources;

pub use cache::{CacheConfig, CacheState, TableCache};
pub use sources::*;

pub mod prelude {
    pub use crate::cache::{CacheConfig, TableCache};
    pub use crate::sources::*;
    pub use nd_core::ArticleSource;
}
