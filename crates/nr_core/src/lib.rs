pub mod embedder;
pub mod error;
pub mod ident;
pub mod store;
pub mod text;
pub mod types;

pub use embedder::EmbeddingProvider;
pub use error::Error;
pub use ident::content_id;
pub use store::DocumentStore;
pub use types::{Article, ArticleMetadata, FeedItem, ProcessingStatus, QueuedArticle, Source};

pub type Result<T> = std::result::Result<T, Error>;
