use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// The persistent article store, keyed by content id.
///
/// Writes are upserts, so redelivered messages and concurrent writers for
/// the same article stay commutative on the final record.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch an article by id, `None` if it was never written.
    async fn get(&self, id: &str) -> Result<Option<Article>>;

    /// Idempotent write keyed by `article.id`.
    async fn upsert(&self, article: &Article) -> Result<()>;

    /// Existence check used by the processor's dedup short-circuit.
    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
