use async_trait::async_trait;

use crate::Result;

/// An external embedding model turning text into a fixed-dimension vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &str;

    /// The dimensionality of every vector this provider returns.
    fn dimensions(&self) -> usize;

    /// Generate an embedding for a piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
