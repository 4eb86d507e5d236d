use std::fmt;

use async_trait::async_trait;
use nr_core::{EmbeddingProvider, Result};

/// Deterministic offline embedder for tests and local runs. The vector is a
/// function of text length and character frequencies, so identical input
/// always produces identical output.
pub struct DummyEmbedder {
    dimensions: usize,
}

impl fmt::Debug for DummyEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyEmbedder")
            .field("dimensions", &self.dimensions)
            .finish()
    }
}

impl DummyEmbedder {
    /// Dimensions below 2 are bumped to 2: slot 0 holds the length feature
    /// and the character buckets need at least one slot of their own.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(2),
        }
    }
}

impl Default for DummyEmbedder {
    fn default() -> Self {
        Self::new(crate::openai::DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl EmbeddingProvider for DummyEmbedder {
    fn name(&self) -> &str {
        "dummy"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0; self.dimensions];
        let text_len = text.len().max(1) as f32;

        // Text length as the first feature, roughly normalized
        embedding[0] = text_len / 1000.0;

        // Character frequencies fill the rest, bucketed by code point
        for c in text.chars() {
            let slot = 1 + (c as usize) % (self.dimensions - 1);
            embedding[slot] += 1.0 / text_len;
        }

        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embedding_is_deterministic() {
        let embedder = DummyEmbedder::new(64);
        let a = embedder.embed("some article text").await.unwrap();
        let b = embedder.embed("some article text").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn embedding_has_configured_dimensions() {
        let embedder = DummyEmbedder::default();
        let embedding = embedder.embed("hello").await.unwrap();
        assert_eq!(embedding.len(), embedder.dimensions());
    }

    #[tokio::test]
    async fn tiny_dimension_is_clamped() {
        let embedder = DummyEmbedder::new(1);
        assert_eq!(embedder.dimensions(), 2);
        let embedding = embedder.embed("hello").await.unwrap();
        assert_eq!(embedding.len(), 2);
    }

    #[tokio::test]
    async fn different_texts_differ() {
        let embedder = DummyEmbedder::new(64);
        let a = embedder.embed("aaaa").await.unwrap();
        let b = embedder.embed("bbbbbbbb").await.unwrap();
        assert_ne!(a, b);
    }
}
