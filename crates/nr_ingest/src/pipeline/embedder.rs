//! Stage 4: embedding and persistence, the pipeline's single write point.

use std::sync::Arc;

use chrono::Utc;
use nr_core::{
    Article, ArticleMetadata, DocumentStore, EmbeddingProvider, ProcessingStatus, Result,
};
use nr_embed::Tokenizer;
use tracing::{debug, info};

use crate::config::PipelineConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedOutcome {
    Embedded,
    /// Placeholder persisted without an embedding call.
    Skipped,
    /// The store already holds an embedded record for this id; redelivery
    /// is a no-op and the provider is not charged again.
    Unchanged,
}

pub struct ArticleEmbedder {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn EmbeddingProvider>,
    tokenizer: Arc<Tokenizer>,
    max_tokens: usize,
}

impl ArticleEmbedder {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn EmbeddingProvider>,
        tokenizer: Arc<Tokenizer>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            store,
            provider,
            tokenizer,
            max_tokens: config.max_tokens,
        }
    }

    pub async fn handle(&self, article: &Article) -> Result<EmbedOutcome> {
        if let Some(existing) = self.store.get(&article.id).await? {
            if existing.status == ProcessingStatus::Embedded {
                debug!(id = %article.id, "already embedded, nothing to do");
                return Ok(EmbedOutcome::Unchanged);
            }
        }

        // Placeholders (and anything without usable content) are persisted
        // as-is so the URL is durably marked as seen.
        if article.status == ProcessingStatus::Skipped || article.content.trim().is_empty() {
            let mut record = article.clone();
            if record.status != ProcessingStatus::Skipped {
                record.status = ProcessingStatus::Skipped;
                record.metadata.get_or_insert(ArticleMetadata {
                    original_token_count: 0,
                    embedded_token_count: 0,
                    was_truncated: false,
                    skip_reason: None,
                });
                if let Some(metadata) = record.metadata.as_mut() {
                    metadata.skip_reason.get_or_insert("empty_content".to_string());
                }
            }
            info!(source = %record.source_id, id = %record.id, "persisting placeholder");
            self.store.upsert(&record).await?;
            return Ok(EmbedOutcome::Skipped);
        }

        let truncation = self.tokenizer.truncate(&article.content, self.max_tokens)?;
        if truncation.was_truncated {
            info!(
                source = %article.source_id,
                id = %article.id,
                original = truncation.original_tokens,
                truncated = truncation.final_tokens,
                "content truncated to token budget"
            );
        }

        let embedding = self.provider.embed(&truncation.text).await?;

        let mut record = article.clone();
        record.embedding = Some(embedding);
        record.embedded_at = Some(Utc::now());
        record.status = ProcessingStatus::Embedded;
        record.metadata = Some(ArticleMetadata {
            original_token_count: truncation.original_tokens,
            embedded_token_count: truncation.final_tokens,
            was_truncated: truncation.was_truncated,
            skip_reason: None,
        });

        self.store.upsert(&record).await?;
        info!(source = %record.source_id, id = %record.id, title = %record.title, "embedded and persisted");
        Ok(EmbedOutcome::Embedded)
    }
}
