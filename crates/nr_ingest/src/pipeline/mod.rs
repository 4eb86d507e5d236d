//! Queue wiring for the four stages. Bounded mpsc channels stand in for the
//! broker topics; each stage runs as one worker task consuming its inbox
//! and producing to the next, with a retry policy in front of the two
//! stages that talk to flaky collaborators.

pub mod dispatcher;
pub mod embedder;
pub mod parser;
pub mod processor;

use std::sync::Arc;

use nr_core::{Article, DocumentStore, EmbeddingProvider, Error, QueuedArticle, Result, Source};
use nr_embed::Tokenizer;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::feed::FeedFetcher;
use crate::fetch::PageFetcher;
use crate::retry::RetryPolicy;

pub use embedder::{ArticleEmbedder, EmbedOutcome};
pub use parser::FeedParser;
pub use processor::{ArticleProcessor, Outcome};

pub const SOURCES_DISPATCH_QUEUE: &str = "sources.dispatch.queue";
pub const ARTICLES_PROCESS_QUEUE: &str = "articles.process.queue";
pub const ARTICLE_ENRICHMENT_QUEUE: &str = "article.enrichment.queue";

/// A message that exhausted its retries. Kept for operator inspection.
#[derive(Debug)]
pub struct DeadLetter {
    pub queue: &'static str,
    pub payload: serde_json::Value,
    pub error: String,
    pub attempts: u32,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub dispatched: usize,
    pub queued: usize,
    pub embedded: usize,
    pub skipped: usize,
    pub unchanged: usize,
    pub dropped: usize,
    pub dead_letters: Vec<DeadLetter>,
}

pub struct Pipeline {
    store: Arc<dyn DocumentStore>,
    provider: Arc<dyn EmbeddingProvider>,
    tokenizer: Arc<Tokenizer>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: PipelineConfig,
    ) -> Result<Self> {
        Ok(Self {
            store,
            provider,
            tokenizer: Arc::new(Tokenizer::new()?),
            config,
        })
    }

    /// One full pipeline run over the given source list: dispatch, parse,
    /// process, embed, drain.
    pub async fn run(&self, sources: Vec<Source>) -> Result<RunSummary> {
        let retry = RetryPolicy::new(self.config.max_attempts, self.config.retry_backoff);

        let (source_tx, mut source_rx) = mpsc::channel::<Source>(self.config.queue_capacity);
        let (article_tx, mut article_rx) =
            mpsc::channel::<QueuedArticle>(self.config.queue_capacity);
        let (embed_tx, mut embed_rx) = mpsc::channel::<Article>(self.config.queue_capacity);

        let dispatch_task = tokio::spawn(dispatcher::dispatch(sources, source_tx));

        let page_fetcher = PageFetcher::new(&self.config)?;
        let feed_parser = FeedParser::new(FeedFetcher::new(page_fetcher.client()));
        let parse_task = tokio::spawn(async move {
            let mut queued = 0;
            while let Some(source) = source_rx.recv().await {
                for msg in feed_parser.handle(&source).await {
                    if article_tx.send(msg).await.is_err() {
                        return queued;
                    }
                    queued += 1;
                }
            }
            queued
        });

        let article_processor = ArticleProcessor::new(
            self.store.clone(),
            PageFetcher::new(&self.config)?,
            self.config.clone(),
        );
        let process_task = tokio::spawn(async move {
            let mut dropped = 0;
            let mut dead_letters = Vec::new();
            while let Some(msg) = article_rx.recv().await {
                match retry.run(ARTICLES_PROCESS_QUEUE, || article_processor.handle(&msg)).await {
                    Ok(Outcome::Forward(article)) => {
                        if embed_tx.send(article).await.is_err() {
                            break;
                        }
                    }
                    Ok(Outcome::Drop(reason)) => {
                        info!(link = %msg.link, reason, "message dropped");
                        dropped += 1;
                    }
                    Err(give_up) => {
                        error!(link = %msg.link, error = %give_up.error, "dead-lettering article message");
                        dead_letters.push(DeadLetter {
                            queue: ARTICLES_PROCESS_QUEUE,
                            payload: serde_json::to_value(&msg).unwrap_or_default(),
                            error: give_up.error.to_string(),
                            attempts: give_up.attempts,
                        });
                    }
                }
            }
            (dropped, dead_letters)
        });

        let article_embedder = ArticleEmbedder::new(
            self.store.clone(),
            self.provider.clone(),
            self.tokenizer.clone(),
            &self.config,
        );
        let embed_task = tokio::spawn(async move {
            let mut embedded = 0;
            let mut skipped = 0;
            let mut unchanged = 0;
            let mut dead_letters = Vec::new();
            while let Some(article) = embed_rx.recv().await {
                match retry
                    .run(ARTICLE_ENRICHMENT_QUEUE, || article_embedder.handle(&article))
                    .await
                {
                    Ok(EmbedOutcome::Embedded) => embedded += 1,
                    Ok(EmbedOutcome::Skipped) => skipped += 1,
                    Ok(EmbedOutcome::Unchanged) => unchanged += 1,
                    Err(give_up) => {
                        error!(id = %article.id, error = %give_up.error, "dead-lettering enrichment message");
                        dead_letters.push(DeadLetter {
                            queue: ARTICLE_ENRICHMENT_QUEUE,
                            payload: serde_json::to_value(&article).unwrap_or_default(),
                            error: give_up.error.to_string(),
                            attempts: give_up.attempts,
                        });
                    }
                }
            }
            (embedded, skipped, unchanged, dead_letters)
        });

        let dispatched = dispatch_task
            .await
            .map_err(|e| Error::External(e.into()))?
            .unwrap_or(0);
        let queued = parse_task.await.map_err(|e| Error::External(e.into()))?;
        let (dropped, mut dead_letters) =
            process_task.await.map_err(|e| Error::External(e.into()))?;
        let (embedded, skipped, unchanged, embed_dead) =
            embed_task.await.map_err(|e| Error::External(e.into()))?;
        dead_letters.extend(embed_dead);

        let summary = RunSummary {
            dispatched,
            queued,
            embedded,
            skipped,
            unchanged,
            dropped,
            dead_letters,
        };
        info!(
            dispatched = summary.dispatched,
            queued = summary.queued,
            embedded = summary.embedded,
            skipped = summary.skipped,
            unchanged = summary.unchanged,
            dropped = summary.dropped,
            dead_letters = summary.dead_letters.len(),
            "pipeline run complete"
        );
        Ok(summary)
    }
}
