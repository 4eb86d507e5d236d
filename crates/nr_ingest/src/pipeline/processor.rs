//! Stage 3: article fetch-and-extract. Consumes a `QueuedArticle`, forwards
//! an `Article` (full or placeholder) to the embedding queue.

use std::sync::Arc;

use nr_core::text::clean_text;
use nr_core::{content_id, Article, DocumentStore, QueuedArticle, Result};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::extract::extract_readable;
use crate::fetch::PageFetcher;

/// What the processor decided about one message. Transient failures are
/// `Err` instead, so the retry policy can replay them.
#[derive(Debug)]
pub enum Outcome {
    /// Hand the article (pending or placeholder) to the embedder.
    Forward(Article),
    /// Done, nothing to enqueue.
    Drop(&'static str),
}

pub struct ArticleProcessor {
    store: Arc<dyn DocumentStore>,
    fetcher: PageFetcher,
    config: PipelineConfig,
}

impl ArticleProcessor {
    pub fn new(store: Arc<dyn DocumentStore>, fetcher: PageFetcher, config: PipelineConfig) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub async fn handle(&self, msg: &QueuedArticle) -> Result<Outcome> {
        let article_id = content_id(&msg.link);

        // Idempotent short-circuit: redelivery of a link that already has a
        // record is a successful no-op.
        if self.store.exists(&article_id).await? {
            info!(source = %msg.source_id, id = %article_id, "article already exists, skipping");
            return Ok(Outcome::Drop("already_exists"));
        }

        // Politeness budget for external sites
        tokio::time::sleep(self.config.fetch_delay).await;

        let html = match self.fetcher.fetch(&msg.link).await {
            Ok(html) => html,
            Err(error) if error.is_transient() => return Err(error),
            Err(error) => {
                warn!(source = %msg.source_id, link = %msg.link, %error, "permanent fetch failure, dropping");
                return Ok(Outcome::Drop("permanent_fetch_failure"));
            }
        };

        let Some(extracted) = extract_readable(&html) else {
            warn!(source = %msg.source_id, link = %msg.link, "extractor found no content, forwarding placeholder");
            return Ok(Outcome::Forward(Article::placeholder(msg, "no_content")));
        };

        let content = clean_text(&extracted.text);
        if content.len() < self.config.content_threshold {
            warn!(
                source = %msg.source_id,
                link = %msg.link,
                length = content.len(),
                threshold = self.config.content_threshold,
                "content below threshold, forwarding placeholder"
            );
            return Ok(Outcome::Forward(Article::placeholder(
                msg,
                "insufficient_content",
            )));
        }

        let title = {
            let extracted_title = clean_text(&extracted.title);
            if extracted_title.is_empty() {
                msg.title.clone()
            } else {
                extracted_title
            }
        };

        info!(source = %msg.source_id, id = %article_id, title = %title, "processed article");
        Ok(Outcome::Forward(Article::pending(
            msg,
            title,
            clean_text(&extracted.excerpt),
            content,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nr_core::ProcessingStatus;
    use nr_storage::MemoryStore;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn msg(link: String) -> QueuedArticle {
        QueuedArticle {
            source_id: "s1".into(),
            source_name: "Source One".into(),
            title: "Feed Title".into(),
            link,
            published_at: Utc::now(),
            categories: vec!["news".into()],
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            fetch_delay: Duration::ZERO,
            ..PipelineConfig::default()
        }
    }

    fn processor(store: Arc<MemoryStore>) -> ArticleProcessor {
        let config = config();
        let fetcher = PageFetcher::new(&config).unwrap();
        ArticleProcessor::new(store, fetcher, config)
    }

    fn long_article_html() -> String {
        format!(
            "<html><body><article><h1>Page Headline</h1><p>{}</p></article></body></html>",
            "A sentence that carries real article content. ".repeat(12)
        )
    }

    #[tokio::test]
    async fn forwards_a_pending_article() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string(long_article_html()))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let outcome = processor(store)
            .handle(&msg(format!("{}/a", server.uri())))
            .await
            .unwrap();

        match outcome {
            Outcome::Forward(article) => {
                assert_eq!(article.status, ProcessingStatus::Pending);
                assert_eq!(article.title, "Page Headline");
                assert!(article.content.len() >= 100);
                assert_eq!(article.id, content_id(&article.url));
            }
            other => panic!("expected Forward, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn existing_article_short_circuits_without_a_fetch() {
        let server = MockServer::start().await;
        // No mock mounted: any fetch would 404 and show up as a Drop with a
        // different reason.
        let link = format!("{}/a", server.uri());
        let store = Arc::new(MemoryStore::new());
        let placeholder = Article::placeholder(&msg(link.clone()), "seeded");
        store.upsert(&placeholder).await.unwrap();

        let outcome = processor(store.clone()).handle(&msg(link)).await.unwrap();
        assert!(matches!(outcome, Outcome::Drop("already_exists")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn not_found_page_is_dropped_without_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let outcome = processor(store.clone())
            .handle(&msg(format!("{}/gone", server.uri())))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Drop("permanent_fetch_failure")));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn server_error_propagates_for_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let err = processor(store)
            .handle(&msg(format!("{}/down", server.uri())))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn short_content_forwards_a_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body><article><p>Too short.</p></article></body></html>"),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryStore::new());
        let outcome = processor(store)
            .handle(&msg(format!("{}/short", server.uri())))
            .await
            .unwrap();

        match outcome {
            Outcome::Forward(article) => {
                assert_eq!(article.status, ProcessingStatus::Skipped);
                assert!(article.content.is_empty());
                assert_eq!(
                    article.metadata.unwrap().skip_reason.as_deref(),
                    Some("insufficient_content")
                );
            }
            other => panic!("expected Forward, got {other:?}"),
        }
    }
}
