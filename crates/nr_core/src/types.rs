use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ident::content_id;

/// A configured RSS feed. Static, read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Absent means active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_categories: Vec<String>,
}

impl Source {
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }
}

/// One raw feed entry, before filtering. Never persisted.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub categories: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Message between the feed parser and the article processor.
/// Immutable once enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedArticle {
    pub source_id: String,
    pub source_name: String,
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Embedded,
    Skipped,
    Failed,
}

impl ProcessingStatus {
    /// Terminal states are never left by the pipeline itself.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProcessingStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMetadata {
    pub original_token_count: usize,
    pub embedded_token_count: usize,
    pub was_truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// The durable entity. `id` is always `content_id(url)`; `embedding` is
/// present exactly when `status` is `Embedded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub url: String,
    pub source_id: String,
    pub source_name: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub scraped_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_at: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub status: ProcessingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ArticleMetadata>,
}

impl Article {
    /// A full record awaiting embedding.
    pub fn pending(
        msg: &QueuedArticle,
        title: String,
        excerpt: String,
        content: String,
    ) -> Self {
        Self {
            id: content_id(&msg.link),
            url: msg.link.clone(),
            source_id: msg.source_id.clone(),
            source_name: msg.source_name.clone(),
            title,
            excerpt,
            content,
            published_at: msg.published_at,
            scraped_at: Utc::now(),
            embedded_at: None,
            categories: msg.categories.clone(),
            embedding: None,
            status: ProcessingStatus::Pending,
            metadata: None,
        }
    }

    /// A placeholder written so a known-unusable URL is never fetched again.
    pub fn placeholder(msg: &QueuedArticle, reason: &str) -> Self {
        Self {
            id: content_id(&msg.link),
            url: msg.link.clone(),
            source_id: msg.source_id.clone(),
            source_name: msg.source_name.clone(),
            title: msg.title.clone(),
            excerpt: String::new(),
            content: String::new(),
            published_at: msg.published_at,
            scraped_at: Utc::now(),
            embedded_at: None,
            categories: msg.categories.clone(),
            embedding: None,
            status: ProcessingStatus::Skipped,
            metadata: Some(ArticleMetadata {
                original_token_count: 0,
                embedded_token_count: 0,
                was_truncated: false,
                skip_reason: Some(reason.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg() -> QueuedArticle {
        QueuedArticle {
            source_id: "s1".into(),
            source_name: "Source One".into(),
            title: "Hi".into(),
            link: "https://x/a".into(),
            published_at: Utc::now(),
            categories: vec!["news".into()],
        }
    }

    #[test]
    fn source_active_by_default() {
        let source = Source {
            id: "s1".into(),
            name: "Source One".into(),
            url: "https://x/feed".into(),
            is_active: None,
            exclude_categories: vec![],
        };
        assert!(source.is_active());
    }

    #[test]
    fn placeholder_has_empty_content_and_reason() {
        let article = Article::placeholder(&msg(), "below_content_threshold");
        assert_eq!(article.status, ProcessingStatus::Skipped);
        assert!(article.content.is_empty());
        assert!(article.embedding.is_none());
        assert_eq!(
            article.metadata.unwrap().skip_reason.as_deref(),
            Some("below_content_threshold")
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ProcessingStatus::Embedded).unwrap();
        assert_eq!(json, "\"embedded\"");
    }

    #[test]
    fn article_wire_format_is_camel_case() {
        let article = Article::pending(&msg(), "Hi".into(), "".into(), "body".into());
        let value = serde_json::to_value(&article).unwrap();
        assert!(value.get("sourceId").is_some());
        assert!(value.get("publishedAt").is_some());
        assert!(value.get("embedding").is_none());
    }
}
