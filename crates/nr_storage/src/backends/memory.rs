use std::collections::HashMap;

use async_trait::async_trait;
use nr_core::{Article, DocumentStore, Result};
use tokio::sync::RwLock;

/// In-memory document store for tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    articles: RwLock<HashMap<String, Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.articles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.articles.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Article>> {
        Ok(self.articles.read().await.get(id).cloned())
    }

    async fn upsert(&self, article: &Article) -> Result<()> {
        self.articles
            .write()
            .await
            .insert(article.id.clone(), article.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nr_core::{content_id, ProcessingStatus};

    fn article(url: &str) -> Article {
        Article {
            id: content_id(url),
            url: url.to_string(),
            source_id: "s1".into(),
            source_name: "Source One".into(),
            title: "Title".into(),
            excerpt: String::new(),
            content: "body".into(),
            published_at: Utc::now(),
            scraped_at: Utc::now(),
            embedded_at: None,
            categories: vec![],
            embedding: None,
            status: ProcessingStatus::Pending,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn get_returns_none_for_unknown_id() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(!store.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn upsert_is_idempotent_on_the_same_id() {
        let store = MemoryStore::new();
        let a = article("https://x/a");
        store.upsert(&a).await.unwrap();
        store.upsert(&a).await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.exists(&a.id).await.unwrap());
    }

    #[tokio::test]
    async fn upsert_replaces_the_record() {
        let store = MemoryStore::new();
        let mut a = article("https://x/a");
        store.upsert(&a).await.unwrap();
        a.status = ProcessingStatus::Embedded;
        a.embedding = Some(vec![0.0; 3]);
        store.upsert(&a).await.unwrap();
        let stored = store.get(&a.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ProcessingStatus::Embedded);
        assert!(stored.embedding.is_some());
    }
}
