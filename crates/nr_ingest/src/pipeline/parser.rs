//! Stage 2: feed parsing and filtering. Consumes a dispatched `Source`,
//! emits one `QueuedArticle` per surviving feed item.

use chrono::Utc;
use nr_core::text::{clean_text, normalize_category};
use nr_core::{QueuedArticle, Source};
use tracing::{debug, warn};

use crate::feed::FeedFetcher;
use crate::filter::should_exclude;

pub struct FeedParser {
    fetcher: FeedFetcher,
}

impl FeedParser {
    pub fn new(fetcher: FeedFetcher) -> Self {
        Self { fetcher }
    }

    /// Parse one source's feed into queue messages.
    ///
    /// A fetch or parse failure for the whole feed yields an empty set
    /// rather than an error: one broken feed must not block the run or
    /// cause unbounded retries, and the next scheduled tick will see the
    /// items again.
    pub async fn handle(&self, source: &Source) -> Vec<QueuedArticle> {
        let items = match self.fetcher.fetch(source).await {
            Ok(items) => items,
            Err(error) => {
                warn!(source = %source.id, %error, "feed fetch failed, skipping this cycle");
                return Vec::new();
            }
        };

        let mut queued = Vec::new();
        for item in items {
            let Some(link) = item.link.filter(|l| !l.trim().is_empty()) else {
                debug!(source = %source.id, "rejecting feed item without a link");
                continue;
            };

            let raw_categories = item.categories;
            if should_exclude(&raw_categories, &source.exclude_categories) {
                debug!(source = %source.id, link = %link, "item excluded by category filter");
                continue;
            }

            // Union-dedupe, comparing normalized names
            let mut categories: Vec<String> = Vec::new();
            let mut seen: Vec<String> = Vec::new();
            for category in &raw_categories {
                let cleaned = clean_text(category);
                let key = normalize_category(category);
                if !cleaned.is_empty() && !seen.contains(&key) {
                    seen.push(key);
                    categories.push(cleaned);
                }
            }

            queued.push(QueuedArticle {
                source_id: source.id.clone(),
                source_name: source.name.clone(),
                title: clean_text(item.title.as_deref().unwrap_or_default()),
                link,
                published_at: item.published_at.unwrap_or_else(Utc::now),
                categories,
            });
        }

        debug!(source = %source.id, queued = queued.len(), "feed parsed");
        queued
    }
}
