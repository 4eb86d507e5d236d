//! Feed retrieval: turns a source descriptor into a sequence of candidate
//! items.

use chrono::{DateTime, Utc};
use nr_core::{Error, FeedItem, Result, Source};
use rss::{Channel, Item};
use tracing::debug;

pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch and parse the feed at `source.url`.
    ///
    /// Network and parse failures surface as errors here; the parser stage
    /// decides whether to swallow them (a broken feed must not block the
    /// scheduler).
    pub async fn fetch(&self, source: &Source) -> Result<Vec<FeedItem>> {
        let response = self.client.get(&source.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: source.url.clone(),
            });
        }

        let bytes = response.bytes().await?;
        let channel = Channel::read_from(&bytes[..])
            .map_err(|e| Error::Feed(format!("{}: {e}", source.url)))?;

        debug!(source = %source.id, items = channel.items().len(), "parsed feed");
        Ok(channel.items().iter().map(feed_item).collect())
    }
}

fn feed_item(item: &Item) -> FeedItem {
    FeedItem {
        title: item.title().map(str::to_string),
        link: item.link().map(str::to_string),
        categories: item
            .categories()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        published_at: resolve_published(item),
    }
}

/// Prefer the RFC 2822 `pubDate`, fall back to an ISO `dc:date`. `None`
/// means the enqueue time is used instead.
fn resolve_published(item: &Item) -> Option<DateTime<Utc>> {
    if let Some(pub_date) = item.pub_date() {
        if let Ok(parsed) = DateTime::parse_from_rfc2822(pub_date) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(pub_date) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    item.dublin_core_ext()
        .and_then(|dc| dc.dates().first())
        .and_then(|date| DateTime::parse_from_rfc3339(date).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}
