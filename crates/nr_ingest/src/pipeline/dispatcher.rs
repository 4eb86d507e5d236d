//! Stage 1: source dispatch. Fans the static source list out onto the feed
//! queue, one message per active source.

use nr_core::Source;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Dispatch every active source. An empty active set is a successful no-op.
/// Returns the number of dispatched sources; `None` means the queue closed
/// early.
pub async fn dispatch(sources: Vec<Source>, tx: mpsc::Sender<Source>) -> Option<usize> {
    let mut dispatched = 0;
    for source in sources {
        if !source.is_active() {
            debug!(source = %source.id, "source inactive, not dispatching");
            continue;
        }
        let id = source.id.clone();
        if tx.send(source).await.is_err() {
            return None;
        }
        debug!(source = %id, "dispatched");
        dispatched += 1;
    }
    info!(dispatched, "source dispatch complete");
    Some(dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, active: Option<bool>) -> Source {
        Source {
            id: id.into(),
            name: id.into(),
            url: format!("https://{id}/rss"),
            is_active: active,
            exclude_categories: vec![],
        }
    }

    #[tokio::test]
    async fn dispatches_only_active_sources() {
        let (tx, mut rx) = mpsc::channel(8);
        let sources = vec![
            source("a", None),
            source("b", Some(false)),
            source("c", Some(true)),
        ];
        let dispatched = dispatch(sources, tx).await.unwrap();
        assert_eq!(dispatched, 2);

        let mut ids = Vec::new();
        while let Some(s) = rx.recv().await {
            ids.push(s.id);
        }
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn empty_set_is_a_noop() {
        let (tx, mut rx) = mpsc::channel(8);
        assert_eq!(dispatch(Vec::new(), tx).await.unwrap(), 0);
        assert!(rx.recv().await.is_none());
    }
}
