//! Filesystem blob store: one pretty-printed JSON document per article at
//! `<root>/<prefix>/<id>.json`, the layout downstream batch jobs pick up
//! from the inbox folder.

use std::path::PathBuf;

use async_trait::async_trait;
use nr_core::{Article, DocumentStore, Error, Result};
use tracing::debug;

pub const DEFAULT_PREFIX: &str = "inbox";

pub struct FsStore {
    root: PathBuf,
    prefix: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        // Ids are hex digests; reject anything that could escape the prefix.
        self.root.join(&self.prefix).join(format!("{id}.json"))
    }

    fn check_id(id: &str) -> Result<()> {
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::Storage(format!("invalid article id: {id:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn get(&self, id: &str) -> Result<Option<Article>> {
        Self::check_id(id)?;
        let path = self.blob_path(id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn upsert(&self, article: &Article) -> Result<()> {
        Self::check_id(&article.id)?;
        let path = self.blob_path(&article.id);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so readers never observe a partial document.
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_vec_pretty(article)?;
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(id = %article.id, path = %path.display(), "wrote article blob");
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        Self::check_id(id)?;
        Ok(self.blob_path(id).exists())
    }
}
