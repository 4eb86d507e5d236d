//! Content-addressed article identifiers.
//!
//! The id is a deterministic function of the canonical article URL, so two
//! enqueue attempts for the same link always resolve to the same record and
//! the store's upsert stays idempotent.

pub fn content_id(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}
