use std::time::Duration;

/// Tunables for one pipeline run. Defaults match the production ingest
/// deployment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Extracted content shorter than this (in characters) gets a
    /// placeholder record instead of an embedding.
    pub content_threshold: usize,
    /// Maximum tokens accepted by the embedding provider per call.
    pub max_tokens: usize,
    /// Timeout for feed and page fetches.
    pub fetch_timeout: Duration,
    /// Politeness delay before each outbound page fetch.
    pub fetch_delay: Duration,
    /// Attempts per message before dead-lettering.
    pub max_attempts: u32,
    /// Base backoff between retries; grows linearly with the attempt number.
    pub retry_backoff: Duration,
    pub user_agent: String,
    /// Capacity of the queues between stages.
    pub queue_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            content_threshold: 100,
            max_tokens: 1024,
            fetch_timeout: Duration::from_secs(10),
            fetch_delay: Duration::from_millis(500),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
            user_agent: "newsriver/1.0 (+bot)".to_string(),
            queue_capacity: 64,
        }
    }
}
