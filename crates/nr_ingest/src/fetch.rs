//! Outbound page fetches with a descriptive client identity and bounded
//! timeout.

use nr_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::config::PipelineConfig;

pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }

    /// GET a page and return its body. Non-2xx statuses become
    /// `Error::HttpStatus`, whose transience follows the spec taxonomy
    /// (429/5xx transient, other 4xx permanent).
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// A client configured the same way, for callers that fetch feeds.
    pub fn client(&self) -> reqwest::Client {
        self.client.clone()
    }
}
