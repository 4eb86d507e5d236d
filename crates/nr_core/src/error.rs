use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Whether retrying the failed operation can reasonably succeed.
    ///
    /// Timeouts, connection failures, 429 and 5xx responses, and outages of
    /// the store or embedding provider are transient; everything else is
    /// permanent and must not be replayed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                match e.status() {
                    Some(status) => status.as_u16() == 429 || status.is_server_error(),
                    // No status means the failure happened below HTTP
                    None => true,
                }
            }
            Error::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Error::Storage(_) | Error::Embedding(_) | Error::Feed(_) => true,
            Error::Io(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        assert!(Error::HttpStatus {
            status: 429,
            url: "http://x".into()
        }
        .is_transient());
        assert!(Error::HttpStatus {
            status: 503,
            url: "http://x".into()
        }
        .is_transient());
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!Error::HttpStatus {
            status: 404,
            url: "http://x".into()
        }
        .is_transient());
        assert!(!Error::HttpStatus {
            status: 410,
            url: "http://x".into()
        }
        .is_transient());
    }

    #[test]
    fn malformed_messages_are_permanent() {
        assert!(!Error::InvalidMessage("missing link".into()).is_transient());
    }

    #[test]
    fn provider_outages_are_transient() {
        assert!(Error::Embedding("provider unavailable".into()).is_transient());
        assert!(Error::Storage("connection reset".into()).is_transient());
    }
}
