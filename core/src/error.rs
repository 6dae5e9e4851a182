use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A single fetch failed; the crawl carries on without it.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A subpage arrived for a condition that was never scraped.
    #[error("no existing condition titled {title:?} for {url}")]
    MissingEntry { title: String, url: String },

    #[error("unable to access dataset file {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed dataset file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record {key:?} in dataset: {reason}")]
    InvalidRecord { key: String, reason: String },
}

impl Error {
    pub fn transport(url: impl Into<String>, message: impl ToString) -> Self {
        Error::Transport { url: url.into(), message: message.to_string() }
    }

    /// Per-request and per-subpage failures never abort a crawl.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::MissingEntry { .. })
    }
}
