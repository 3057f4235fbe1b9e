mod client;
#[cfg(test)]
mod tests;

pub use client::Fetcher;

use bytes::Bytes;

use crate::error::{Error, Result};

/// A single fetch to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source_url: String,
}

impl FetchRequest {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
        }
    }
}

/// Outcome of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Success,
    /// Caller-visible reason, e.g. `unexpected status 404`
    Failure(String),
}

/// Result of one fetch, consumed once by the caller
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: FetchStatus,
    /// Full response body, present only on success
    pub bytes: Option<Bytes>,
    /// Status of the remote response; absent when none was received
    pub http_status: Option<u16>,
    error: Option<Error>,
}

impl FetchResult {
    pub(crate) fn success(bytes: Bytes, http_status: u16) -> Self {
        Self {
            status: FetchStatus::Success,
            bytes: Some(bytes),
            http_status: Some(http_status),
            error: None,
        }
    }

    pub(crate) fn failure(error: Error) -> Self {
        Self {
            status: FetchStatus::Failure(error.to_string()),
            bytes: None,
            http_status: error.http_status(),
            error: Some(error),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, FetchStatus::Success)
    }

    /// Failure reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Success => None,
            FetchStatus::Failure(reason) => Some(reason),
        }
    }

    /// Number of body bytes received
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.bytes.as_ref().map(Bytes::len)
    }

    /// The body on success, otherwise the typed error
    pub fn into_result(self) -> Result<Bytes> {
        match (self.error, self.bytes) {
            (Some(error), _) => Err(error),
            (None, Some(bytes)) => Ok(bytes),
            (None, None) => Err(Error::Network("response carried no body".into())),
        }
    }
}
