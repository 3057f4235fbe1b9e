use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds for a fetch-and-persist cycle
///
/// Every failure is terminal for the request that produced it. Nothing is
/// retried.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// DNS, connection, timeout or body read failure
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a non-2xx status
    #[error("unexpected status {0}")]
    HttpStatus(u16),

    /// Local file could not be created or written
    #[error("write error: {0}")]
    Write(String),

    /// Missing or unsafe caller input
    #[error("{0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// HTTP status reported to a web caller for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Status code of the remote response, if one was received
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
