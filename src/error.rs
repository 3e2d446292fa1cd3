//! Error types for the upyunlib library.

use thiserror::Error;

/// Main error type for upyunlib operations.
#[derive(Error, Debug)]
pub enum UpyunError {
    /// The server answered with a status other than 200.
    ///
    /// Carries the raw response body and the requested URL for diagnostics.
    #[error("{body}, request url is {url}")]
    HttpError {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body, lossily decoded as UTF-8
        body: String,
        /// Fully qualified URL that was requested
        url: String,
    },

    /// Network request error.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// A custom transport could not complete the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A response could not be interpreted in its expected format.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Local filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller supplied header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Custom error message.
    #[error("{0}")]
    Custom(String),
}

impl UpyunError {
    /// HTTP status of a protocol failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpyunError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for upyunlib operations.
pub type Result<T> = std::result::Result<T, UpyunError>;
