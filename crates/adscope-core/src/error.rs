//! Error types for adscope

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidAccount(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Google Ads API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with the message prefix of the operation that failed
    pub fn operation(operation: &'static str, source: Error) -> Self {
        Error::Operation {
            operation,
            source: Box::new(source),
        }
    }

    /// True if this error (or the error it wraps) is an unresolvable account
    pub fn is_invalid_account(&self) -> bool {
        match self {
            Error::InvalidAccount(_) => true,
            Error::Operation { source, .. } => source.is_invalid_account(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
