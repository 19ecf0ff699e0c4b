use std::path::PathBuf;
use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;
pub type SocialResult<T> = Result<T, SocialError>;

/// Failure to resolve a page document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Not authorized to read page {0}")]
    Unauthorized(String),

    /// Network failure, timeout or unexpected status; worth retrying.
    #[error("Page store unavailable: {0}")]
    Transient(String),

    #[error("Invalid page document: {0}")]
    InvalidDocument(String),
}

impl FetchError {
    /// The page does not exist for this caller, as opposed to a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// Failure talking to the comments/likes/birthdays service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SocialError {
    #[error("Social service request failed: {0}")]
    Http(String),

    #[error("Social service returned status {0}")]
    Status(u16),

    #[error("Unexpected social service response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SocialError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SocialError::Decode(err.to_string())
        } else {
            SocialError::Http(err.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
