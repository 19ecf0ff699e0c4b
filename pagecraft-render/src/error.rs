use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

/// Document-level decoding failures.
///
/// Problems inside a decoded tree (dangling ids, unknown types, broken slot
/// keys) never surface here: the interpreter degrades them to placeholders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("Invalid node tree: expected an object keyed by node id, found {found}")]
    InvalidTreeShape { found: String },

    #[error("Encoded content is not a JSON object: {0}")]
    InvalidEncodedContent(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::JsonError(err.to_string())
    }
}
