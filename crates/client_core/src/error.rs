use serde_json::Value;
use thiserror::Error;

/// Every way a remote call can fail, normalized so callers never look at
/// HTTP status codes.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    /// Non-success status. `body` is the decoded JSON body, or a synthetic
    /// `{"error": ...}` when the body was not JSON.
    #[error("server returned {status}: {body}")]
    Backend { status: u16, body: Value },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl TransportError {
    /// Text for a failure event. Backend errors pass their `error` field
    /// through untouched.
    pub fn failure_message(&self) -> Option<String> {
        match self {
            TransportError::Backend { body, .. } => match body.get("error") {
                Some(Value::String(message)) => Some(message.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            },
            other => Some(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SnippetError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("snippet {0} has no files")]
    Empty(String),
    #[error("unexpected snippet store response: {0}")]
    Malformed(String),
    #[error("snippet store is unavailable")]
    Unavailable,
}

impl SnippetError {
    pub fn failure_message(&self) -> Option<String> {
        match self {
            SnippetError::Transport(err) => err.failure_message(),
            other => Some(other.to_string()),
        }
    }
}
