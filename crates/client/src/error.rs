use storyviz_core::error::CoreError;

use crate::session::Notice;

/// Errors surfaced by the story client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A domain-level error, e.g. a failed precondition.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The story API returned a non-2xx status code.
    #[error("Story API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The API answered with an empty scene list.
    #[error("Story API returned no scenes")]
    EmptyStory,

    #[error("Invalid origin URL: {0}")]
    InvalidOrigin(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key-value store backing the auth session failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// The user-facing notification for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            ClientError::Core(CoreError::Validation(_)) => Notice::new(
                "Story idea required",
                Some("Please enter a story idea to continue."),
            ),
            _ => Notice::new("Generation failed", Some("Please try again.")),
        }
    }
}
