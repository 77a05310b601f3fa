//! Error types for the reply-threads library.

use crate::session::CorrelationId;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the collaborator seams.
///
/// Grouping and list building never fail; these errors come from composing
/// drafts, starting and reconciling optimistic sends, decoding payloads and the upstream
/// [`MessageSource`](crate::source::MessageSource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Draft is missing a required field
    #[error("Invalid draft: {0}")]
    InvalidDraft(String),

    /// No pending send carries this correlation id
    #[error("No pending message for {0}")]
    UnknownCorrelation(CorrelationId),

    /// Reply targets a message the backend has not confirmed yet
    #[error("Parent {0} has not been confirmed yet")]
    ParentPending(String),

    /// Payload could not be decoded into messages
    #[error("Decode error: {0}")]
    Decode(String),

    /// Failure reported by the message source (network, backend)
    #[error("Message source error: {0}")]
    Source(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
