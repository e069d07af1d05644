//! Error types for Pagewise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Pagewise workspace.
///
/// The first three variants form the reading-session taxonomy: `Load` is fatal
/// to opening a session, `StoreUnavailable` comes from the remote progress
/// store, and `Retrieval` from the document source. The rest are ambient.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagewiseError {
    /// Opening a document failed; no session was established.
    #[error("Failed to load document '{document_id}': {reason}")]
    Load { document_id: String, reason: String },

    /// The remote progress store could not be reached or rejected the call.
    #[error("Progress store unavailable: {0}")]
    StoreUnavailable(String),

    /// Document bytes or page text could not be retrieved.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// An operation needs an open session but none is active.
    #[error("No document is open")]
    NoSession,

    /// A newer open/close replaced the session this result belonged to.
    #[error("Result for '{document_id}' was superseded by a newer session")]
    Superseded { document_id: String },

    /// A page count reported for a document is unusable.
    #[error("Invalid page count: {0}")]
    InvalidPageCount(u32),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PagewiseError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Load error for the given document.
    pub fn load(document_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            document_id: document_id.into(),
            reason: reason.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a Retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Load error
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }

    /// Check if this is a StoreUnavailable error
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Check if this is a Retrieval error
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval(_))
    }

    /// Check if this is a Superseded error
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }

    /// Wraps any failure that happened while opening `document_id` into a
    /// `Load` error, keeping the original message as the reason.
    ///
    /// `Load` and `Superseded` pass through unchanged.
    pub fn into_load(self, document_id: &str) -> Self {
        match self {
            Self::Load { .. } | Self::Superseded { .. } => self,
            other => Self::load(document_id, other.to_string()),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PagewiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PagewiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, PagewiseError>`.
pub type Result<T> = std::result::Result<T, PagewiseError>;
